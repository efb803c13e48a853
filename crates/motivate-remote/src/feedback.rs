// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Like/dislike feedback on a displayed image.

use motivate_core::{FeedbackKind, RemoteError};
use tracing::{info, warn};

use crate::client::{BackendClient, ensure_success};
use crate::wire::FeedbackParams;

const FEEDBACK_RPC: &str = "increment_image_feedback_count";

/// Records feedback through the `increment_image_feedback_count` RPC.
///
/// Each call increments a counter server-side, so submissions are not
/// idempotent and are never retried.
#[derive(Debug, Clone)]
pub struct FeedbackSubmitter {
    client: BackendClient,
}

impl FeedbackSubmitter {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    pub async fn submit(&self, image_id: i64, kind: FeedbackKind) -> Result<(), RemoteError> {
        let params = FeedbackParams {
            p_image_id: image_id,
            p_feedback_type: kind,
        };
        let result = match self.client.post_rpc(FEEDBACK_RPC, &params, false).await {
            Ok(response) => ensure_success(response.status()),
            Err(e) => Err(e),
        };

        match &result {
            Ok(()) => info!(image_id, %kind, "feedback recorded"),
            Err(e) => warn!(image_id, %kind, error = %e, "feedback submission failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn submitter_for(base: &str) -> FeedbackSubmitter {
        let client = BackendClient::new(
            base,
            &SecretString::from("anon".to_string()),
            "motivational-images",
            Duration::from_secs(5),
        )
        .unwrap();
        FeedbackSubmitter::new(client)
    }

    #[tokio::test]
    async fn like_posts_expected_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/increment_image_feedback_count"))
            .and(body_json(
                serde_json::json!({"p_image_id": 7, "p_feedback_type": "like"}),
            ))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        submitter_for(&server.uri())
            .submit(7, FeedbackKind::Like)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn failure_is_returned_once_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/increment_image_feedback_count"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let err = submitter_for(&server.uri())
            .submit(3, FeedbackKind::Dislike)
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::HttpStatus { status: 503 }));
    }
}
