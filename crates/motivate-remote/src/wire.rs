// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response bodies exchanged with the backend.

use motivate_core::{FeedbackKind, ImageRecord, RemoteError};
use serde::Serialize;
use serde_json::Value;

/// Body of the `get_random_image` RPC. `None` serializes as `null` (unfiltered).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RandomImageParams {
    pub category_ids: Option<Vec<i64>>,
}

impl RandomImageParams {
    pub fn new(filter: Option<&[i64]>) -> Self {
        Self {
            category_ids: filter.filter(|ids| !ids.is_empty()).map(<[i64]>::to_vec),
        }
    }
}

/// Body of the `increment_image_feedback_count` RPC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackParams {
    pub p_image_id: i64,
    pub p_feedback_type: FeedbackKind,
}

/// Decodes the single image row of a `get_random_image` response.
///
/// Accepts a bare object or a one-element array; `null` and `[]` mean no row.
/// More than one row is a decode error.
pub fn decode_image_row(body: &str) -> Result<ImageRecord, RemoteError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| RemoteError::decode("random image response is not JSON", e))?;

    let row = match value {
        Value::Null => return Err(RemoteError::Empty),
        Value::Array(mut rows) => match rows.len() {
            0 => return Err(RemoteError::Empty),
            1 => rows.swap_remove(0),
            n => {
                return Err(RemoteError::Decode {
                    message: format!("expected one random image row, got {n}"),
                    source: None,
                });
            }
        },
        other => other,
    };

    serde_json::from_value(row)
        .map_err(|e| RemoteError::decode("random image row has unexpected shape", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use motivate_core::RemoteErrorKind;

    #[test]
    fn empty_filter_serializes_as_null() {
        let body = serde_json::to_string(&RandomImageParams::new(Some(&[]))).unwrap();
        assert_eq!(body, r#"{"category_ids":null}"#);
        let body = serde_json::to_string(&RandomImageParams::new(None)).unwrap();
        assert_eq!(body, r#"{"category_ids":null}"#);
    }

    #[test]
    fn filter_serializes_as_list() {
        let body = serde_json::to_string(&RandomImageParams::new(Some(&[2, 5]))).unwrap();
        assert_eq!(body, r#"{"category_ids":[2,5]}"#);
    }

    #[test]
    fn feedback_body_uses_lowercase_kind() {
        let body = serde_json::to_value(FeedbackParams {
            p_image_id: 7,
            p_feedback_type: FeedbackKind::Dislike,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"p_image_id": 7, "p_feedback_type": "dislike"})
        );
    }

    #[test]
    fn decodes_object_and_single_element_array() {
        let object = decode_image_row(r#"{"id": 7, "image_url": "x.png"}"#).unwrap();
        assert_eq!(object.id, 7);
        let array = decode_image_row(r#"[{"id": 8, "image_url": "y.png", "extra": 1}]"#).unwrap();
        assert_eq!(array.image_url, "y.png");

        let err = decode_image_row(
            r#"[{"id": 1, "image_url": "a.png"}, {"id": 2, "image_url": "b.png"}]"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), RemoteErrorKind::Decode);
        assert!(err.to_string().contains("got 2"), "{err}");
    }

    #[test]
    fn null_and_empty_array_are_empty() {
        assert_eq!(decode_image_row("null").unwrap_err().kind(), RemoteErrorKind::Empty);
        assert_eq!(decode_image_row("[]").unwrap_err().kind(), RemoteErrorKind::Empty);
    }

    #[test]
    fn wrong_shape_is_decode_error() {
        let err = decode_image_row(r#"{"id": "seven"}"#).unwrap_err();
        assert_eq!(err.kind(), RemoteErrorKind::Decode);
        let err = decode_image_row("<html>").unwrap_err();
        assert_eq!(err.kind(), RemoteErrorKind::Decode);
    }
}
