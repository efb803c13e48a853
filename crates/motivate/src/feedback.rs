// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `motivate feedback` command.

use motivate_config::MotivateConfig;
use motivate_core::{FeedbackKind, MotivateError};
use motivate_remote::{BackendClient, FeedbackSubmitter};

/// Submits one feedback event. Not retried on failure.
pub async fn run_feedback(
    config: &MotivateConfig,
    image_id: i64,
    kind: FeedbackKind,
) -> Result<(), MotivateError> {
    let submitter = FeedbackSubmitter::new(BackendClient::from_config(&config.backend)?);
    submitter.submit(image_id, kind).await?;
    println!("recorded {kind} for image {image_id}");
    Ok(())
}
