// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend adapters for the Motivate image pipeline.
//!
//! All three adapters share one explicitly constructed [`BackendClient`]:
//! - [`RemoteImagePicker`] picks a random image and downloads its bytes,
//! - [`FeedbackSubmitter`] records like/dislike reactions,
//! - [`CategoryCatalog`] lists the available categories.

pub mod catalog;
pub mod client;
pub mod feedback;
pub mod picker;
pub mod wire;

pub use catalog::CategoryCatalog;
pub use client::BackendClient;
pub use feedback::FeedbackSubmitter;
pub use picker::{RemoteImagePicker, public_object_url};
