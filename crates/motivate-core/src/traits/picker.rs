// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote image source.

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::error::RemoteError;
use crate::types::ImageRecord;

/// Picks one random image from the backend and downloads it.
#[async_trait]
pub trait ImagePicker: Send + Sync + 'static {
    /// Asks the backend for one random image matching `filter`.
    ///
    /// `None` (or an empty slice) means unfiltered.
    async fn fetch_random(&self, filter: Option<&[i64]>) -> Result<ImageRecord, RemoteError>;

    /// Builds the public object URL for `filename`.
    fn build_public_url(&self, filename: &str) -> Result<Url, RemoteError>;

    /// Downloads the object at `url`; only HTTP 200 counts as success.
    async fn download_bytes(&self, url: &Url) -> Result<Bytes, RemoteError>;
}
