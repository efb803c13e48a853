// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Offline image cache used as the fallback path.

use async_trait::async_trait;

use crate::error::CacheError;
use crate::types::CachedImage;

/// Holds previously retrieved image bytes for use when the backend is unreachable.
#[async_trait]
pub trait ImageCache: Send + Sync + 'static {
    /// Returns one cached entry, or `None` when the cache is empty.
    async fn get_random(&self) -> Result<Option<CachedImage>, CacheError>;

    /// Stores an entry, applying the cache's capacity and size policy.
    async fn store(&self, image: &CachedImage) -> Result<(), CacheError>;
}
