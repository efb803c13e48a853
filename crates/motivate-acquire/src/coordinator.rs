// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote-first image acquisition with offline-cache fallback.
//!
//! Every call makes exactly one remote attempt (random pick + download). On
//! success the bytes are written through to the cache and returned with
//! [`Provenance::Remote`]; the cache is not read on that path. On any remote
//! failure the cache supplies a random entry with [`Provenance::Cache`], and
//! only when both sides come up empty does the caller see an error.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};

use motivate_core::{
    AcquiredImage, AcquisitionError, CacheError, CachedImage, ImageCache, ImagePicker,
    ImageRecord, Provenance, RemoteError,
};

use crate::monitor::NetworkMonitor;

/// Central acquisition algorithm shared by both display surfaces.
#[derive(Clone)]
pub struct ImageAcquisitionCoordinator {
    picker: Arc<dyn ImagePicker>,
    cache: Arc<dyn ImageCache>,
    monitor: NetworkMonitor,
}

impl ImageAcquisitionCoordinator {
    pub fn new(
        picker: Arc<dyn ImagePicker>,
        cache: Arc<dyn ImageCache>,
        monitor: NetworkMonitor,
    ) -> Self {
        Self {
            picker,
            cache,
            monitor,
        }
    }

    pub fn monitor(&self) -> &NetworkMonitor {
        &self.monitor
    }

    /// Acquires one image for `filter` (`None` or empty means unfiltered).
    pub async fn acquire(&self, filter: Option<&[i64]>) -> Result<AcquiredImage, AcquisitionError> {
        match self.fetch_remote(filter).await {
            Ok((record, bytes)) => {
                self.monitor.report_success();
                self.write_through(&record, bytes.clone()).await;
                info!(image_id = record.id, provenance = %Provenance::Remote, "image acquired");
                Ok(AcquiredImage::from_remote(&record, bytes))
            }
            Err(remote) => {
                warn!(error = %remote, "remote acquisition failed, falling back to offline cache");
                self.monitor.report_failure(&remote);
                self.fallback(remote).await
            }
        }
    }

    async fn fetch_remote(
        &self,
        filter: Option<&[i64]>,
    ) -> Result<(ImageRecord, Bytes), RemoteError> {
        let filter = filter.filter(|ids| !ids.is_empty());
        let record = self.picker.fetch_random(filter).await?;
        let url = self.picker.build_public_url(&record.image_url)?;
        debug!(image_id = record.id, %url, "downloading image");
        let bytes = self.picker.download_bytes(&url).await?;
        Ok((record, bytes))
    }

    async fn fallback(&self, remote: RemoteError) -> Result<AcquiredImage, AcquisitionError> {
        let cache = match self.cache.get_random().await {
            Ok(Some(cached)) => {
                info!(image_id = ?cached.image_id, provenance = %Provenance::Cache, "image acquired");
                return Ok(AcquiredImage::from_cache(cached));
            }
            Ok(None) => CacheError::Empty,
            Err(e) => {
                warn!(error = %e, "offline cache read failed");
                e
            }
        };
        Err(AcquisitionError::NoFallbackAvailable { remote, cache })
    }

    async fn write_through(&self, record: &ImageRecord, bytes: Bytes) {
        let entry = CachedImage {
            bytes,
            image_id: Some(record.id),
        };
        if let Err(e) = self.cache.store(&entry).await {
            warn!(image_id = record.id, error = %e, "failed to cache downloaded image");
        }
    }
}
