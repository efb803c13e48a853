// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementations of the selection persistence and offline cache seams.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, warn};

use motivate_config::model::{CacheConfig, StorageConfig};
use motivate_core::{
    CacheError, CachedImage, CategorySelection, ImageCache, MotivateError,
    SELECTED_CATEGORIES_KEY, SelectionPersistence,
};

use crate::database::Database;
use crate::queries;
use crate::queries::image_cache::CacheStats;

/// Opens the shared store described by `config`.
pub async fn open_shared_store(config: &StorageConfig) -> Result<Database, MotivateError> {
    Database::open_with_timeout(
        &config.database_path,
        Duration::from_millis(config.busy_timeout_ms),
    )
    .await
}

/// Category selection persisted under [`SELECTED_CATEGORIES_KEY`] as a JSON
/// array of decimal strings.
#[derive(Debug, Clone)]
pub struct SqliteSelectionStore {
    db: Database,
}

impl SqliteSelectionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SelectionPersistence for SqliteSelectionStore {
    async fn load(&self) -> Result<CategorySelection, MotivateError> {
        let Some(raw) = queries::preferences::get_value(&self.db, SELECTED_CATEGORIES_KEY).await?
        else {
            return Ok(CategorySelection::new());
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(encoded) => Ok(CategorySelection::from_persisted(&encoded)),
            Err(e) => {
                warn!(error = %e, "stored category selection is malformed, treating as empty");
                Ok(CategorySelection::new())
            }
        }
    }

    async fn save(&self, selection: &CategorySelection) -> Result<(), MotivateError> {
        let encoded = serde_json::to_string(&selection.to_persisted())
            .map_err(|e| MotivateError::Internal(format!("encode selection: {e}")))?;
        queries::preferences::set_value(&self.db, SELECTED_CATEGORIES_KEY, &encoded).await?;
        debug!(count = selection.len(), "category selection persisted");
        Ok(())
    }

    async fn revision(&self) -> Result<Option<i64>, MotivateError> {
        queries::preferences::get_revision(&self.db, SELECTED_CATEGORIES_KEY).await
    }
}

/// Bounded offline image cache.
///
/// Keeps at most `capacity` entries, evicting the least recently stored, and
/// refuses entries larger than `max_entry_bytes`.
#[derive(Debug, Clone)]
pub struct SqliteImageCache {
    db: Database,
    capacity: usize,
    max_entry_bytes: usize,
}

impl SqliteImageCache {
    pub fn new(db: Database, config: &CacheConfig) -> Self {
        Self {
            db,
            capacity: config.capacity.max(1),
            max_entry_bytes: config.max_entry_bytes,
        }
    }

    /// Adds an entry that did not come from the backend.
    pub async fn seed(&self, bytes: Bytes) -> Result<(), CacheError> {
        self.store(&CachedImage {
            bytes,
            image_id: None,
        })
        .await
    }

    pub async fn len(&self) -> Result<u64, CacheError> {
        queries::image_cache::count(&self.db)
            .await
            .map_err(CacheError::storage)
    }

    pub async fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len().await? == 0)
    }

    pub async fn stats(&self) -> Result<CacheStats, CacheError> {
        queries::image_cache::stats(&self.db)
            .await
            .map_err(CacheError::storage)
    }

    /// Removes every entry, returning how many were dropped.
    pub async fn clear(&self) -> Result<usize, CacheError> {
        queries::image_cache::clear(&self.db)
            .await
            .map_err(CacheError::storage)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[async_trait]
impl ImageCache for SqliteImageCache {
    async fn get_random(&self) -> Result<Option<CachedImage>, CacheError> {
        let row = queries::image_cache::random_entry(&self.db)
            .await
            .map_err(CacheError::storage)?;
        Ok(row.map(|row| CachedImage {
            bytes: Bytes::from(row.bytes),
            image_id: row.image_id,
        }))
    }

    async fn store(&self, image: &CachedImage) -> Result<(), CacheError> {
        if image.bytes.len() > self.max_entry_bytes {
            debug!(
                size = image.bytes.len(),
                limit = self.max_entry_bytes,
                "image too large for offline cache, skipping"
            );
            return Ok(());
        }

        let evicted = queries::image_cache::store_entry(
            &self.db,
            image.image_id,
            image.bytes.to_vec(),
            self.capacity,
        )
        .await
        .map_err(CacheError::storage)?;
        if evicted > 0 {
            debug!(evicted, "offline cache trimmed to capacity");
        }
        Ok(())
    }
}
