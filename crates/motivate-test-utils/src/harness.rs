// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temp-directory shared store and sample data for integration tests.

use bytes::Bytes;
use tempfile::TempDir;

use motivate_config::model::CacheConfig;
use motivate_core::{ImageRecord, MotivateError};
use motivate_storage::{Database, SqliteImageCache, SqliteSelectionStore};

/// A shared store living in its own temp directory.
///
/// The directory is removed when the value is dropped.
pub struct TempStore {
    dir: TempDir,
    db: Database,
}

impl TempStore {
    pub async fn new() -> Result<Self, MotivateError> {
        let dir = TempDir::new().map_err(|e| MotivateError::Storage { source: e.into() })?;
        let path = dir.path().join("motivate.db");
        let db = Database::open(&path.to_string_lossy()).await?;
        Ok(Self { dir, db })
    }

    /// Opens a second, independent handle on the same file, the way another
    /// process would.
    pub async fn reopen(&self) -> Result<Database, MotivateError> {
        Database::open(&self.path()).await
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn path(&self) -> String {
        self.dir.path().join("motivate.db").to_string_lossy().into_owned()
    }

    pub fn selection_store(&self) -> SqliteSelectionStore {
        SqliteSelectionStore::new(self.db.clone())
    }

    pub fn image_cache(&self, capacity: usize) -> SqliteImageCache {
        SqliteImageCache::new(
            self.db.clone(),
            &CacheConfig {
                capacity,
                ..CacheConfig::default()
            },
        )
    }
}

pub fn sample_record(id: i64) -> ImageRecord {
    ImageRecord {
        id,
        image_url: format!("motivation-{id}.jpg"),
    }
}

/// A few bytes that look like the start of a JPEG.
pub fn sample_bytes(tag: u8) -> Bytes {
    Bytes::from(vec![0xFF, 0xD8, 0xFF, tag])
}

#[cfg(test)]
mod tests {
    use super::*;
    use motivate_core::{ImageCache, SelectionPersistence};

    #[tokio::test]
    async fn temp_store_supports_both_adapters() {
        let store = TempStore::new().await.unwrap();
        assert!(store.selection_store().load().await.unwrap().is_empty());
        assert!(store.image_cache(4).get_random().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reopened_handle_sees_same_file() {
        let store = TempStore::new().await.unwrap();
        let cache = store.image_cache(4);
        cache.seed(sample_bytes(1)).await.unwrap();

        let other = SqliteImageCache::new(store.reopen().await.unwrap(), &CacheConfig::default());
        assert_eq!(other.len().await.unwrap(), 1);
    }
}
