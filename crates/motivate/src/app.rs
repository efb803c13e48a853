// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring of config into the shared store, backend adapters, and pipeline.

use std::sync::Arc;

use motivate_acquire::{ImageAcquisitionCoordinator, NetworkMonitor, TimelineScheduler};
use motivate_config::MotivateConfig;
use motivate_core::MotivateError;
use motivate_remote::{BackendClient, RemoteImagePicker};
use motivate_storage::{Database, SqliteImageCache, SqliteSelectionStore, open_shared_store};
use tracing::debug;

/// Handles every command needs: the shared store and its two adapters.
pub struct AppContext {
    pub db: Database,
    pub cache: Arc<SqliteImageCache>,
    pub selections: Arc<SqliteSelectionStore>,
}

impl AppContext {
    pub async fn open(config: &MotivateConfig) -> Result<Self, MotivateError> {
        let db = open_shared_store(&config.storage).await?;
        debug!(path = db.path(), "shared store ready");
        Ok(Self {
            cache: Arc::new(SqliteImageCache::new(db.clone(), &config.cache)),
            selections: Arc::new(SqliteSelectionStore::new(db.clone())),
            db,
        })
    }

    /// Coordinator over the configured backend and this store's cache.
    pub fn coordinator(
        &self,
        config: &MotivateConfig,
    ) -> Result<ImageAcquisitionCoordinator, MotivateError> {
        let client = BackendClient::from_config(&config.backend)?;
        Ok(ImageAcquisitionCoordinator::new(
            Arc::new(RemoteImagePicker::new(client)),
            self.cache.clone(),
            NetworkMonitor::new(),
        ))
    }

    pub fn scheduler(&self, config: &MotivateConfig) -> Result<TimelineScheduler, MotivateError> {
        Ok(TimelineScheduler::from_config(
            self.coordinator(config)?,
            self.selections.clone(),
            &config.timeline,
        ))
    }

    pub async fn close(self) -> Result<(), MotivateError> {
        let Self { db, .. } = self;
        db.close().await
    }
}
