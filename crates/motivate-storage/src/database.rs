// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! Within one process, all statements on a [`Database`] run on
//! tokio-rusqlite's single background thread. Across processes (interactive
//! app and background surface host) the same file is opened by each side;
//! SQLite's file locks serialize writers, `busy_timeout` makes a blocked
//! writer wait instead of failing, and multi-statement updates use
//! `BEGIN IMMEDIATE` so the write lock is taken up front. In WAL mode a
//! committed write is visible to the next read on any connection.

use std::path::Path;
use std::time::Duration;

use motivate_core::MotivateError;
use tracing::debug;

use crate::migrations;

/// Default wait on another process's write lock.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Wraps any storage-layer error into [`MotivateError::Storage`].
pub(crate) fn storage_err<E>(e: E) -> MotivateError
where
    E: std::error::Error + Send + Sync + 'static,
{
    MotivateError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the shared SQLite database.
///
/// Cloning is cheap: clones share the same background connection thread.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
    path: String,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("path", &self.path).finish()
    }
}

impl Database {
    /// Opens (creating if needed) the database at `path` with the default busy timeout.
    pub async fn open(path: &str) -> Result<Self, MotivateError> {
        Self::open_with_timeout(path, DEFAULT_BUSY_TIMEOUT).await
    }

    /// Opens the database, applies connection PRAGMAs, and runs pending migrations.
    pub async fn open_with_timeout(
        path: &str,
        busy_timeout: Duration,
    ) -> Result<Self, MotivateError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(storage_err)?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(storage_err)?;

        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            conn.busy_timeout(busy_timeout)?;
            let mode: String =
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            debug!(journal_mode = %mode, "connection pragmas applied");
            Ok(())
        })
        .await
        .map_err(storage_err)?;

        conn.call(|conn| -> Result<(), MotivateError> { migrations::run_migrations(conn) })
            .await
            .map_err(storage_err)?;

        debug!(path, "shared store opened");
        Ok(Self {
            conn,
            path: path.to_string(),
        })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Checkpoints the WAL and closes this handle's connection.
    pub async fn close(self) -> Result<(), MotivateError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(storage_err)?;
        self.conn.close().await.map_err(storage_err)?;
        debug!(path = %self.path, "shared store closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_file_and_parent_directories() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("shared.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        assert!(db_path.exists());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_enables_wal_mode() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("wal.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        let mode: String = db
            .connection()
            .call(|conn| -> Result<String, rusqlite::Error> {
                conn.query_row("PRAGMA journal_mode;", [], |row| row.get(0))
            })
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reopening_existing_database_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("reopen.db");
        let path = db_path.to_str().unwrap();

        let first = Database::open(path).await.unwrap();
        first.close().await.unwrap();
        let second = Database::open(path).await.unwrap();

        let tables: i64 = second
            .connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('preferences', 'image_cache')",
                    [],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap();
        assert_eq!(tables, 2);
        second.close().await.unwrap();
    }
}
