// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Offline image cache rows.
//!
//! Entries are ordered by `recency`, a counter bumped on every store. Eviction
//! keeps the `capacity` most recently stored rows. Inserts and evictions run in
//! one `BEGIN IMMEDIATE` transaction so a concurrent process never observes an
//! over-capacity table.

use motivate_core::MotivateError;
use rusqlite::{OptionalExtension, TransactionBehavior, params};

use crate::database::{Database, storage_err};

/// A row returned by [`random_entry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRow {
    pub image_id: Option<i64>,
    pub bytes: Vec<u8>,
}

/// Aggregate figures for `cache stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: u64,
    pub total_bytes: u64,
    pub newest_stored_at: Option<String>,
    pub last_served_at: Option<String>,
}

/// Store `bytes`, refreshing the existing row when `image_id` is already cached,
/// then evict down to `capacity`. Returns the number of evicted rows.
pub async fn store_entry(
    db: &Database,
    image_id: Option<i64>,
    bytes: Vec<u8>,
    capacity: usize,
) -> Result<usize, MotivateError> {
    let capacity = i64::try_from(capacity).unwrap_or(i64::MAX);
    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let next_recency: i64 = tx.query_row(
                "SELECT COALESCE(MAX(recency), 0) + 1 FROM image_cache",
                [],
                |row| row.get(0),
            )?;
            let len = bytes.len() as i64;

            match image_id {
                Some(id) => {
                    tx.execute(
                        "INSERT INTO image_cache (image_id, bytes, byte_len, recency)
                         VALUES (?1, ?2, ?3, ?4)
                         ON CONFLICT(image_id) DO UPDATE SET
                            bytes = excluded.bytes,
                            byte_len = excluded.byte_len,
                            recency = excluded.recency,
                            stored_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                        params![id, bytes, len, next_recency],
                    )?;
                }
                None => {
                    tx.execute(
                        "INSERT INTO image_cache (image_id, bytes, byte_len, recency)
                         VALUES (NULL, ?1, ?2, ?3)",
                        params![bytes, len, next_recency],
                    )?;
                }
            }

            let evicted = tx.execute(
                "DELETE FROM image_cache WHERE id NOT IN (
                    SELECT id FROM image_cache ORDER BY recency DESC LIMIT ?1
                 )",
                params![capacity],
            )?;

            tx.commit()?;
            Ok(evicted)
        })
        .await
        .map_err(storage_err)
}

/// Pick one entry uniformly at random and mark it as served.
/// Returns `None` when the cache is empty.
pub async fn random_entry(db: &Database) -> Result<Option<CacheRow>, MotivateError> {
    db.connection()
        .call(|conn| -> Result<Option<CacheRow>, rusqlite::Error> {
            let picked = conn
                .query_row(
                    "SELECT id, image_id, bytes FROM image_cache ORDER BY RANDOM() LIMIT 1",
                    [],
                    |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            CacheRow {
                                image_id: row.get(1)?,
                                bytes: row.get(2)?,
                            },
                        ))
                    },
                )
                .optional()?;

            let Some((row_id, entry)) = picked else {
                return Ok(None);
            };
            conn.execute(
                "UPDATE image_cache SET last_served_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1",
                params![row_id],
            )?;
            Ok(Some(entry))
        })
        .await
        .map_err(storage_err)
}

/// Number of cached entries.
pub async fn count(db: &Database) -> Result<u64, MotivateError> {
    db.connection()
        .call(|conn| -> Result<u64, rusqlite::Error> {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM image_cache", [], |row| row.get(0))?;
            Ok(n.max(0) as u64)
        })
        .await
        .map_err(storage_err)
}

/// Image ids of the cached entries, most recently stored first.
/// Seeded entries appear as `None`.
pub async fn image_ids_by_recency(db: &Database) -> Result<Vec<Option<i64>>, MotivateError> {
    db.connection()
        .call(|conn| -> Result<Vec<Option<i64>>, rusqlite::Error> {
            let mut stmt = conn.prepare("SELECT image_id FROM image_cache ORDER BY recency DESC")?;
            let ids = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ids)
        })
        .await
        .map_err(storage_err)
}

pub async fn stats(db: &Database) -> Result<CacheStats, MotivateError> {
    db.connection()
        .call(|conn| -> Result<CacheStats, rusqlite::Error> {
            conn.query_row(
                "SELECT COUNT(*), COALESCE(SUM(byte_len), 0), MAX(stored_at), MAX(last_served_at)
                 FROM image_cache",
                [],
                |row| {
                    let entries: i64 = row.get(0)?;
                    let total_bytes: i64 = row.get(1)?;
                    Ok(CacheStats {
                        entries: entries.max(0) as u64,
                        total_bytes: total_bytes.max(0) as u64,
                        newest_stored_at: row.get(2)?,
                        last_served_at: row.get(3)?,
                    })
                },
            )
        })
        .await
        .map_err(storage_err)
}

/// Delete every entry. Returns the number removed.
pub async fn clear(db: &Database) -> Result<usize, MotivateError> {
    db.connection()
        .call(|conn| -> Result<usize, rusqlite::Error> { conn.execute("DELETE FROM image_cache", []) })
        .await
        .map_err(storage_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn open_temp() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        (dir, db)
    }

    #[tokio::test]
    async fn empty_cache_returns_none() {
        let (_dir, db) = open_temp().await;
        assert_eq!(random_entry(&db).await.unwrap(), None);
        assert_eq!(count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn stored_entry_is_served() {
        let (_dir, db) = open_temp().await;
        store_entry(&db, Some(7), b"jpeg".to_vec(), 4).await.unwrap();
        let row = random_entry(&db).await.unwrap().unwrap();
        assert_eq!(row.image_id, Some(7));
        assert_eq!(row.bytes, b"jpeg");

        let stats = stats(&db).await.unwrap();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.total_bytes, 4);
        assert!(stats.last_served_at.is_some());
    }

    #[tokio::test]
    async fn same_image_id_is_refreshed_not_duplicated() {
        let (_dir, db) = open_temp().await;
        store_entry(&db, Some(1), b"old".to_vec(), 4).await.unwrap();
        store_entry(&db, Some(2), b"two".to_vec(), 4).await.unwrap();
        store_entry(&db, Some(1), b"new".to_vec(), 4).await.unwrap();

        assert_eq!(count(&db).await.unwrap(), 2);
        assert_eq!(
            image_ids_by_recency(&db).await.unwrap(),
            vec![Some(1), Some(2)]
        );
    }

    #[tokio::test]
    async fn eviction_drops_least_recently_stored() {
        let (_dir, db) = open_temp().await;
        let mut evicted = 0;
        for id in 1..=5 {
            evicted += store_entry(&db, Some(id), vec![id as u8], 3).await.unwrap();
        }
        assert_eq!(evicted, 2);
        assert_eq!(
            image_ids_by_recency(&db).await.unwrap(),
            vec![Some(5), Some(4), Some(3)]
        );
    }

    #[tokio::test]
    async fn seeded_entries_without_ids_coexist() {
        let (_dir, db) = open_temp().await;
        store_entry(&db, None, b"a".to_vec(), 10).await.unwrap();
        store_entry(&db, None, b"b".to_vec(), 10).await.unwrap();
        assert_eq!(count(&db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn clear_empties_the_cache() {
        let (_dir, db) = open_temp().await;
        store_entry(&db, Some(1), b"x".to_vec(), 10).await.unwrap();
        assert_eq!(clear(&db).await.unwrap(), 1);
        assert_eq!(count(&db).await.unwrap(), 0);
    }
}
