// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key/value preference rows.

use motivate_core::MotivateError;
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, storage_err};

/// Read the raw value stored under `key`, if any.
pub async fn get_value(db: &Database, key: &str) -> Result<Option<String>, MotivateError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
            conn.query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
        })
        .await
        .map_err(storage_err)
}

/// Insert or replace the value stored under `key`.
pub async fn set_value(db: &Database, key: &str, value: &str) -> Result<(), MotivateError> {
    let key = key.to_string();
    let value = value.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO preferences (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    revision = preferences.revision + 1,
                    updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                params![key, value],
            )?;
            Ok(())
        })
        .await
        .map_err(storage_err)
}

/// Revision counter of `key`, bumped by every [`set_value`]. `None` if absent.
pub async fn get_revision(db: &Database, key: &str) -> Result<Option<i64>, MotivateError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<i64>, rusqlite::Error> {
            conn.query_row(
                "SELECT revision FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
        })
        .await
        .map_err(storage_err)
}

/// Remove `key`. Returns whether a row was deleted.
pub async fn delete_value(db: &Database, key: &str) -> Result<bool, MotivateError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let removed = conn.execute("DELETE FROM preferences WHERE key = ?1", params![key])?;
            Ok(removed > 0)
        })
        .await
        .map_err(storage_err)
}
