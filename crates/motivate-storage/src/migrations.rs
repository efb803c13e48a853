// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations using refinery.
//!
//! The SQL files under `migrations/` are compiled into the binary and applied
//! whenever a [`Database`](crate::Database) is opened. Both processes sharing
//! the file run the same runner; refinery skips versions already recorded in
//! `refinery_schema_history`.

use motivate_core::MotivateError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply all pending migrations on `conn`.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), MotivateError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(|e| MotivateError::Storage {
            source: Box::new(e),
        })?;
    for migration in report.applied_migrations() {
        tracing::info!(version = migration.version(), name = migration.name(), "applied migration");
    }
    Ok(())
}
