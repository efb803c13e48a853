// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence shared by the interactive app and the background surface host.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, the category
//! selection store, and the bounded offline image cache.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::{SqliteImageCache, SqliteSelectionStore, open_shared_store};
pub use database::Database;
pub use queries::image_cache::CacheStats;
