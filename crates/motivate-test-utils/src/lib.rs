// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Motivate unit and integration tests.
//!
//! Provides scripted doubles for every seam trait and a harness that opens a
//! throwaway shared store, so tests run without a backend or a real data dir.
//!
//! # Components
//!
//! - [`MockPicker`] - scripted remote picker that counts calls
//! - [`MockCache`] - in-memory offline cache that counts reads and writes
//! - [`MemoryPersistence`] - in-memory selection persistence counting saves
//! - [`RecordingReloader`] - records reload signals
//! - [`TempStore`] - SQLite shared store in a temp directory

pub mod harness;
pub mod mock_cache;
pub mod mock_persistence;
pub mod mock_picker;

pub use harness::{TempStore, sample_bytes, sample_record};
pub use mock_cache::MockCache;
pub use mock_persistence::{MemoryPersistence, RecordingReloader};
pub use mock_picker::{MockPicker, PickerBehavior};
