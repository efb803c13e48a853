// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Motivate image pipeline.
//!
//! This crate provides the shared types, the error taxonomy, and the seam
//! traits between the acquisition coordinator and its collaborators (remote
//! picker, offline cache, selection persistence, surface reload signal).

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{AcquisitionError, CacheError, MotivateError, RemoteError, RemoteErrorKind};
pub use types::{
    AcquiredImage, CachedImage, Category, CategorySelection, Connectivity, EntryState,
    FeedbackKind, ImageRecord, Provenance, RefreshPolicy, SELECTED_CATEGORIES_KEY, Timeline,
    TimelineEntry, WIDGET_KIND,
};

pub use traits::{ImageCache, ImagePicker, SelectionPersistence, SurfaceReloader};
