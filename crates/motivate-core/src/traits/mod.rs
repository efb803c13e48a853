// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seam traits between the acquisition pipeline and its collaborators.
//!
//! Every trait uses `#[async_trait]` so implementations can be held as
//! `Arc<dyn Trait>` and swapped for test doubles.

pub mod cache;
pub mod persistence;
pub mod picker;
pub mod reload;

pub use cache::ImageCache;
pub use persistence::SelectionPersistence;
pub use picker::ImagePicker;
pub use reload::SurfaceReloader;
