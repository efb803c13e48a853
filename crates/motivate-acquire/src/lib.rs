// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image acquisition pipeline for the Motivate surfaces.
//!
//! - [`ImageAcquisitionCoordinator`]: remote-first fetch with offline fallback
//! - [`CategoryPreferenceStore`]: debounced, read-your-write category filter
//! - [`TimelineScheduler`]: refresh timing for the background surface
//! - [`NetworkMonitor`]: advisory connectivity state
//! - [`SelectionWatcher`]: reloads the background surface on saves from other processes

pub mod coordinator;
pub mod monitor;
pub mod preferences;
pub mod timeline;
pub mod watcher;

pub use coordinator::ImageAcquisitionCoordinator;
pub use monitor::NetworkMonitor;
pub use preferences::{CategoryPreferenceStore, ReloadBroadcaster, load_selection};
pub use timeline::TimelineScheduler;
pub use watcher::SelectionWatcher;
