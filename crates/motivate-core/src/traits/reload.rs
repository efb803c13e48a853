// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Invalidation signal towards display surfaces.

/// Tells a host to re-run the timeline of every surface of a given kind.
pub trait SurfaceReloader: Send + Sync + 'static {
    fn reload_timelines(&self, kind: &str);
}
