// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cross-process reload delivery for the background surface.
//!
//! A selection saved by another process bumps the revision stored next to
//! it. [`SelectionWatcher`] polls that revision and turns a change into a
//! timeline reload in this process.

use std::sync::Arc;
use std::time::Duration;

use motivate_core::{SelectionPersistence, SurfaceReloader, WIDGET_KIND};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct SelectionWatcher {
    persistence: Arc<dyn SelectionPersistence>,
    reloader: Arc<dyn SurfaceReloader>,
    poll: Duration,
}

impl SelectionWatcher {
    pub fn new(
        persistence: Arc<dyn SelectionPersistence>,
        reloader: Arc<dyn SurfaceReloader>,
        poll: Duration,
    ) -> Self {
        Self {
            persistence,
            reloader,
            poll,
        }
    }

    /// Polls until `cancel` fires. The revision seen at start is the baseline,
    /// so only saves made after the watcher starts trigger a reload.
    pub async fn run(self, cancel: CancellationToken) {
        let mut last = match self.persistence.revision().await {
            Ok(revision) => revision,
            Err(e) => {
                warn!(error = %e, "could not read selection revision, assuming none");
                None
            }
        };
        info!(poll = ?self.poll, ?last, "selection watcher started");

        let mut interval = tokio::time::interval(self.poll);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                () = cancel.cancelled() => break,
            }
            match self.persistence.revision().await {
                Ok(current) if current != last => {
                    debug!(?last, ?current, "selection changed in shared store");
                    last = current;
                    self.reloader.reload_timelines(WIDGET_KIND);
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "selection revision check failed"),
            }
        }
        debug!("selection watcher stopped");
    }
}
