// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Refresh scheduling for the host-driven background surface.
//!
//! Placeholders and preview snapshots never touch I/O. A timeline always holds
//! exactly one entry produced by one bounded acquisition and tells the host to
//! come back after the refresh interval.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use motivate_config::model::TimelineConfig;
use motivate_core::{
    AcquisitionError, EntryState, RefreshPolicy, SelectionPersistence, Timeline, TimelineEntry,
    WIDGET_KIND,
};

use crate::coordinator::ImageAcquisitionCoordinator;
use crate::preferences::load_selection;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_ACQUISITION_BUDGET: Duration = Duration::from_secs(25);

/// Produces timeline entries for the background surface.
#[derive(Clone)]
pub struct TimelineScheduler {
    coordinator: ImageAcquisitionCoordinator,
    persistence: Arc<dyn SelectionPersistence>,
    refresh_interval: Duration,
    budget: Duration,
}

impl TimelineScheduler {
    pub fn new(
        coordinator: ImageAcquisitionCoordinator,
        persistence: Arc<dyn SelectionPersistence>,
        refresh_interval: Duration,
        budget: Duration,
    ) -> Self {
        Self {
            coordinator,
            persistence,
            refresh_interval: refresh_interval.max(Duration::from_secs(1)),
            budget,
        }
    }

    pub fn from_config(
        coordinator: ImageAcquisitionCoordinator,
        persistence: Arc<dyn SelectionPersistence>,
        config: &TimelineConfig,
    ) -> Self {
        Self::new(
            coordinator,
            persistence,
            Duration::from_secs(config.refresh_interval_secs),
            Duration::from_secs(config.acquisition_budget_secs),
        )
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Static entry shown before any data exists.
    pub fn placeholder(&self) -> TimelineEntry {
        self.entry_at(Utc::now(), EntryState::Placeholder)
    }

    /// Quick entry for galleries and transitions. Never waits on I/O.
    pub fn snapshot(&self, is_preview: bool) -> TimelineEntry {
        debug!(is_preview, "snapshot requested");
        self.placeholder()
    }

    /// Runs one bounded acquisition with the persisted filter and wraps the
    /// outcome in a single-entry timeline.
    pub async fn timeline(&self) -> Timeline {
        let date = Utc::now();
        let state = self.resolve().await;
        let entry = self.entry_at(date, state);
        let policy = RefreshPolicy::After(entry.next_refresh);
        Timeline {
            entries: vec![entry],
            policy,
        }
    }

    /// One `Loading` entry followed by exactly one terminal entry.
    ///
    /// Drives the interactive surface. Must be called inside a tokio runtime.
    pub fn request(&self) -> mpsc::Receiver<TimelineEntry> {
        let (tx, rx) = mpsc::channel(2);
        let scheduler = self.clone();
        tokio::spawn(async move {
            let loading = scheduler.entry_at(Utc::now(), EntryState::Loading);
            if tx.send(loading).await.is_err() {
                return;
            }
            let date = Utc::now();
            let state = scheduler.resolve().await;
            // The receiver may already be gone; nothing else to do then.
            let _ = tx.send(scheduler.entry_at(date, state)).await;
        });
        rx
    }

    /// Host loop: publishes a timeline, then waits for the refresh instant or
    /// a reload signal for this surface kind, until `cancel` fires or the
    /// consumer goes away.
    pub async fn run(
        &self,
        cancel: CancellationToken,
        mut reloads: broadcast::Receiver<String>,
        timelines: mpsc::Sender<Timeline>,
    ) {
        info!(interval = ?self.refresh_interval, budget = ?self.budget, "timeline loop started");
        loop {
            let timeline = tokio::select! {
                () = cancel.cancelled() => break,
                timeline = self.timeline() => timeline,
            };
            let RefreshPolicy::After(refresh_at) = timeline.policy;
            if timelines.send(timeline).await.is_err() {
                debug!("timeline consumer dropped");
                break;
            }

            let wait = (refresh_at - Utc::now())
                .to_std()
                .unwrap_or(Duration::ZERO);
            tokio::select! {
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(wait) => debug!("refresh interval elapsed"),
                () = next_reload(&mut reloads) => info!(kind = WIDGET_KIND, "reload requested"),
            }
        }
        info!("timeline loop stopped");
    }

    async fn resolve(&self) -> EntryState {
        // Reading the filter counts against the budget too.
        let acquisition = async {
            let selection = load_selection(self.persistence.as_ref()).await;
            let filter = selection.as_filter();
            self.coordinator.acquire(filter.as_deref()).await
        };

        match tokio::time::timeout(self.budget, acquisition).await {
            Ok(Ok(image)) => EntryState::Resolved(image),
            Ok(Err(e)) => {
                warn!(error = %e, "timeline acquisition failed");
                EntryState::Failed(e.to_string())
            }
            Err(_) => {
                let e = AcquisitionError::Timeout {
                    duration: self.budget,
                };
                warn!(error = %e, "timeline acquisition exceeded its budget");
                EntryState::Failed(e.to_string())
            }
        }
    }

    fn entry_at(&self, date: DateTime<Utc>, state: EntryState) -> TimelineEntry {
        let interval = TimeDelta::from_std(self.refresh_interval)
            .unwrap_or_else(|_| TimeDelta::seconds(DEFAULT_REFRESH_INTERVAL.as_secs() as i64));
        TimelineEntry {
            date,
            next_refresh: date + interval,
            state,
        }
    }
}

/// Resolves on the next reload signal for [`WIDGET_KIND`]. Never resolves once
/// the channel is closed.
async fn next_reload(reloads: &mut broadcast::Receiver<String>) {
    loop {
        match reloads.recv().await {
            Ok(kind) if kind == WIDGET_KIND => return,
            Ok(_) => continue,
            // Missed signals still mean "reload".
            Err(broadcast::error::RecvError::Lagged(_)) => return,
            Err(broadcast::error::RecvError::Closed) => std::future::pending::<()>().await,
        }
    }
}
