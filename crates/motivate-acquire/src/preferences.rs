// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Debounced category preference store.
//!
//! Toggles update the in-memory selection immediately. A single background
//! task owns every persisted write: each toggle bumps a generation counter on
//! a `watch` channel, the task restarts its quiet-window timer, and when the
//! window elapses it saves whatever the selection is at that moment. Rapid
//! toggles therefore coalesce into one write of the final state. After each
//! committed write the background surface is asked to reload.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

use motivate_config::model::PreferencesConfig;
use motivate_core::{CategorySelection, SelectionPersistence, SurfaceReloader, WIDGET_KIND};

/// Reads the persisted selection, degrading any failure to "no filter".
pub async fn load_selection(persistence: &dyn SelectionPersistence) -> CategorySelection {
    match persistence.load().await {
        Ok(selection) => selection,
        Err(e) => {
            warn!(error = %e, "could not read category selection, using no filter");
            CategorySelection::new()
        }
    }
}

/// In-process reload signal: broadcasts the surface kind to every subscriber.
#[derive(Debug, Clone)]
pub struct ReloadBroadcaster {
    tx: broadcast::Sender<String>,
}

impl Default for ReloadBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl ReloadBroadcaster {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(16);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }
}

impl SurfaceReloader for ReloadBroadcaster {
    fn reload_timelines(&self, kind: &str) {
        // No subscribers just means no surface is running in this process.
        let receivers = self.tx.send(kind.to_string()).unwrap_or(0);
        debug!(kind, receivers, "timeline reload requested");
    }
}

type Selection = Arc<RwLock<CategorySelection>>;

fn read(selection: &Selection) -> RwLockReadGuard<'_, CategorySelection> {
    selection.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write(selection: &Selection) -> RwLockWriteGuard<'_, CategorySelection> {
    selection.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The user's category filter, with read-your-write toggles and debounced persistence.
pub struct CategoryPreferenceStore {
    selection: Selection,
    persistence: Arc<dyn SelectionPersistence>,
    changes: watch::Sender<u64>,
    flushes: mpsc::Sender<oneshot::Sender<()>>,
    writer: JoinHandle<()>,
}

impl CategoryPreferenceStore {
    /// Creates the store and spawns its writer task. Must be called inside a
    /// tokio runtime. The in-memory selection starts empty until [`load`](Self::load).
    pub fn new(
        persistence: Arc<dyn SelectionPersistence>,
        reloader: Arc<dyn SurfaceReloader>,
        debounce: Duration,
    ) -> Self {
        let selection: Selection = Arc::default();
        let (changes, changes_rx) = watch::channel(0u64);
        let (flushes, flushes_rx) = mpsc::channel(4);

        let writer = tokio::spawn(
            DebouncedWriter {
                selection: selection.clone(),
                persistence: persistence.clone(),
                reloader,
                debounce,
            }
            .run(changes_rx, flushes_rx),
        );

        Self {
            selection,
            persistence,
            changes,
            flushes,
            writer,
        }
    }

    pub fn from_config(
        persistence: Arc<dyn SelectionPersistence>,
        reloader: Arc<dyn SurfaceReloader>,
        config: &PreferencesConfig,
    ) -> Self {
        Self::new(
            persistence,
            reloader,
            Duration::from_millis(config.debounce_ms),
        )
    }

    /// Reloads the persisted selection into memory and returns it.
    ///
    /// Never fails: unreadable storage yields the empty selection.
    pub async fn load(&self) -> CategorySelection {
        let loaded = load_selection(self.persistence.as_ref()).await;
        *write(&self.selection) = loaded.clone();
        debug!(count = loaded.len(), "category selection loaded");
        loaded
    }

    /// Flips membership of `id`, returning whether it is now selected.
    ///
    /// The change is visible to [`selection`](Self::selection) immediately
    /// and persisted after the quiet window.
    pub fn toggle(&self, id: i64) -> bool {
        let selected = write(&self.selection).toggle(id);
        self.changes.send_modify(|generation| *generation += 1);
        debug!(category_id = id, selected, "category toggled");
        selected
    }

    pub fn selection(&self) -> CategorySelection {
        read(&self.selection).clone()
    }

    pub fn is_selected(&self, id: i64) -> bool {
        read(&self.selection).contains(id)
    }

    /// Persists any pending change now instead of waiting for the quiet window.
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.flushes.send(ack).await.is_err() {
            warn!("preference writer is gone, pending toggles may be lost");
            return;
        }
        if done.await.is_err() {
            warn!("preference writer stopped before acknowledging flush");
        }
    }

    /// Flushes pending changes and stops the writer task.
    pub async fn shutdown(self) {
        self.flush().await;
        let Self {
            changes, writer, ..
        } = self;
        drop(changes);
        if let Err(e) = writer.await {
            warn!(error = %e, "preference writer task failed");
        }
    }
}

/// First retry delay after a failed save, when the quiet window is shorter.
const RETRY_FLOOR: Duration = Duration::from_millis(500);
/// Failed saves back off exponentially up to this delay.
const RETRY_CAP: Duration = Duration::from_secs(30);

struct DebouncedWriter {
    selection: Selection,
    persistence: Arc<dyn SelectionPersistence>,
    reloader: Arc<dyn SurfaceReloader>,
    debounce: Duration,
}

impl DebouncedWriter {
    async fn run(
        self,
        mut changes: watch::Receiver<u64>,
        mut flushes: mpsc::Receiver<oneshot::Sender<()>>,
    ) {
        let mut deadline: Option<Instant> = None;
        let mut retry = Backoff::new(self.debounce);

        loop {
            tokio::select! {
                // A toggle issued before a flush must be seen by that flush.
                biased;

                changed = changes.changed() => {
                    if changed.is_err() {
                        // Store dropped: last attempt at anything still pending.
                        if deadline.is_some() && !self.persist().await {
                            warn!("category selection not persisted before shutdown");
                        }
                        break;
                    }
                    changes.borrow_and_update();
                    deadline = Some(Instant::now() + self.debounce);
                }
                Some(ack) = flushes.recv() => {
                    if deadline.take().is_some() && !self.persist().await {
                        deadline = Some(Instant::now() + retry.next_delay());
                    }
                    let _ = ack.send(());
                }
                () = wait_until(deadline) => {
                    deadline = None;
                    if self.persist().await {
                        retry.reset();
                    } else {
                        let delay = retry.next_delay();
                        debug!(?delay, "retrying category selection save");
                        deadline = Some(Instant::now() + delay);
                    }
                }
            }
        }
        debug!("preference writer stopped");
    }

    /// Saves the current snapshot. Returns whether the write committed.
    async fn persist(&self) -> bool {
        let snapshot = read(&self.selection).clone();
        match self.persistence.save(&snapshot).await {
            Ok(()) => {
                debug!(count = snapshot.len(), "category selection saved");
                self.reloader.reload_timelines(WIDGET_KIND);
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to persist category selection");
                false
            }
        }
    }
}

/// Capped exponential delay between failed save attempts.
struct Backoff {
    initial: Duration,
    current: Duration,
}

impl Backoff {
    fn new(debounce: Duration) -> Self {
        let initial = debounce.max(RETRY_FLOOR).min(RETRY_CAP);
        Self {
            initial,
            current: initial,
        }
    }

    fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(RETRY_CAP);
        delay
    }

    fn reset(&mut self) {
        self.current = self.initial;
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}
