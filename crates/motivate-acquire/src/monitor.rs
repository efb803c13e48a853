// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Advisory connectivity state.
//!
//! The monitor only records what the last acquisitions observed. The
//! coordinator always attempts the remote path regardless of its value, so a
//! stale "offline" reading can never block a recovered network.

use std::sync::Arc;

use motivate_core::{Connectivity, RemoteError, RemoteErrorKind};
use tokio::sync::watch;
use tracing::info;

/// Publishes the last observed [`Connectivity`] through a watch channel.
#[derive(Debug, Clone)]
pub struct NetworkMonitor {
    state: Arc<watch::Sender<Connectivity>>,
}

impl Default for NetworkMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkMonitor {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Connectivity::Unknown);
        Self {
            state: Arc::new(tx),
        }
    }

    pub fn current(&self) -> Connectivity {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Connectivity> {
        self.state.subscribe()
    }

    /// The backend answered and the image was downloaded.
    pub fn report_success(&self) {
        self.set(Connectivity::Online);
    }

    /// A remote attempt failed. Only transport-level failures mean offline;
    /// an empty or undecodable answer still proves the backend is reachable.
    pub fn report_failure(&self, error: &RemoteError) {
        match error.kind() {
            RemoteErrorKind::Network => self.set(Connectivity::Offline),
            RemoteErrorKind::Decode | RemoteErrorKind::Empty => self.set(Connectivity::Online),
        }
    }

    fn set(&self, next: Connectivity) {
        let changed = self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
        if changed {
            info!(connectivity = %next, "connectivity changed");
        }
    }
}
