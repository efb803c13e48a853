// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the remote client, the storage layer, and the
//! acquisition pipeline.

use std::collections::BTreeSet;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::warn;

/// Shared key under which the category selection is persisted.
pub const SELECTED_CATEGORIES_KEY: &str = "selectedCategoryIDs";

/// Surface kind identifier of the background display surface.
pub const WIDGET_KIND: &str = "MotivationWidgetExtension";

/// A category from the backend catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// The user's category filter.
///
/// An empty selection means "no filter" (fully random), not "nothing allowed".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySelection(BTreeSet<i64>);

impl CategorySelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = i64>) -> Self {
        Self(ids.into_iter().collect())
    }

    /// Decodes the string-encoded form used for cross-process persistence.
    ///
    /// Entries that are not valid integers are skipped.
    pub fn from_persisted<S: AsRef<str>>(encoded: &[S]) -> Self {
        let mut ids = BTreeSet::new();
        for raw in encoded {
            match raw.as_ref().trim().parse::<i64>() {
                Ok(id) => {
                    ids.insert(id);
                }
                Err(_) => warn!(value = raw.as_ref(), "skipping unparseable category id"),
            }
        }
        Self(ids)
    }

    /// Encodes the selection as strings for cross-process persistence.
    pub fn to_persisted(&self) -> Vec<String> {
        self.0.iter().map(|id| id.to_string()).collect()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.0.contains(&id)
    }

    /// Flips membership of `id` and returns whether it is now selected.
    pub fn toggle(&mut self, id: i64) -> bool {
        if self.0.remove(&id) {
            false
        } else {
            self.0.insert(id);
            true
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().copied()
    }

    /// The filter to send to the backend: `None` when unfiltered.
    pub fn as_filter(&self) -> Option<Vec<i64>> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.iter().copied().collect())
        }
    }
}

/// Remote image metadata returned by the random-image RPC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: i64,
    /// Object filename inside the public bucket.
    pub image_url: String,
}

/// Where an acquired image came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Remote,
    Cache,
}

/// An image held by the offline cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedImage {
    pub bytes: Bytes,
    pub image_id: Option<i64>,
}

/// Raw image bytes plus provenance, ready to hand to a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquiredImage {
    pub bytes: Bytes,
    pub provenance: Provenance,
    pub image_id: Option<i64>,
}

impl AcquiredImage {
    pub fn from_remote(record: &ImageRecord, bytes: Bytes) -> Self {
        Self {
            bytes,
            provenance: Provenance::Remote,
            image_id: Some(record.id),
        }
    }

    pub fn from_cache(cached: CachedImage) -> Self {
        Self {
            bytes: cached.bytes,
            provenance: Provenance::Cache,
            image_id: cached.image_id,
        }
    }
}

/// A user's reaction to a displayed image.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Like,
    Dislike,
}

/// Advisory connectivity state. Never used to skip a remote attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum Connectivity {
    #[default]
    Unknown,
    Online,
    Offline,
}

/// What a timeline entry shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryState {
    /// Static preview; produced without any I/O.
    Placeholder,
    /// An acquisition is in flight.
    Loading,
    Resolved(AcquiredImage),
    Failed(String),
}

impl EntryState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved(_) | Self::Failed(_))
    }
}

/// One entry of the background surface's timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub date: DateTime<Utc>,
    pub next_refresh: DateTime<Utc>,
    pub state: EntryState,
}

impl TimelineEntry {
    pub fn image_id(&self) -> Option<i64> {
        match &self.state {
            EntryState::Resolved(image) => image.image_id,
            _ => None,
        }
    }
}

/// When the host should ask for the next timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPolicy {
    After(DateTime<Utc>),
}

/// The value returned to the host for the background surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    pub entries: Vec<TimelineEntry>,
    pub policy: RefreshPolicy,
}
