// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error taxonomy for the Motivate image pipeline.
//!
//! Remote failures are downgraded to the cache path by the coordinator, so
//! [`RemoteError`] and [`CacheError`] rarely reach a user directly. Only
//! [`AcquisitionError`] is meant to be shown, and it keeps both sides of the
//! failure inspectable.

use std::time::Duration;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Workspace-wide error for infrastructure operations (config, storage, startup).
#[derive(Debug, Error)]
pub enum MotivateError {
    /// Configuration errors (invalid TOML, missing backend URL, bad header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database open, migration, query failure).
    #[error("storage error: {source}")]
    Storage { source: BoxError },

    /// A backend call failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`RemoteError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    Network,
    Decode,
    Empty,
}

/// Failure of a single call against the image backend.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Transport failure: connect, TLS, timeout, or a dropped body.
    #[error("network error: {message}")]
    Network {
        message: String,
        source: Option<BoxError>,
    },

    /// The backend answered but the payload could not be decoded.
    #[error("failed to decode backend response: {message}")]
    Decode {
        message: String,
        source: Option<BoxError>,
    },

    /// The backend answered with no matching row.
    #[error("backend returned no matching image")]
    Empty,

    /// The backend answered with an unexpected HTTP status.
    #[error("backend returned HTTP {status}")]
    HttpStatus { status: u16 },
}

impl RemoteError {
    /// Builds a [`RemoteError::Network`] from any transport error.
    pub fn network(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Builds a [`RemoteError::Decode`] from any parse error.
    pub fn decode(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Decode {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Non-200 statuses count as network failures for fallback purposes.
    pub fn kind(&self) -> RemoteErrorKind {
        match self {
            Self::Network { .. } | Self::HttpStatus { .. } => RemoteErrorKind::Network,
            Self::Decode { .. } => RemoteErrorKind::Decode,
            Self::Empty => RemoteErrorKind::Empty,
        }
    }
}

/// Failure to produce an entry from the offline cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache holds no entries.
    #[error("no offline images available")]
    Empty,

    /// The cache could not be read or written.
    #[error("offline cache unavailable: {source}")]
    Storage { source: BoxError },
}

impl CacheError {
    pub fn storage(source: impl Into<BoxError>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }
}

/// Terminal failure of an acquisition: nothing could be shown.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// The remote attempt failed and the cache had nothing to offer.
    #[error("network error and no offline fallback ({remote}); {cache}")]
    NoFallbackAvailable {
        remote: RemoteError,
        cache: CacheError,
    },

    /// The whole acquire-then-fallback sequence exceeded its budget.
    #[error("image acquisition timed out after {duration:?}")]
    Timeout { duration: Duration },
}

impl AcquisitionError {
    /// The remote failure that started the fallback, if any.
    pub fn remote_failure(&self) -> Option<&RemoteError> {
        match self {
            Self::NoFallbackAvailable { remote, .. } => Some(remote),
            Self::Timeout { .. } => None,
        }
    }

    /// The cache-side reason the fallback produced nothing, if any.
    pub fn cache_failure(&self) -> Option<&CacheError> {
        match self {
            Self::NoFallbackAvailable { cache, .. } => Some(cache),
            Self::Timeout { .. } => None,
        }
    }

    /// True when the cache was reachable but specifically empty.
    pub fn is_cache_empty(&self) -> bool {
        matches!(self.cache_failure(), Some(CacheError::Empty))
    }
}
