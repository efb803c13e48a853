// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted remote picker for deterministic acquisition tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use motivate_core::{ImagePicker, ImageRecord, RemoteError, RemoteErrorKind};

/// What the next calls to a [`MockPicker`] should do.
#[derive(Debug, Clone)]
pub enum PickerBehavior {
    /// Fetch returns `record`, download returns `bytes`.
    Succeed { record: ImageRecord, bytes: Bytes },
    /// Fetch fails with an error of the given kind.
    FailFetch(RemoteErrorKind),
    /// Fetch succeeds but the download answers with `status`.
    FailDownload { record: ImageRecord, status: u16 },
}

/// An [`ImagePicker`] whose outcome is set by the test.
pub struct MockPicker {
    behavior: Mutex<PickerBehavior>,
    delay: Option<Duration>,
    fetch_calls: AtomicUsize,
    download_calls: AtomicUsize,
    filters: Mutex<Vec<Option<Vec<i64>>>>,
}

impl MockPicker {
    pub fn new(behavior: PickerBehavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            delay: None,
            fetch_calls: AtomicUsize::new(0),
            download_calls: AtomicUsize::new(0),
            filters: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding(record: ImageRecord, bytes: impl Into<Bytes>) -> Self {
        Self::new(PickerBehavior::Succeed {
            record,
            bytes: bytes.into(),
        })
    }

    pub fn failing(kind: RemoteErrorKind) -> Self {
        Self::new(PickerBehavior::FailFetch(kind))
    }

    /// Makes every fetch sleep for `delay` first (for budget tests).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_behavior(&self, behavior: PickerBehavior) {
        *lock(&self.behavior) = behavior;
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.download_calls.load(Ordering::SeqCst)
    }

    /// Filters passed to `fetch_random`, oldest first.
    pub fn filters(&self) -> Vec<Option<Vec<i64>>> {
        lock(&self.filters).clone()
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn error_of_kind(kind: RemoteErrorKind) -> RemoteError {
    match kind {
        RemoteErrorKind::Network => RemoteError::Network {
            message: "mock network failure".to_string(),
            source: None,
        },
        RemoteErrorKind::Decode => RemoteError::Decode {
            message: "mock decode failure".to_string(),
            source: None,
        },
        RemoteErrorKind::Empty => RemoteError::Empty,
    }
}

#[async_trait]
impl ImagePicker for MockPicker {
    async fn fetch_random(&self, filter: Option<&[i64]>) -> Result<ImageRecord, RemoteError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.filters).push(filter.map(<[i64]>::to_vec));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let behavior = lock(&self.behavior).clone();
        match behavior {
            PickerBehavior::Succeed { record, .. } | PickerBehavior::FailDownload { record, .. } => {
                Ok(record)
            }
            PickerBehavior::FailFetch(kind) => Err(error_of_kind(kind)),
        }
    }

    fn build_public_url(&self, filename: &str) -> Result<Url, RemoteError> {
        Url::parse("https://objects.mock.invalid/public/")
            .and_then(|base| base.join(filename))
            .map_err(|e| RemoteError::network("mock url", e))
    }

    async fn download_bytes(&self, _url: &Url) -> Result<Bytes, RemoteError> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        let behavior = lock(&self.behavior).clone();
        match behavior {
            PickerBehavior::Succeed { bytes, .. } => Ok(bytes),
            PickerBehavior::FailDownload { status, .. } => Err(RemoteError::HttpStatus { status }),
            PickerBehavior::FailFetch(kind) => Err(error_of_kind(kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ImageRecord {
        ImageRecord {
            id: 1,
            image_url: "one.png".to_string(),
        }
    }

    #[tokio::test]
    async fn records_calls_and_filters() {
        let picker = MockPicker::succeeding(record(), &b"img"[..]);
        picker.fetch_random(Some(&[3])).await.unwrap();
        picker.fetch_random(None).await.unwrap();
        assert_eq!(picker.fetch_calls(), 2);
        assert_eq!(picker.filters(), vec![Some(vec![3]), None]);
    }

    #[tokio::test]
    async fn behavior_can_be_switched() {
        let picker = MockPicker::succeeding(record(), &b"img"[..]);
        picker.set_behavior(PickerBehavior::FailFetch(RemoteErrorKind::Empty));
        assert!(matches!(
            picker.fetch_random(None).await,
            Err(RemoteError::Empty)
        ));
    }
}
