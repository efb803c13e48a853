// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory offline cache double.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;

use motivate_core::{CacheError, CachedImage, ImageCache};

/// An [`ImageCache`] backed by a `Vec`, serving the first entry.
#[derive(Default)]
pub struct MockCache {
    entries: Mutex<Vec<CachedImage>>,
    unreadable: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MockCache {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A cache pre-loaded with one entry.
    pub fn with_entry(bytes: impl Into<Bytes>, image_id: Option<i64>) -> Self {
        let cache = Self::default();
        lock(&cache.entries).push(CachedImage {
            bytes: bytes.into(),
            image_id,
        });
        cache
    }

    /// Makes reads fail with a storage error.
    pub fn unreadable() -> Self {
        let cache = Self::default();
        cache.unreadable.store(true, Ordering::SeqCst);
        cache
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn entries(&self) -> Vec<CachedImage> {
        lock(&self.entries).clone()
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl ImageCache for MockCache {
    async fn get_random(&self) -> Result<Option<CachedImage>, CacheError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.unreadable.load(Ordering::SeqCst) {
            return Err(CacheError::storage("mock cache is unreadable"));
        }
        Ok(lock(&self.entries).first().cloned())
    }

    async fn store(&self, image: &CachedImage) -> Result<(), CacheError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        lock(&self.entries).push(image.clone());
        Ok(())
    }
}
