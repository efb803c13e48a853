// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory selection persistence and a recording reload signal.

use std::sync::Mutex;
use std::time::Duration;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use motivate_core::{CategorySelection, MotivateError, SelectionPersistence, SurfaceReloader};

/// A [`SelectionPersistence`] that keeps the last saved selection in memory.
#[derive(Default)]
pub struct MemoryPersistence {
    stored: Mutex<Option<CategorySelection>>,
    saves: AtomicUsize,
    attempts: AtomicUsize,
    failing: AtomicBool,
    load_delay: Option<Duration>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `selection` already persisted.
    pub fn with_selection(selection: CategorySelection) -> Self {
        let persistence = Self::default();
        *lock(&persistence.stored) = Some(selection);
        persistence
    }

    /// Makes every load take `delay` before answering.
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = Some(delay);
        self
    }

    /// Makes every load and save fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Save calls made, including failed ones.
    pub fn save_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Option<CategorySelection> {
        lock(&self.stored).clone()
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl SelectionPersistence for MemoryPersistence {
    async fn load(&self) -> Result<CategorySelection, MotivateError> {
        if let Some(delay) = self.load_delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(MotivateError::Internal("mock persistence failure".to_string()));
        }
        Ok(lock(&self.stored).clone().unwrap_or_default())
    }

    async fn save(&self, selection: &CategorySelection) -> Result<(), MotivateError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(MotivateError::Internal("mock persistence failure".to_string()));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        *lock(&self.stored) = Some(selection.clone());
        Ok(())
    }

    async fn revision(&self) -> Result<Option<i64>, MotivateError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MotivateError::Internal("mock persistence failure".to_string()));
        }
        let saves = self.saves() as i64;
        Ok(lock(&self.stored).as_ref().map(|_| saves))
    }
}

/// A [`SurfaceReloader`] that records every surface kind it is asked to reload.
#[derive(Default)]
pub struct RecordingReloader {
    kinds: Mutex<Vec<String>>,
}

impl RecordingReloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(&self) -> Vec<String> {
        lock(&self.kinds).clone()
    }
}

impl SurfaceReloader for RecordingReloader {
    fn reload_timelines(&self, kind: &str) {
        lock(&self.kinds).push(kind.to_string());
    }
}
