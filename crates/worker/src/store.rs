// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared payload store for out-of-band job results.
//!
//! Results are written by the worker under the message id and read exactly
//! once by the manager's reply pump. Every write is paired with one
//! read-and-clear; entries are timestamped so abandoned results can be
//! swept instead of accumulating.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use plotline_core::JobId;

struct Entry {
    value: serde_json::Value,
    written_at: Instant,
}

/// Keyed handoff store shared between the worker and the manager.
///
/// Clones share the same underlying map. Keys are message ids, so
/// concurrent jobs never collide.
#[derive(Clone, Default)]
pub struct PayloadStore {
    inner: Arc<Mutex<HashMap<JobId, Entry>>>,
}

impl PayloadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a result under `id`. Overwrites any unread entry for the same id.
    pub fn write(&self, id: JobId, value: serde_json::Value) {
        self.inner.lock().insert(
            id,
            Entry {
                value,
                written_at: Instant::now(),
            },
        );
    }

    /// Take the entry for `id`, clearing it. A second read returns `None`.
    pub fn read_and_clear(&self, id: &JobId) -> Option<serde_json::Value> {
        self.inner.lock().remove(id).map(|entry| entry.value)
    }

    /// Drop the entry for `id` if present (error-path cleanup).
    pub fn clear(&self, id: &JobId) {
        self.inner.lock().remove(id);
    }

    /// Drop entries older than `max_age`; returns how many were dropped.
    pub fn sweep(&self, max_age: Duration) -> usize {
        let mut inner = self.inner.lock();
        let before = inner.len();
        inner.retain(|_, entry| entry.written_at.elapsed() < max_age);
        before - inner.len()
    }

    /// Remove every entry (pipeline teardown).
    pub fn clear_all(&self) {
        self.inner.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
