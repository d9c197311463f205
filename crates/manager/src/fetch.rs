// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cancellable fetch-until loop and chunked fetching.
//!
//! The driver issues requests strictly one at a time and re-checks its
//! stop conditions before each request, never after the fact. True
//! aborts are not attempted: cancellation stops new requests from being
//! issued and then waits out the one in flight.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The predicate became true.
    Done,
    /// Cancellation was requested before the predicate became true.
    Canceled,
}

/// Cancellation signal for a running loop.
///
/// Cheap to clone and hand to another task; flipping it stops new
/// requests but does not wait for the in-flight one - await the handle's
/// [`FetchUntil::wait`] for that.
#[derive(Clone)]
pub struct FetchCancel {
    flag: Arc<AtomicBool>,
}

impl FetchCancel {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_canceled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Handle to a running fetch-until loop.
pub struct FetchUntil<E> {
    canceled: Arc<AtomicBool>,
    driver: JoinHandle<Result<FetchOutcome, E>>,
}

impl<E> FetchUntil<E> {
    /// Whether cancellation has been requested.
    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }

    /// Cancellation signal usable from another task.
    pub fn canceler(&self) -> FetchCancel {
        FetchCancel {
            flag: Arc::clone(&self.canceled),
        }
    }

    /// Request cancellation and wait until the in-flight request settles.
    ///
    /// No further requests are issued once this returns.
    pub async fn cancel(self) -> Result<FetchOutcome, E> {
        self.canceled.store(true, Ordering::SeqCst);
        self.wait().await
    }

    /// Wait for the loop to finish.
    ///
    /// A request error terminates the loop early and surfaces here; a
    /// driver that went away without an outcome reports `Canceled`.
    pub async fn wait(self) -> Result<FetchOutcome, E> {
        match self.driver.await {
            Ok(outcome) => outcome,
            Err(_) => Ok(FetchOutcome::Canceled),
        }
    }
}

/// Repeatedly await `request()` until `predicate()` is true or the loop
/// is canceled.
///
/// Both conditions are checked before each request, so a request is
/// never issued after the predicate first turns true, and two requests
/// are never in flight at once.
pub fn fetch_until<P, R, Fut, E>(mut predicate: P, mut request: R) -> FetchUntil<E>
where
    P: FnMut() -> bool + Send + 'static,
    R: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), E>> + Send,
    E: Send + 'static,
{
    let canceled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&canceled);

    let driver = tokio::spawn(async move {
        loop {
            if flag.load(Ordering::SeqCst) {
                return Ok(FetchOutcome::Canceled);
            }
            if predicate() {
                return Ok(FetchOutcome::Done);
            }
            request().await?;
        }
    });

    FetchUntil { canceled, driver }
}

/// Options for chunked fetching.
#[derive(Debug, Clone)]
pub struct ChunkOptions {
    /// Stop once the measured size has grown by this much.
    pub chunk_size: usize,
    /// Hard cap on request iterations; `None` keeps fetching.
    pub max_fetch_count: Option<usize>,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            chunk_size: 100,
            max_fetch_count: None,
        }
    }
}

/// Fetch until a chunk's worth of data has accumulated.
///
/// Growth is measured through `current_size` relative to its value when
/// the loop starts; the iteration cap wins if it is reached first.
pub fn fetch_chunk<S, R, Fut, E>(current_size: S, request: R, options: ChunkOptions) -> FetchUntil<E>
where
    S: Fn() -> usize + Send + 'static,
    R: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), E>> + Send,
    E: Send + 'static,
{
    let start_size = current_size();
    let ChunkOptions {
        chunk_size,
        max_fetch_count,
    } = options;

    let count = Arc::new(AtomicUsize::new(0));
    let issued = Arc::clone(&count);
    let mut request = request;

    fetch_until(
        move || {
            current_size().saturating_sub(start_size) >= chunk_size
                || max_fetch_count.is_some_and(|max| count.load(Ordering::SeqCst) >= max)
        },
        move || {
            issued.fetch_add(1, Ordering::SeqCst);
            request()
        },
    )
}

#[cfg(test)]
#[path = "fetch_tests.rs"]
mod tests;
