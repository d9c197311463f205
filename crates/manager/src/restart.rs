// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Latest-call-wins guard for racing async requests.
//!
//! Wraps an async operation so only the most recent invocation's
//! settlement reaches callers. Superseded invocations are not aborted -
//! they run to completion and their side effects still happen - but
//! their outcome is discarded instead of racing an out-of-order reply
//! into the caller's hands.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::oneshot;

/// Errors from a restartable call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RestartError<E> {
    /// The latest invocation failed.
    #[error("{0}")]
    Failed(E),

    /// The restarter was dropped before the latest invocation settled.
    #[error("restartable call abandoned")]
    Abandoned,
}

struct RestartState<T, E> {
    generation: u64,
    waiters: Vec<oneshot::Sender<Result<T, E>>>,
}

/// Guard ensuring only the latest `perform` settles its callers.
///
/// Every caller whose invocation was superseded still observes the
/// newest invocation's outcome: waiters accumulate until the current
/// generation settles, then all of them resolve together.
pub struct Restarter<T, E> {
    state: Arc<Mutex<RestartState<T, E>>>,
}

impl<T, E> Clone for Restarter<T, E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T, E> Default for Restarter<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Restarter<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(RestartState {
                generation: 0,
                waiters: Vec::new(),
            })),
        }
    }

    /// Start `future` immediately and return a future resolving with the
    /// outcome of the most recent `perform` call.
    ///
    /// A stale settlement - one whose generation has been superseded by a
    /// newer call - is swallowed: it neither resolves waiters nor
    /// surfaces anywhere as a failure.
    pub fn perform<F>(&self, future: F) -> impl Future<Output = Result<T, RestartError<E>>>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.waiters.push(tx);
            state.generation
        };

        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let outcome = future.await;
            let waiters = {
                let mut state = state.lock();
                if state.generation != generation {
                    // Superseded by a newer call
                    return;
                }
                std::mem::take(&mut state.waiters)
            };
            for waiter in waiters {
                let _ = waiter.send(outcome.clone());
            }
        });

        async move {
            match rx.await {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(e)) => Err(RestartError::Failed(e)),
                Err(_) => Err(RestartError::Abandoned),
            }
        }
    }
}

#[cfg(test)]
#[path = "restart_tests.rs"]
mod tests;
