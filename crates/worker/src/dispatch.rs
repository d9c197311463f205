// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker dispatch loop.
//!
//! Receives message envelopes from the manager, runs the registered
//! handler for each, and posts back a correlated reply. Every message is
//! handled in its own task, so jobs run concurrently and a failing
//! handler never takes the loop down. Successful results are written to
//! the payload store under the message id; the reply itself carries only
//! the correlation fields.

use std::sync::Arc;

use plotline_adapters::HttpAdapter;
use plotline_core::{IdGen, JobId, Message, Reply, UNKNOWN_JOB_TYPE};
use tokio::sync::mpsc;
use tracing::{debug, warn, Instrument};

use crate::registry::{self, JobKind};
use crate::store::PayloadStore;

/// Background job executor: one per pipeline.
pub struct Worker<H, G> {
    inbox: mpsc::Receiver<Message>,
    replies: mpsc::Sender<Reply>,
    store: PayloadStore,
    http: Arc<H>,
    ids: G,
}

impl<H, G> Worker<H, G>
where
    H: HttpAdapter,
    G: IdGen + 'static,
{
    pub fn new(
        inbox: mpsc::Receiver<Message>,
        replies: mpsc::Sender<Reply>,
        store: PayloadStore,
        http: H,
        ids: G,
    ) -> Self {
        Self {
            inbox,
            replies,
            store,
            http: Arc::new(http),
            ids,
        }
    }

    /// Run until the inbox closes, spawning a task per message.
    pub async fn run(mut self) {
        while let Some(message) = self.inbox.recv().await {
            let replies = self.replies.clone();
            let store = self.store.clone();
            let http = Arc::clone(&self.http);
            let reply_id = self.ids.next();

            let span =
                tracing::info_span!("job", job_type = %message.job_type, id = %message.id);
            tokio::spawn(
                async move {
                    let reply = handle_message(message, &store, http.as_ref(), reply_id).await;
                    if replies.send(reply).await.is_err() {
                        debug!("reply channel closed, dropping reply");
                    }
                }
                .instrument(span),
            );
        }
        debug!("inbox closed, dispatch loop exiting");
    }
}

/// Execute one message and build its correlated reply.
async fn handle_message<H: HttpAdapter>(
    message: Message,
    store: &PayloadStore,
    http: &H,
    reply_id: JobId,
) -> Reply {
    let Message {
        id: origin,
        job_type,
        payload,
    } = message;

    let Some(kind) = JobKind::parse(&job_type) else {
        warn!("unknown job type");
        return Reply::error(reply_id, origin, UNKNOWN_JOB_TYPE);
    };

    let start = std::time::Instant::now();
    let result = registry::run_job(kind, payload, http).await;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(value) => {
            tracing::info!(elapsed_ms, "completed");
            store.write(origin.clone(), value);
            Reply::success(reply_id, origin)
        }
        Err(e) => {
            tracing::error!(elapsed_ms, error = %e, "failed");
            // No partial result may linger for an errored job
            store.clear(&origin);
            Reply::error(reply_id, origin, e.to_string())
        }
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
