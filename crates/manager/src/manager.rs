// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Caller-side job manager.
//!
//! Turns a logical call into a posted message and resolves the returned
//! future when the correlated reply arrives. Replies carry no payload;
//! successful results are read from the shared payload store and cleared
//! as part of correlation. Replies are matched strictly by id - arrival
//! order means nothing, so a slow early job settling after a fast later
//! one is handled by whoever holds the pending record, not by sequence.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use plotline_adapters::HttpAdapter;
use plotline_core::{
    FluxTable, IdGen, JobId, Message, QueryResponse, Reply, ReplyStatus, UuidIdGen,
};
use plotline_worker::handlers::dygraph::DygraphData;
use plotline_worker::handlers::fetch::{GetArgs, PostArgs};
use plotline_worker::handlers::flux::SingleStat;
use plotline_worker::handlers::proxy::ProxyArgs;
use plotline_worker::handlers::table::{TableGraphResult, TableTransformArgs, TableTransformResult};
use plotline_worker::{JobKind, PayloadStore, Worker};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// Errors surfaced by manager calls.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CallError {
    /// The worker replied with an error for this job.
    #[error("{0}")]
    Job(String),

    /// No reply arrived within the configured timeout.
    #[error("timed out waiting for job reply")]
    Timeout,

    /// The pipeline was shut down while the call was outstanding.
    #[error("job pipeline closed")]
    Closed,

    /// A success reply arrived but its payload was already gone.
    #[error("job result missing from payload store")]
    MissingResult,

    #[error("payload error: {0}")]
    Payload(String),
}

/// Construction options for a pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Bound of both message channels.
    pub channel_capacity: usize,
    /// Per-call reply timeout.
    pub call_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
            call_timeout: crate::env::timeout_call(),
        }
    }
}

struct PendingState {
    calls: HashMap<JobId, oneshot::Sender<Result<serde_json::Value, CallError>>>,
    closed: bool,
}

/// UI-thread-side façade over the worker.
///
/// Cheap to clone; clones share the pending map, the payload store, and
/// the message channel.
#[derive(Clone)]
pub struct JobManager<G: IdGen = UuidIdGen> {
    messages: mpsc::Sender<Message>,
    pending: Arc<Mutex<PendingState>>,
    store: PayloadStore,
    ids: G,
    call_timeout: Duration,
}

/// Start a worker task and return the manager connected to it.
pub fn spawn_pipeline<H: HttpAdapter>(http: H, config: PipelineConfig) -> JobManager<UuidIdGen> {
    spawn_pipeline_with_ids(http, config, UuidIdGen)
}

/// Same as [`spawn_pipeline`] with an explicit id generator (tests use a
/// sequential one).
pub fn spawn_pipeline_with_ids<H, G>(http: H, config: PipelineConfig, ids: G) -> JobManager<G>
where
    H: HttpAdapter,
    G: IdGen + 'static,
{
    let (msg_tx, msg_rx) = mpsc::channel(config.channel_capacity);
    let (reply_tx, reply_rx) = mpsc::channel(config.channel_capacity);
    let store = PayloadStore::new();

    let worker = Worker::new(msg_rx, reply_tx, store.clone(), http, ids.clone());
    tokio::spawn(worker.run());

    JobManager::connect(msg_tx, reply_rx, store, ids, config.call_timeout)
}

impl<G: IdGen + 'static> JobManager<G> {
    /// Wire a manager to an existing worker's channels.
    ///
    /// Spawns the reply pump that owns `replies` and resolves pending
    /// records as correlated replies arrive.
    pub fn connect(
        messages: mpsc::Sender<Message>,
        replies: mpsc::Receiver<Reply>,
        store: PayloadStore,
        ids: G,
        call_timeout: Duration,
    ) -> Self {
        let manager = Self {
            messages,
            pending: Arc::new(Mutex::new(PendingState {
                calls: HashMap::new(),
                closed: false,
            })),
            store,
            ids,
            call_timeout,
        };
        manager.spawn_reply_pump(replies);
        manager
    }

    fn spawn_reply_pump(&self, mut replies: mpsc::Receiver<Reply>) {
        let pending = Arc::clone(&self.pending);
        let store = self.store.clone();

        tokio::spawn(async move {
            while let Some(reply) = replies.recv().await {
                let sender = pending.lock().calls.remove(&reply.origin);
                let Some(sender) = sender else {
                    // Superseded or timed-out call; drop the orphaned payload
                    debug!(origin = %reply.origin, "reply with no pending record");
                    store.clear(&reply.origin);
                    continue;
                };

                let outcome = match reply.result {
                    ReplyStatus::Success => store
                        .read_and_clear(&reply.origin)
                        .ok_or(CallError::MissingResult),
                    ReplyStatus::Error => {
                        store.clear(&reply.origin);
                        Err(CallError::Job(
                            reply.error.unwrap_or_else(|| "job failed".to_string()),
                        ))
                    }
                };

                // The caller may have timed out and dropped its receiver
                let _ = sender.send(outcome);
            }
        });
    }

    /// Post a job and await its correlated reply.
    pub async fn call(
        &self,
        job_type: &str,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, CallError> {
        let id = self.ids.next();
        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock();
            if pending.closed {
                return Err(CallError::Closed);
            }
            pending.calls.insert(id.clone(), tx);
        }

        let message = Message {
            id: id.clone(),
            job_type: job_type.to_string(),
            payload,
        };
        if self.messages.send(message).await.is_err() {
            self.pending.lock().calls.remove(&id);
            return Err(CallError::Closed);
        }

        match tokio::time::timeout(self.call_timeout, rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(CallError::Closed),
            Err(_) => {
                // Late replies become no-ops once the record is gone
                self.pending.lock().calls.remove(&id);
                self.store.clear(&id);
                Err(CallError::Timeout)
            }
        }
    }

    /// Forward a query to the time-series API and return the raw rows.
    pub async fn proxy(
        &self,
        source: &str,
        query: &str,
        db: Option<&str>,
        rp: Option<&str>,
        uuid: Option<&str>,
    ) -> Result<QueryResponse, CallError> {
        let args = ProxyArgs {
            source: source.to_string(),
            query: query.to_string(),
            db: db.map(String::from),
            rp: rp.map(String::from),
            uuid: uuid.map(String::from),
        };
        decode(self.call(JobKind::Proxy.name(), encode(&args)?).await?)
    }

    /// Fetch a URL and return the parsed JSON document.
    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value, CallError> {
        let args = GetArgs {
            url: url.to_string(),
        };
        self.call(JobKind::Get.name(), encode(&args)?).await
    }

    /// Post a JSON body and return the parsed JSON response.
    pub async fn post_json(
        &self,
        url: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, CallError> {
        let args = PostArgs {
            url: url.to_string(),
            body,
        };
        self.call(JobKind::PostJson.name(), encode(&args)?).await
    }

    /// Sort, filter, rename, format, and paginate table cell data.
    pub async fn table_transform(
        &self,
        args: TableTransformArgs,
    ) -> Result<TableTransformResult, CallError> {
        decode(
            self.call(JobKind::TableTransform.name(), encode(&args)?)
                .await?,
        )
    }

    /// Flatten raw query results into a table-graph matrix.
    pub async fn time_series_to_table_graph(
        &self,
        response: &QueryResponse,
    ) -> Result<TableGraphResult, CallError> {
        decode(
            self.call(JobKind::TimeSeriesToTableGraph.name(), encode(response)?)
                .await?,
        )
    }

    /// Merge raw query results into a chart-ready matrix.
    pub async fn time_series_to_dygraph(
        &self,
        response: &QueryResponse,
    ) -> Result<DygraphData, CallError> {
        decode(
            self.call(JobKind::TimeSeriesToDygraph.name(), encode(response)?)
                .await?,
        )
    }

    /// Sanity-check rows: time parses, every other cell numeric or null.
    pub async fn validate_dygraph_data(
        &self,
        timeseries: Vec<Vec<serde_json::Value>>,
    ) -> Result<bool, CallError> {
        let payload = serde_json::json!({ "timeseries": timeseries });
        decode(
            self.call(JobKind::ValidateDygraphData.name(), payload)
                .await?,
        )
    }

    /// Merge flux tables into a chart-ready matrix.
    pub async fn flux_tables_to_dygraph(
        &self,
        tables: &[FluxTable],
    ) -> Result<DygraphData, CallError> {
        decode(
            self.call(JobKind::FluxToDygraph.name(), encode(&tables)?)
                .await?,
        )
    }

    /// Latest value across a flux result, for single-stat display.
    pub async fn flux_tables_to_single_stat(
        &self,
        tables: &[FluxTable],
    ) -> Result<Option<SingleStat>, CallError> {
        decode(
            self.call(JobKind::FluxToSingleStat.name(), encode(&tables)?)
                .await?,
        )
    }

    /// Number of unread payload entries (a growing backlog means leaked
    /// results).
    pub fn payload_backlog(&self) -> usize {
        self.store.len()
    }

    /// Drop payload entries older than `max_age`; returns how many were
    /// dropped.
    pub fn sweep_payloads(&self, max_age: Duration) -> usize {
        self.store.sweep(max_age)
    }

    /// Tear down: reject every outstanding call and clear the store.
    ///
    /// Subsequent calls fail fast with [`CallError::Closed`]. The worker
    /// task exits once every manager clone (and its message sender) is
    /// dropped.
    pub fn close(&self) {
        let senders: Vec<_> = {
            let mut pending = self.pending.lock();
            pending.closed = true;
            pending.calls.drain().map(|(_, sender)| sender).collect()
        };
        for sender in senders {
            let _ = sender.send(Err(CallError::Closed));
        }
        self.store.clear_all();
    }
}

fn encode<T: Serialize>(value: &T) -> Result<serde_json::Value, CallError> {
    serde_json::to_value(value).map_err(|e| CallError::Payload(e.to_string()))
}

fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, CallError> {
    serde_json::from_value(value).map_err(|e| CallError::Payload(e.to_string()))
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
