// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! plotline-manager: caller-side façade and async guards for the pipeline

mod env;
mod fetch;
mod manager;
mod restart;

pub use fetch::{fetch_chunk, fetch_until, ChunkOptions, FetchCancel, FetchOutcome, FetchUntil};
pub use manager::{spawn_pipeline, spawn_pipeline_with_ids, CallError, JobManager, PipelineConfig};
pub use restart::{RestartError, Restarter};
