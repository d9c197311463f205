// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message and reply envelopes crossing the worker boundary.
//!
//! Requests carry their payload inline; successful results travel
//! out-of-band through the payload store, keyed by the reply's `origin`.

use serde::{Deserialize, Serialize};

use crate::id::JobId;

/// Fixed error message for a request whose job type is not registered.
pub const UNKNOWN_JOB_TYPE: &str = "unknown job type";

/// Request envelope sent from the manager to the worker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: JobId,
    #[serde(rename = "type")]
    pub job_type: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Outcome tag carried by a reply envelope.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    Success,
    Error,
}

/// Reply envelope posted back by the worker.
///
/// `origin` equals the originating message's id; correlation is by exact
/// match on that field, never by arrival order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reply {
    pub id: JobId,
    pub origin: JobId,
    pub result: ReplyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Reply {
    /// Success reply correlated to `origin`.
    pub fn success(id: JobId, origin: JobId) -> Self {
        Self {
            id,
            origin,
            result: ReplyStatus::Success,
            error: None,
        }
    }

    /// Error reply correlated to `origin`, carrying a human-readable message.
    pub fn error(id: JobId, origin: JobId, message: impl Into<String>) -> Self {
        Self {
            id,
            origin,
            result: ReplyStatus::Error,
            error: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result == ReplyStatus::Success
    }
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
