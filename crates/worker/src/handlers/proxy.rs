// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Query proxy handler (`PROXY`)

use plotline_adapters::{HttpAdapter, HttpError};
use plotline_core::QueryResponse;
use serde::{Deserialize, Serialize};

use crate::registry::JobError;

/// Arguments for the `PROXY` job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProxyArgs {
    /// Proxy endpoint of the selected source.
    pub source: String,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rp: Option<String>,
    /// Caller-supplied correlation uuid echoed back in the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

/// Forward a query to the time-series API and return the raw rows.
///
/// Statement-level errors stay inside the result set; only a failed
/// request becomes a job error, carrying the server's message.
pub async fn proxy<H: HttpAdapter>(args: ProxyArgs, http: &H) -> Result<QueryResponse, JobError> {
    let body = serde_json::json!({
        "query": args.query,
        "db": args.db,
        "rp": args.rp,
        "uuid": args.uuid,
    });

    let raw = match http.post_json(&args.source, &body).await {
        Ok(raw) => raw,
        Err(HttpError::Status { status, body }) => {
            return Err(JobError::Query(error_message(status, &body)))
        }
        Err(e) => return Err(e.into()),
    };

    let mut response: QueryResponse = serde_json::from_value(raw)?;
    if response.uuid.is_none() {
        response.uuid = args.uuid;
    }
    Ok(response)
}

/// Pull `error`/`message` out of an error body, falling back to the status.
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| format!("query failed with status {status}"))
}

#[cfg(test)]
#[path = "proxy_tests.rs"]
mod tests;
