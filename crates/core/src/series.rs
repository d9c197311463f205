// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Raw time-series payload model shared by handlers and callers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Response body returned by the time-series proxy endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<QueryResult>,
    /// Correlation uuid echoed back so callers can match in-flight queries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

/// A single statement's result set.
///
/// A statement can fail independently of the request; its `error` travels
/// alongside sibling results rather than failing the whole response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct QueryResult {
    #[serde(default)]
    pub series: Vec<Series>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One measurement's rows: column names plus value rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Series {
    #[serde(default)]
    pub name: String,
    pub columns: Vec<String>,
    pub values: Vec<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,
}

/// A flux result table: header row first, then data rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FluxTable {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub group_key: HashMap<String, String>,
    pub data: Vec<Vec<serde_json::Value>>,
}

#[cfg(test)]
#[path = "series_tests.rs"]
mod tests;
