// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job handlers.
//!
//! Transforms are pure functions of their deserialized arguments; I/O
//! handlers go through the HTTP adapter. No handler retains state across
//! invocations.

pub mod dygraph;
pub mod fetch;
pub mod flux;
pub mod proxy;
pub mod table;

/// Column name identifying the time axis in raw rows.
pub const TIME_COLUMN: &str = "time";

/// Parse a cell as a timestamp in epoch milliseconds.
///
/// Accepts numbers (already epoch ms) and RFC 3339 strings; anything else
/// is not a time.
pub(crate) fn time_to_ms(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64)),
        serde_json::Value::String(s) => chrono::DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|t| t.timestamp_millis()),
        _ => None,
    }
}
