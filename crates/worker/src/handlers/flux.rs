// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Flux table transforms (`FLUXTODYGRAPH`, `FLUXTOSINGLESTAT`).
//!
//! Flux tables carry their header as the first data row; the `_time` and
//! `_value` columns drive both transforms. Tables missing either column
//! are skipped.

use std::collections::BTreeMap;

use plotline_core::FluxTable;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::dygraph::DygraphData;
use super::{time_to_ms, TIME_COLUMN};

const FLUX_TIME: &str = "_time";
const FLUX_VALUE: &str = "_value";

/// Latest value across a flux result, for single-stat display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SingleStat {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
}

/// Merge flux tables into a dygraph-shaped matrix, one column per table.
pub fn flux_tables_to_dygraph(tables: &[FluxTable]) -> DygraphData {
    let usable: Vec<(&FluxTable, usize, usize)> = tables
        .iter()
        .filter_map(|table| {
            let header = table.data.first()?;
            let time_idx = column_index(header, FLUX_TIME)?;
            let value_idx = column_index(header, FLUX_VALUE)?;
            Some((table, time_idx, value_idx))
        })
        .collect();

    let mut labels = vec![TIME_COLUMN.to_string()];
    labels.extend(usable.iter().map(|(table, _, _)| table_label(table)));

    let width = usable.len();
    let mut rows: BTreeMap<i64, Vec<Value>> = BTreeMap::new();
    for (col, (table, time_idx, value_idx)) in usable.iter().enumerate() {
        for row in table.data.iter().skip(1) {
            let Some(ms) = row.get(*time_idx).and_then(time_to_ms) else {
                continue;
            };
            let cells = rows.entry(ms).or_insert_with(|| vec![Value::Null; width]);
            cells[col] = row.get(*value_idx).cloned().unwrap_or(Value::Null);
        }
    }

    let timeseries = rows
        .into_iter()
        .map(|(ms, cells)| {
            let mut row = Vec::with_capacity(width + 1);
            row.push(Value::from(ms));
            row.extend(cells);
            row
        })
        .collect();

    DygraphData { labels, timeseries }
}

/// Latest numeric `_value` across the tables, if any.
pub fn flux_tables_to_single_stat(tables: &[FluxTable]) -> Option<SingleStat> {
    let mut latest: Option<SingleStat> = None;
    for table in tables {
        let mut rows = table.data.iter();
        let Some(header) = rows.next() else {
            continue;
        };
        let Some(value_idx) = column_index(header, FLUX_VALUE) else {
            continue;
        };
        let time_idx = column_index(header, FLUX_TIME);

        for row in rows {
            let Some(value) = row.get(value_idx).and_then(Value::as_f64) else {
                continue;
            };
            let time = time_idx.and_then(|idx| row.get(idx)).and_then(time_to_ms);
            let newer = latest.as_ref().is_none_or(|current| time >= current.time);
            if newer {
                latest = Some(SingleStat { value, time });
            }
        }
    }
    latest
}

fn column_index(header: &[Value], name: &str) -> Option<usize> {
    header.iter().position(|cell| cell.as_str() == Some(name))
}

/// A table is labeled by its name, else by its group key, else by its id.
fn table_label(table: &FluxTable) -> String {
    if !table.name.is_empty() {
        return table.name.clone();
    }
    let mut parts: Vec<String> = table
        .group_key
        .iter()
        .filter(|(key, _)| !key.starts_with('_'))
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    parts.sort();
    if parts.is_empty() {
        table.id.clone()
    } else {
        parts.join(" ")
    }
}

#[cfg(test)]
#[path = "flux_tests.rs"]
mod tests;
