// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chart-series transforms (`TSTODYGRAPH`, `VALIDATEDYGRAPHDATA`).
//!
//! Raw query results become a single merged time axis with one column per
//! `series.field` pair; timestamps missing from a series are filled with
//! nulls so every row has the same width.

use std::collections::BTreeMap;

use plotline_core::{QueryResponse, Series};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{time_to_ms, TIME_COLUMN};

/// Chart-ready structure: one merged time axis, one column per field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DygraphData {
    /// `time` followed by one `series.field` label per value column.
    pub labels: Vec<String>,
    /// Rows sorted by timestamp; null where a series has no sample.
    pub timeseries: Vec<Vec<Value>>,
}

/// Arguments for the `VALIDATEDYGRAPHDATA` job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidateArgs {
    pub timeseries: Vec<Vec<Value>>,
}

/// Merge raw query results into a dygraph-shaped matrix.
pub fn time_series_to_dygraph(response: &QueryResponse) -> DygraphData {
    let mut labels = vec![TIME_COLUMN.to_string()];
    for series in all_series(response) {
        let Some(time_idx) = time_index(series) else {
            continue;
        };
        for (idx, column) in series.columns.iter().enumerate() {
            if idx != time_idx {
                labels.push(series_label(series, column));
            }
        }
    }

    let width = labels.len() - 1;
    let mut rows: BTreeMap<i64, Vec<Value>> = BTreeMap::new();
    let mut offset = 0;
    for series in all_series(response) {
        let Some(time_idx) = time_index(series) else {
            continue;
        };
        let field_count = series.columns.len().saturating_sub(1);
        for row in &series.values {
            let Some(ms) = row.get(time_idx).and_then(time_to_ms) else {
                continue;
            };
            let cells = rows.entry(ms).or_insert_with(|| vec![Value::Null; width]);
            let mut col = 0;
            for idx in 0..series.columns.len() {
                if idx == time_idx {
                    continue;
                }
                cells[offset + col] = row.get(idx).cloned().unwrap_or(Value::Null);
                col += 1;
            }
        }
        offset += field_count;
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

/// True iff every row's first cell parses as a time and every other cell
/// is numeric or null.
pub fn validate_dygraph_data(timeseries: &[Vec<Value>]) -> bool {
    timeseries.iter().all(|row| {
        let mut cells = row.iter();
        let Some(time) = cells.next() else {
            return false;
        };
        time_to_ms(time).is_some() && cells.all(|cell| cell.is_number() || cell.is_null())
    })
}

fn all_series(response: &QueryResponse) -> impl Iterator<Item = &Series> {
    response
        .results
        .iter()
        .flat_map(|result| result.series.iter())
}

fn time_index(series: &Series) -> Option<usize> {
    series.columns.iter().position(|c| c == TIME_COLUMN)
}

fn series_label(series: &Series, column: &str) -> String {
    if series.name.is_empty() {
        column.to_string()
    } else {
        format!("{}.{}", series.name, column)
    }
}

#[cfg(test)]
#[path = "dygraph_tests.rs"]
mod tests;
