// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Table transforms (`TABLETRANSFORM`, `TSTOTABLEGRAPH`).
//!
//! `TSTOTABLEGRAPH` flattens raw query results into a matrix with the
//! label row first; `TABLETRANSFORM` sorts, filters, renames, formats,
//! and paginates such a matrix according to the caller's field options.

use std::cmp::Ordering;

use indexmap::IndexMap;
use plotline_core::QueryResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::dygraph::{time_series_to_dygraph, DygraphData};
use super::{time_to_ms, TIME_COLUMN};

/// Sort direction for table cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Sort configuration: which column, which way.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SortOptions {
    /// Internal name of the sort column; unknown names leave the order as-is.
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Per-field display options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldOption {
    pub internal_name: String,
    /// Empty falls back to the internal name.
    #[serde(default)]
    pub display_name: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

/// Pagination window; `limit` 0 means all rows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PageOptions {
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub limit: usize,
}

/// Arguments for the `TABLETRANSFORM` job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableTransformArgs {
    /// Matrix with the label row first.
    pub data: Vec<Vec<Value>>,
    #[serde(default)]
    pub sort: SortOptions,
    #[serde(default)]
    pub field_options: Vec<FieldOption>,
    /// Strftime-style format for the time column; empty leaves raw values.
    #[serde(default)]
    pub time_format: String,
    #[serde(default)]
    pub page: PageOptions,
}

/// Result of `TABLETRANSFORM`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableTransformResult {
    /// Label row after reordering, visibility filtering, and renaming.
    pub labels: Vec<String>,
    /// Data rows, sorted and paginated.
    pub rows: Vec<Vec<Value>>,
    /// Total row count before pagination.
    pub total_rows: usize,
}

/// Result of `TSTOTABLEGRAPH`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableGraphResult {
    /// Matrix with the label row first, time column leading.
    pub data: Vec<Vec<Value>>,
    pub sorted_labels: Vec<String>,
}

/// Flatten raw query results into a table-graph matrix.
pub fn time_series_to_table_graph(response: &QueryResponse) -> TableGraphResult {
    let DygraphData { labels, timeseries } = time_series_to_dygraph(response);

    let mut data = Vec::with_capacity(timeseries.len() + 1);
    data.push(labels.iter().cloned().map(Value::String).collect());
    data.extend(timeseries);

    TableGraphResult {
        data,
        sorted_labels: labels,
    }
}

/// Sort, filter, rename, format, and paginate table cell data.
pub fn table_transform(args: TableTransformArgs) -> TableTransformResult {
    let mut source = args.data.into_iter();
    let Some(label_row) = source.next() else {
        return TableTransformResult {
            labels: vec![],
            rows: vec![],
            total_rows: 0,
        };
    };
    let labels: Vec<String> = label_row.iter().map(cell_text).collect();
    let mut rows: Vec<Vec<Value>> = source.collect();

    // Sort on the original column order, before any column is dropped
    if let Some(sort_idx) = labels.iter().position(|l| *l == args.sort.field) {
        rows.sort_by(|a, b| {
            let ordering = compare_cells(
                a.get(sort_idx).unwrap_or(&Value::Null),
                b.get(sort_idx).unwrap_or(&Value::Null),
            );
            match args.sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    // Field options keyed by internal name, insertion order preserved
    let options: IndexMap<&str, &FieldOption> = args
        .field_options
        .iter()
        .map(|f| (f.internal_name.as_str(), f))
        .collect();

    // Configured fields first in option order, then the remainder as-is
    let mut order: Vec<usize> = Vec::with_capacity(labels.len());
    for name in options.keys() {
        if let Some(idx) = labels.iter().position(|l| l == name) {
            order.push(idx);
        }
    }
    for (idx, label) in labels.iter().enumerate() {
        if !options.contains_key(label.as_str()) {
            order.push(idx);
        }
    }
    order.retain(|&idx| options.get(labels[idx].as_str()).is_none_or(|f| f.visible));

    let total_rows = rows.len();
    let rows = paginate(rows, args.page);

    let time_idx = labels.iter().position(|l| l == TIME_COLUMN);
    let out_labels = order
        .iter()
        .map(|&idx| {
            options
                .get(labels[idx].as_str())
                .filter(|f| !f.display_name.is_empty())
                .map(|f| f.display_name.clone())
                .unwrap_or_else(|| labels[idx].clone())
        })
        .collect();

    let out_rows = rows
        .into_iter()
        .map(|row| {
            order
                .iter()
                .map(|&idx| {
                    let cell = row.get(idx).cloned().unwrap_or(Value::Null);
                    if time_idx == Some(idx) && !args.time_format.is_empty() {
                        format_time(cell, &args.time_format)
                    } else {
                        cell
                    }
                })
                .collect()
        })
        .collect();

    TableTransformResult {
        labels: out_labels,
        rows: out_rows,
        total_rows,
    }
}

fn paginate(rows: Vec<Vec<Value>>, page: PageOptions) -> Vec<Vec<Value>> {
    let iter = rows.into_iter().skip(page.offset);
    if page.limit == 0 {
        iter.collect()
    } else {
        iter.take(page.limit).collect()
    }
}

/// Numbers compare numerically, everything else as text; a number sorts
/// before any non-number.
fn compare_cells(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => cell_text(a).cmp(&cell_text(b)),
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_time(cell: Value, format: &str) -> Value {
    match time_to_ms(&cell).and_then(chrono::DateTime::from_timestamp_millis) {
        Some(ts) => Value::String(ts.format(format).to_string()),
        None => cell,
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
