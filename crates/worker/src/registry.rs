// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Closed job catalog and dispatch table.
//!
//! Adding a job kind means adding a variant here plus a handler arm in
//! `run_job`; the match is exhaustive so a missing arm fails to compile.

use plotline_adapters::{HttpAdapter, HttpError};
use plotline_core::{FluxTable, QueryResponse};
use thiserror::Error;

use crate::handlers::{dygraph, fetch, flux, proxy, table};

/// Errors from job execution.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("payload error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("http error: {0}")]
    Http(#[from] HttpError),

    #[error("query error: {0}")]
    Query(String),
}

/// Closed set of job kinds the worker executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    Get,
    PostJson,
    Proxy,
    TableTransform,
    TimeSeriesToTableGraph,
    TimeSeriesToDygraph,
    ValidateDygraphData,
    FluxToDygraph,
    FluxToSingleStat,
}

impl JobKind {
    /// Parse a wire tag; `None` means the job type is not registered.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "GET" => Some(Self::Get),
            "POSTJSON" => Some(Self::PostJson),
            "PROXY" => Some(Self::Proxy),
            "TABLETRANSFORM" => Some(Self::TableTransform),
            "TSTOTABLEGRAPH" => Some(Self::TimeSeriesToTableGraph),
            "TSTODYGRAPH" => Some(Self::TimeSeriesToDygraph),
            "VALIDATEDYGRAPHDATA" => Some(Self::ValidateDygraphData),
            "FLUXTODYGRAPH" => Some(Self::FluxToDygraph),
            "FLUXTOSINGLESTAT" => Some(Self::FluxToSingleStat),
            _ => None,
        }
    }

    /// Wire tag for this kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::PostJson => "POSTJSON",
            Self::Proxy => "PROXY",
            Self::TableTransform => "TABLETRANSFORM",
            Self::TimeSeriesToTableGraph => "TSTOTABLEGRAPH",
            Self::TimeSeriesToDygraph => "TSTODYGRAPH",
            Self::ValidateDygraphData => "VALIDATEDYGRAPHDATA",
            Self::FluxToDygraph => "FLUXTODYGRAPH",
            Self::FluxToSingleStat => "FLUXTOSINGLESTAT",
        }
    }
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Execute a single job against its deserialized payload.
///
/// Handlers are pure functions of their input; nothing is retained across
/// invocations.
pub async fn run_job<H: HttpAdapter>(
    kind: JobKind,
    payload: serde_json::Value,
    http: &H,
) -> Result<serde_json::Value, JobError> {
    match kind {
        JobKind::Get => {
            let args: fetch::GetArgs = serde_json::from_value(payload)?;
            fetch::get_json(args, http).await
        }
        JobKind::PostJson => {
            let args: fetch::PostArgs = serde_json::from_value(payload)?;
            fetch::post_json(args, http).await
        }
        JobKind::Proxy => {
            let args: proxy::ProxyArgs = serde_json::from_value(payload)?;
            let response = proxy::proxy(args, http).await?;
            Ok(serde_json::to_value(response)?)
        }
        JobKind::TableTransform => {
            let args: table::TableTransformArgs = serde_json::from_value(payload)?;
            Ok(serde_json::to_value(table::table_transform(args))?)
        }
        JobKind::TimeSeriesToTableGraph => {
            let response: QueryResponse = serde_json::from_value(payload)?;
            Ok(serde_json::to_value(table::time_series_to_table_graph(
                &response,
            ))?)
        }
        JobKind::TimeSeriesToDygraph => {
            let response: QueryResponse = serde_json::from_value(payload)?;
            Ok(serde_json::to_value(dygraph::time_series_to_dygraph(
                &response,
            ))?)
        }
        JobKind::ValidateDygraphData => {
            let args: dygraph::ValidateArgs = serde_json::from_value(payload)?;
            Ok(serde_json::Value::Bool(dygraph::validate_dygraph_data(
                &args.timeseries,
            )))
        }
        JobKind::FluxToDygraph => {
            let tables: Vec<FluxTable> = serde_json::from_value(payload)?;
            Ok(serde_json::to_value(flux::flux_tables_to_dygraph(&tables))?)
        }
        JobKind::FluxToSingleStat => {
            let tables: Vec<FluxTable> = serde_json::from_value(payload)?;
            Ok(serde_json::to_value(flux::flux_tables_to_single_stat(
                &tables,
            ))?)
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
