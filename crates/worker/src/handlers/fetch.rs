// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON fetch handlers (`GET`, `POSTJSON`)

use plotline_adapters::HttpAdapter;
use serde::{Deserialize, Serialize};

use crate::registry::JobError;

/// Arguments for the `GET` job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetArgs {
    pub url: String,
}

/// Arguments for the `POSTJSON` job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostArgs {
    pub url: String,
    #[serde(default)]
    pub body: serde_json::Value,
}

/// Fetch a URL and return the parsed JSON document.
pub async fn get_json<H: HttpAdapter>(
    args: GetArgs,
    http: &H,
) -> Result<serde_json::Value, JobError> {
    Ok(http.get_json(&args.url).await?)
}

/// Post a JSON body and return the parsed JSON response.
pub async fn post_json<H: HttpAdapter>(
    args: PostArgs,
    http: &H,
) -> Result<serde_json::Value, JobError> {
    Ok(http.post_json(&args.url, &args.body).await?)
}

#[cfg(test)]
#[path = "fetch_tests.rs"]
mod tests;
