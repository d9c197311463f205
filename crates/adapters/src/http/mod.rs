// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP adapter used by the fetch and proxy job handlers.

mod client;
#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use client::{HttpSettings, ReqwestHttpAdapter};
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeHttpAdapter, HttpCall};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the HTTP adapter.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {0}")]
    Request(String),

    #[error("http status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response body: {0}")]
    Body(String),
}

/// Async HTTP seam for job handlers.
///
/// Both methods parse the response as JSON; non-2xx statuses are reported
/// as [`HttpError::Status`] with the body preserved so callers can surface
/// the server's error message.
#[async_trait]
pub trait HttpAdapter: Send + Sync + 'static {
    /// GET a URL and parse the response as JSON.
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, HttpError>;

    /// POST a JSON body and parse the response as JSON.
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, HttpError>;
}
