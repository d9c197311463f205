// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake HTTP adapter for testing

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{HttpAdapter, HttpError};

/// Recorded HTTP call
#[derive(Debug, Clone, PartialEq)]
pub enum HttpCall {
    Get {
        url: String,
    },
    Post {
        url: String,
        body: serde_json::Value,
    },
}

struct FakeHttpState {
    calls: Vec<HttpCall>,
    responses: VecDeque<Result<serde_json::Value, HttpError>>,
}

/// Fake HTTP adapter for testing
///
/// Serves queued responses in FIFO order regardless of method; an empty
/// queue yields `null`.
#[derive(Clone)]
pub struct FakeHttpAdapter {
    inner: Arc<Mutex<FakeHttpState>>,
}

impl Default for FakeHttpAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeHttpState {
                calls: Vec::new(),
                responses: VecDeque::new(),
            })),
        }
    }
}

impl FakeHttpAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful JSON response.
    pub fn push_response(&self, value: serde_json::Value) {
        self.inner.lock().responses.push_back(Ok(value));
    }

    /// Queue an error.
    pub fn push_error(&self, error: HttpError) {
        self.inner.lock().responses.push_back(Err(error));
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<HttpCall> {
        self.inner.lock().calls.clone()
    }

    fn serve(&self, call: HttpCall) -> Result<serde_json::Value, HttpError> {
        let mut state = self.inner.lock();
        state.calls.push(call);
        state
            .responses
            .pop_front()
            .unwrap_or(Ok(serde_json::Value::Null))
    }
}

#[async_trait]
impl HttpAdapter for FakeHttpAdapter {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, HttpError> {
        self.serve(HttpCall::Get {
            url: url.to_string(),
        })
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, HttpError> {
        self.serve(HttpCall::Post {
            url: url.to_string(),
            body: body.clone(),
        })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
