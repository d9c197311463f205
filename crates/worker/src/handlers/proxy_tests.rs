// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use plotline_adapters::{FakeHttpAdapter, HttpCall, HttpError};
use serde_json::json;

use super::*;

fn args() -> ProxyArgs {
    ProxyArgs {
        source: "http://influx.test/proxy".to_string(),
        query: "SELECT mean(usage_idle) FROM cpu".to_string(),
        db: Some("telegraf".to_string()),
        rp: Some("autogen".to_string()),
        uuid: Some("q-1".to_string()),
    }
}

#[tokio::test]
async fn posts_query_and_returns_raw_rows() {
    let http = FakeHttpAdapter::new();
    http.push_response(json!({
        "results": [{
            "series": [{
                "name": "cpu",
                "columns": ["time", "mean"],
                "values": [[1700000000000i64, 98.2]]
            }]
        }]
    }));

    let response = proxy(args(), &http).await.unwrap();

    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].series[0].name, "cpu");
    // uuid falls back to the request's when the server omits it
    assert_eq!(response.uuid.as_deref(), Some("q-1"));

    match &http.calls()[0] {
        HttpCall::Post { url, body } => {
            assert_eq!(url, "http://influx.test/proxy");
            assert_eq!(body["query"], "SELECT mean(usage_idle) FROM cpu");
            assert_eq!(body["db"], "telegraf");
            assert_eq!(body["rp"], "autogen");
            assert_eq!(body["uuid"], "q-1");
        }
        other => panic!("unexpected call: {other:?}"),
    }
}

#[tokio::test]
async fn server_uuid_wins_over_request_uuid() {
    let http = FakeHttpAdapter::new();
    http.push_response(json!({"results": [], "uuid": "server-uuid"}));

    let response = proxy(args(), &http).await.unwrap();
    assert_eq!(response.uuid.as_deref(), Some("server-uuid"));
}

#[tokio::test]
async fn statement_error_stays_in_results() {
    let http = FakeHttpAdapter::new();
    http.push_response(json!({
        "results": [{"error": "database not found: telegraf"}]
    }));

    let response = proxy(args(), &http).await.unwrap();
    assert_eq!(
        response.results[0].error.as_deref(),
        Some("database not found: telegraf")
    );
}

#[tokio::test]
async fn status_error_surfaces_server_message() {
    let http = FakeHttpAdapter::new();
    http.push_error(HttpError::Status {
        status: 400,
        body: r#"{"error": "error parsing query: found FORM"}"#.to_string(),
    });

    let err = proxy(args(), &http).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "query error: error parsing query: found FORM"
    );
}

#[tokio::test]
async fn status_error_without_body_falls_back_to_status() {
    let http = FakeHttpAdapter::new();
    http.push_error(HttpError::Status {
        status: 502,
        body: String::new(),
    });

    let err = proxy(args(), &http).await.unwrap_err();
    assert!(err.to_string().contains("status 502"));
}
