//! End-to-end dispatch behavior through the public manager API.

use plotline_adapters::HttpError;
use plotline_manager::CallError;
use serde_json::json;

use crate::prelude::*;

#[tokio::test]
async fn unknown_job_type_is_an_error_reply_not_a_hang() {
    let (manager, _http) = test_pipeline();

    let err = manager.call("NOT_A_JOB", json!({})).await.unwrap_err();
    assert_eq!(err, CallError::Job("unknown job type".to_string()));

    // The pipeline keeps serving after the unknown type
    let ok = manager
        .validate_dygraph_data(vec![vec![json!(1000), json!(1.0)]])
        .await
        .unwrap();
    assert!(ok);
}

#[tokio::test]
async fn proxy_forwards_query_and_surfaces_rows() {
    let (manager, http) = test_pipeline();
    http.push_response(cpu_response_body());

    let response = manager
        .proxy(
            "http://influx.test/proxy",
            "SELECT usage_idle FROM cpu",
            Some("telegraf"),
            Some("autogen"),
            Some("q-1"),
        )
        .await
        .unwrap();

    let series = &response.results[0].series[0];
    assert_eq!(series.name, "cpu");
    assert_eq!(series.values.len(), 2);
}

#[tokio::test]
async fn query_error_message_reaches_the_caller() {
    let (manager, http) = test_pipeline();
    http.push_error(HttpError::Status {
        status: 400,
        body: r#"{"error": "error parsing query: found FORM"}"#.to_string(),
    });

    let err = manager
        .proxy("http://influx.test/proxy", "SELECT FORM cpu", None, None, None)
        .await
        .unwrap_err();

    match err {
        CallError::Job(message) => {
            assert!(message.contains("error parsing query"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn identical_payloads_yield_identical_results() {
    let (manager, _http) = test_pipeline();
    let rows = vec![vec![json!(1000), json!(1.5)], vec![json!(2000), json!(null)]];

    let first = manager.validate_dygraph_data(rows.clone()).await.unwrap();
    let second = manager.validate_dygraph_data(rows).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn many_concurrent_calls_resolve_independently() {
    let (manager, _http) = test_pipeline();

    let mut handles = Vec::new();
    for i in 0..16 {
        let manager = manager.clone();
        handles.push(tokio::spawn(async move {
            // Odd-indexed calls are malformed on purpose
            let cell = if i % 2 == 0 { json!(1.0) } else { json!("bad") };
            manager
                .validate_dygraph_data(vec![vec![json!(1000 + i), cell]])
                .await
                .unwrap()
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let valid = handle.await.unwrap();
        assert_eq!(valid, i % 2 == 0, "call {i}");
    }

    assert_eq!(manager.payload_backlog(), 0);
}

#[tokio::test]
async fn close_tears_the_pipeline_down() {
    let (manager, _http) = test_pipeline();

    manager.close();

    let err = manager.call("GET", json!({"url": "http://x"})).await;
    assert_eq!(err, Err(CallError::Closed));
    assert_eq!(manager.payload_backlog(), 0);
}
