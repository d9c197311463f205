//! Restarter and fetch-until guards wrapped around real manager calls.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use plotline_manager::{fetch_chunk, ChunkOptions, FetchOutcome, Restarter};
use serde_json::json;

use crate::prelude::*;

#[tokio::test]
async fn restarter_surfaces_only_the_latest_query() {
    let (manager, http) = test_pipeline();
    // Two queued bodies: the first call gets "old", the second "new"
    http.push_response(json!({"generation": "old"}));
    http.push_response(json!({"generation": "new"}));

    let restarter: Restarter<serde_json::Value, _> = Restarter::new();

    let first = {
        let manager = manager.clone();
        restarter.perform(async move {
            let value = manager.get_json("http://chronograf.test/api/a").await;
            // Hold the first settlement back so the second finishes first
            tokio::time::sleep(Duration::from_millis(30)).await;
            value
        })
    };
    let second = {
        let manager = manager.clone();
        restarter.perform(async move { manager.get_json("http://chronograf.test/api/b").await })
    };

    // Whichever handle is awaited, only the latest call's result appears
    assert_eq!(second.await.unwrap(), json!({"generation": "new"}));
    assert_eq!(first.await.unwrap(), json!({"generation": "new"}));

    // Let the superseded call settle; nothing may leak from it
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(manager.payload_backlog(), 0);
}

#[tokio::test]
async fn chunked_fetch_accumulates_log_pages() {
    let (manager, http) = test_pipeline();
    // Each page carries two log rows
    for page in 0..10 {
        http.push_response(json!({"rows": [page * 2, page * 2 + 1]}));
    }

    let accumulated = Arc::new(AtomicUsize::new(0));

    let measured = Arc::clone(&accumulated);
    let sink = Arc::clone(&accumulated);
    let outcome = fetch_chunk(
        move || measured.load(Ordering::SeqCst),
        move || {
            let manager = manager.clone();
            let sink = Arc::clone(&sink);
            async move {
                let page = manager.get_json("http://chronograf.test/api/logs").await?;
                let rows = page["rows"].as_array().map(Vec::len).unwrap_or(0);
                sink.fetch_add(rows, Ordering::SeqCst);
                Ok::<(), plotline_manager::CallError>(())
            }
        },
        ChunkOptions {
            chunk_size: 5,
            max_fetch_count: Some(10),
        },
    )
    .wait()
    .await
    .unwrap();

    assert_eq!(outcome, FetchOutcome::Done);
    // Three pages of two rows reach the five-row chunk target
    assert_eq!(accumulated.load(Ordering::SeqCst), 6);
    assert_eq!(http.calls().len(), 3);
}

#[tokio::test]
async fn chunked_fetch_respects_the_iteration_cap() {
    let (manager, http) = test_pipeline();
    for _ in 0..10 {
        http.push_response(json!({"rows": []}));
    }

    let outcome = fetch_chunk(
        || 0,
        move || {
            let manager = manager.clone();
            async move {
                manager
                    .get_json("http://chronograf.test/api/logs")
                    .await
                    .map(|_| ())
            }
        },
        ChunkOptions {
            chunk_size: 100,
            max_fetch_count: Some(3),
        },
    )
    .wait()
    .await
    .unwrap();

    // Empty pages never grow the chunk; the cap ends the loop
    assert_eq!(outcome, FetchOutcome::Done);
    assert_eq!(http.calls().len(), 3);
}
