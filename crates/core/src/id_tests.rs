// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Id generation unit tests

use std::collections::HashSet;

use super::*;

#[test]
fn uuid_gen_produces_unique_ids() {
    let ids = UuidIdGen;
    let generated: HashSet<JobId> = (0..100).map(|_| ids.next()).collect();
    assert_eq!(generated.len(), 100);
}

#[test]
fn sequential_gen_counts_up_with_prefix() {
    let ids = SequentialIdGen::new("msg");
    assert_eq!(ids.next().as_str(), "msg-1");
    assert_eq!(ids.next().as_str(), "msg-2");
    assert_eq!(ids.next().as_str(), "msg-3");
}

#[test]
fn sequential_gen_clones_share_the_counter() {
    let ids = SequentialIdGen::default();
    let clone = ids.clone();
    assert_eq!(ids.next().as_str(), "job-1");
    assert_eq!(clone.next().as_str(), "job-2");
}

#[test]
fn job_id_display_and_borrow() {
    let id = JobId::new("abc-123");
    assert_eq!(id.to_string(), "abc-123");

    let mut map = std::collections::HashMap::new();
    map.insert(id.clone(), 1);
    // Borrow<str> allows lookup by plain str
    assert_eq!(map.get("abc-123"), Some(&1));
}

#[test]
fn job_id_serializes_as_plain_string() {
    let id = JobId::new("abc");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, r#""abc""#);

    let back: JobId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}
