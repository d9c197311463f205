//! Shared helpers for pipeline specs.

use plotline_adapters::FakeHttpAdapter;
use plotline_core::id::SequentialIdGen;
use plotline_manager::{spawn_pipeline_with_ids, JobManager, PipelineConfig};
use serde_json::json;

/// Spawn a full pipeline over a fake HTTP adapter.
pub fn test_pipeline() -> (JobManager<SequentialIdGen>, FakeHttpAdapter) {
    let http = FakeHttpAdapter::new();
    let manager = spawn_pipeline_with_ids(
        http.clone(),
        PipelineConfig::default(),
        SequentialIdGen::new("msg"),
    );
    (manager, http)
}

/// A proxy response body with one cpu series.
pub fn cpu_response_body() -> serde_json::Value {
    json!({
        "results": [{
            "series": [{
                "name": "cpu",
                "columns": ["time", "usage_idle"],
                "values": [
                    [1000, 98.2],
                    [2000, 97.9]
                ]
            }]
        }]
    })
}
