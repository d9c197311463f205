//! Transform jobs driven end-to-end through the manager.

use plotline_core::{FluxTable, QueryResponse};
use plotline_worker::handlers::table::{
    FieldOption, PageOptions, SortDirection, SortOptions, TableTransformArgs,
};
use serde_json::json;

use crate::prelude::*;

fn cpu_query_response() -> QueryResponse {
    serde_json::from_value(cpu_response_body()).unwrap()
}

#[tokio::test]
async fn raw_rows_become_chart_ready_series() {
    let (manager, _http) = test_pipeline();

    let data = manager
        .time_series_to_dygraph(&cpu_query_response())
        .await
        .unwrap();

    assert_eq!(data.labels, vec!["time", "cpu.usage_idle"]);
    assert_eq!(
        data.timeseries,
        vec![
            vec![json!(1000), json!(98.2)],
            vec![json!(2000), json!(97.9)],
        ]
    );
}

#[tokio::test]
async fn raw_rows_become_table_cells() {
    let (manager, _http) = test_pipeline();

    let graph = manager
        .time_series_to_table_graph(&cpu_query_response())
        .await
        .unwrap();
    assert_eq!(graph.sorted_labels, vec!["time", "cpu.usage_idle"]);

    let table = manager
        .table_transform(TableTransformArgs {
            data: graph.data,
            sort: SortOptions {
                field: "time".to_string(),
                direction: SortDirection::Desc,
            },
            field_options: vec![FieldOption {
                internal_name: "cpu.usage_idle".to_string(),
                display_name: "CPU Idle".to_string(),
                visible: true,
            }],
            time_format: String::new(),
            page: PageOptions::default(),
        })
        .await
        .unwrap();

    assert_eq!(table.labels, vec!["CPU Idle", "time"]);
    assert_eq!(table.total_rows, 2);
    assert_eq!(table.rows[0][1], json!(2000));
}

#[tokio::test]
async fn validation_round_trips_well_formed_and_malformed_series() {
    let (manager, _http) = test_pipeline();

    let well_formed = vec![
        vec![json!(1000), json!(98.2), json!(null)],
        vec![json!("2023-11-14T22:13:20Z"), json!(97.9), json!(1.0)],
    ];
    assert!(manager.validate_dygraph_data(well_formed).await.unwrap());

    let malformed = vec![vec![json!(1000), json!("not numeric")]];
    assert!(!manager.validate_dygraph_data(malformed).await.unwrap());
}

#[tokio::test]
async fn flux_tables_round_trip_to_dygraph_and_single_stat() {
    let (manager, _http) = test_pipeline();

    let tables: Vec<FluxTable> = vec![
        serde_json::from_value(json!({
            "id": "0",
            "name": "cpu",
            "group_key": {},
            "data": [
                ["_time", "_value"],
                [1000, 1.5],
                [2000, 2.5]
            ]
        }))
        .unwrap(),
    ];

    let chart = manager.flux_tables_to_dygraph(&tables).await.unwrap();
    assert_eq!(chart.labels, vec!["time", "cpu"]);
    assert_eq!(chart.timeseries.len(), 2);

    let stat = manager
        .flux_tables_to_single_stat(&tables)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stat.value, 2.5);
    assert_eq!(stat.time, Some(2000));
}
