mod common;

use costboard::query::QueryEngine;
use costboard::server;
use std::sync::Arc;
use tempfile::TempDir;

fn engine(dir: &TempDir) -> Arc<QueryEngine> {
    common::write_full_fixture(dir.path(), "feb-2025");
    let config = common::fixture_config(dir.path());
    Arc::new(QueryEngine::new(Arc::new(config)))
}

#[test]
fn test_router_builds_with_all_routes() {
    let dir = TempDir::new().unwrap();
    let _router = server::router(engine(&dir));
}

#[test]
fn test_overview_payload_shape() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir);

    let payload = serde_json::to_value(engine.overview("feb-2025")).unwrap();

    assert!(payload["service_costs"].is_object());
    assert!(payload["monthly_trend"]["months"].is_array());
    assert!(payload["monthly_trend"]["costs"].is_array());
    assert!(payload["top_resources"].is_array());
    assert!(payload["summary"]["total_cost"].is_number());
    assert!(payload["summary"]["avg_monthly_cost"].is_number());
    assert!(payload["summary"]["most_expensive_service"]["name"].is_string());
    assert!(payload.get("error").is_none());

    let top = &payload["top_resources"][0];
    assert!(top["resource_name"].is_string());
    assert!(top["service"].is_string());
    assert!(top["cost_usd"].is_number());
}

#[test]
fn test_error_payload_keeps_full_shape() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir);

    let payload = serde_json::to_value(engine.overview("mar-2025")).unwrap();

    assert!(payload["error"].is_string());
    assert!(payload["service_costs"].is_object());
    assert_eq!(payload["summary"]["total_cost"], 0.0);
    assert_eq!(payload["summary"]["most_expensive_service"]["name"], "-");
}

#[test]
fn test_details_payload_shape() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir);

    let payload = serde_json::to_value(engine.details("feb-2025", "DynamoDB")).unwrap();

    let columns = payload["columns"].as_array().unwrap();
    assert_eq!(columns[0]["key"], "table_name");
    assert_eq!(columns[0]["label"], "Table");
    assert_eq!(columns.last().unwrap()["key"], "cost_usd");

    let resources = payload["resources"].as_array().unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0]["table_name"], "sessions");
}

#[test]
fn test_service_trend_payload_shape() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir);
    // Materialize the dataset so the trend has something to read.
    engine.overview("feb-2025");

    let payload = serde_json::to_value(engine.service_trend("WAF")).unwrap();
    assert_eq!(payload["months"][0], "feb-2025");
    assert_eq!(payload["costs"][0], 10.0);
}
