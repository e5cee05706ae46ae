mod common;

use costboard::combiner::{Combiner, ServiceOutcome};
use costboard::dataset;
use costboard::models::Service;
use costboard::Error;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_combine_produces_sorted_persisted_dataset() {
    let dir = TempDir::new().unwrap();
    common::write_full_fixture(dir.path(), "feb-2025");
    let config = common::fixture_config(dir.path());

    let report = Combiner::new(&config).combine("feb-2025").unwrap();
    assert_eq!(report.records, 19);
    assert!(report.dataset_path.exists());

    let loaded = dataset::read(&report.dataset_path).unwrap();
    assert_eq!(loaded.len(), 19);

    // Sorted by service label, cost descending within a service.
    let labels: Vec<&str> = loaded.records.iter().map(|r| r.service.label()).collect();
    let mut sorted_labels = labels.clone();
    sorted_labels.sort_unstable();
    assert_eq!(labels, sorted_labels);

    for pair in loaded.records.windows(2) {
        if pair[0].service == pair[1].service {
            assert!(pair[0].cost_usd >= pair[1].cost_usd);
        }
    }
}

#[test]
fn test_combine_is_idempotent() {
    let dir = TempDir::new().unwrap();
    common::write_full_fixture(dir.path(), "feb-2025");
    let config = common::fixture_config(dir.path());
    let combiner = Combiner::new(&config);

    let first = combiner.combine("feb-2025").unwrap();
    let first_bytes = fs::read(&first.dataset_path).unwrap();

    let second = combiner.combine("feb-2025").unwrap();
    let second_bytes = fs::read(&second.dataset_path).unwrap();

    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn test_every_service_reports_an_outcome() {
    let dir = TempDir::new().unwrap();
    common::write_full_fixture(dir.path(), "feb-2025");
    let config = common::fixture_config(dir.path());

    let report = Combiner::new(&config).combine("feb-2025").unwrap();
    assert_eq!(report.services.len(), 16);
    assert!(report
        .services
        .iter()
        .all(|s| matches!(s.outcome, ServiceOutcome::Collected { .. })));
}

#[test]
fn test_missing_billing_export_degrades_per_service() {
    let dir = TempDir::new().unwrap();
    common::write_full_fixture(dir.path(), "feb-2025");
    fs::remove_file(dir.path().join("costs-feb-2025.csv")).unwrap();
    let config = common::fixture_config(dir.path());

    let report = Combiner::new(&config).combine("feb-2025").unwrap();

    // Billing-backed collectors fail, metric-backed ones still produce.
    let outcome_of = |service: Service| {
        report
            .services
            .iter()
            .find(|s| s.service == service)
            .map(|s| &s.outcome)
            .unwrap()
    };
    assert!(matches!(outcome_of(Service::Waf), ServiceOutcome::Failed { .. }));
    assert!(matches!(
        outcome_of(Service::CloudWatch),
        ServiceOutcome::Failed { .. }
    ));
    assert!(matches!(
        outcome_of(Service::Rds),
        ServiceOutcome::Collected { .. }
    ));
    assert!(matches!(
        outcome_of(Service::Ebs),
        ServiceOutcome::Collected { .. }
    ));

    // The dataset is still persisted with whatever was gathered.
    assert!(report.dataset_path.exists());
    assert!(report.records > 0);
}

#[test]
fn test_all_sources_missing_still_persists_empty_dataset() {
    let dir = TempDir::new().unwrap();
    let config = common::fixture_config(dir.path());

    let report = Combiner::new(&config).combine("feb-2025").unwrap();
    assert_eq!(report.records, 0);

    let loaded = dataset::read(&report.dataset_path).unwrap();
    assert!(loaded.is_empty());
}

#[test]
fn test_unknown_period_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = common::fixture_config(dir.path());

    let err = Combiner::new(&config).combine("mar-2025").unwrap_err();
    assert!(matches!(err, Error::PeriodUnknown(_)));
}

#[test]
fn test_skipped_resources_are_reported_not_recorded() {
    let dir = TempDir::new().unwrap();
    common::write_full_fixture(dir.path(), "feb-2025");

    // Drop the DynamoDB section: the table lookup fails per resource.
    let metrics_path = dir.path().join("metrics-feb-2025.json");
    let mut snapshot: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&metrics_path).unwrap()).unwrap();
    snapshot
        .as_object_mut()
        .unwrap()
        .remove("dynamodb_table_bytes");
    fs::write(&metrics_path, snapshot.to_string()).unwrap();

    let config = common::fixture_config(dir.path());
    let report = Combiner::new(&config).combine("feb-2025").unwrap();

    let dynamodb = report
        .services
        .iter()
        .find(|s| s.service == Service::DynamoDb)
        .unwrap();
    match &dynamodb.outcome {
        ServiceOutcome::Collected { records, skipped } => {
            assert_eq!(*records, 0);
            assert_eq!(skipped.len(), 1);
            assert_eq!(skipped[0].resource_id, "sessions");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    let loaded = dataset::read(&report.dataset_path).unwrap();
    assert!(!loaded.records.iter().any(|r| r.service == Service::DynamoDb));
}
