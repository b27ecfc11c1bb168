// crates/metrics-discovery-core/tests/discovery_flow.rs
// ============================================================================
// Module: Discovery Flow Tests
// Description: End-to-end load, discover, and save cycles.
// Purpose: Validate the persisted document across consecutive runs.
// ============================================================================
//! ## Overview
//! Drives full discovery runs through the public API against in-memory
//! backends and inspects the stored blob.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only panic-based assertions are permitted."
)]

use std::sync::Arc;

use metrics_discovery_core::BackendError;
use metrics_discovery_core::CategoryStatus;
use metrics_discovery_core::ConfigDocument;
use metrics_discovery_core::DiscoveryError;
use metrics_discovery_core::Gateway;
use metrics_discovery_core::InventoryResolver;
use metrics_discovery_core::LoadedDocument;
use metrics_discovery_core::WorkerStatistic;
use metrics_discovery_core::runtime::memory::FailingBackend;
use metrics_discovery_core::runtime::memory::InMemoryObjectStorage;

mod common;

use common::BUCKET;
use common::KEY;

fn stored(storage: &InMemoryObjectStorage) -> ConfigDocument {
    ConfigDocument::from_json_slice(&storage.object(BUCKET, KEY).unwrap()).unwrap()
}

#[test]
fn first_run_starts_from_empty_document() {
    let harness = common::harness(common::inventory_builder(), InMemoryObjectStorage::new());
    let loaded = harness.engine.load_document().unwrap();
    assert_eq!(loaded, LoadedDocument::Missing);
    let mut document = loaded.into_current().unwrap();
    let report = harness.engine.run_full_discovery(&mut document, &common::identity()).unwrap();
    assert_eq!(report.failed_count(), 0);

    let persisted = stored(&harness.storage);
    assert_eq!(persisted, document);
    assert_eq!(persisted.values("v512-repo-ec2-instances"), ["i-repo-1", "i-repo-2"]);
    assert_eq!(persisted.values("v512-repo-vmids"), ["vm-repo-1", "vm-repo-2"]);
    assert_eq!(persisted.values("v512-workers-names"), ["SearchWorker", "MessageWorker"]);
    assert_eq!(persisted.values("v512-repo-alb-name"), ["app/repo-prod-512/f00d"]);
    assert_eq!(
        harness.audit.event_names().first().copied(),
        Some("document_missing")
    );
}

#[test]
fn consecutive_runs_are_idempotent() {
    let harness = common::harness(common::inventory_builder(), InMemoryObjectStorage::new());
    for _ in 0 .. 2 {
        let mut document = harness.engine.load_document().unwrap().into_document();
        harness.engine.run_full_discovery(&mut document, &common::identity()).unwrap();
    }
    let first = harness.storage.object(BUCKET, KEY).unwrap();
    let mut document = harness.engine.load_document().unwrap().into_document();
    let report = harness.engine.run_full_discovery(&mut document, &common::identity()).unwrap();
    assert_eq!(report.appended_count(), 0);
    assert_eq!(harness.storage.object(BUCKET, KEY).unwrap(), first);
    assert_eq!(harness.storage.writes(), 3);
}

#[test]
fn previous_versions_are_preserved() {
    let seeded = r#"{
    "v511-repo-ec2-instances": ["i-old"],
    "v512-repo-ec2-instances": ["i-retired"]
}"#;
    let storage = InMemoryObjectStorage::new().with_object(BUCKET, KEY, seeded);
    let harness = common::harness(common::inventory_builder(), storage);
    let mut document = harness.engine.load_document().unwrap().into_document();
    harness.engine.run_full_discovery(&mut document, &common::identity()).unwrap();

    let persisted = stored(&harness.storage);
    let keys: Vec<&str> = persisted.keys().take(2).collect();
    assert_eq!(keys, ["v511-repo-ec2-instances", "v512-repo-ec2-instances"]);
    assert_eq!(persisted.values("v511-repo-ec2-instances"), ["i-old"]);
    assert_eq!(persisted.values("v512-repo-ec2-instances"), [
        "i-retired",
        "i-repo-1",
        "i-repo-2"
    ]);
}

#[test]
fn corrupt_document_is_left_untouched() {
    let storage = InMemoryObjectStorage::new().with_object(BUCKET, KEY, "[1, 2");
    let harness = common::harness(common::inventory_builder(), storage);
    let err = harness.engine.discover(&common::identity()).unwrap_err();
    assert!(matches!(err, DiscoveryError::MalformedDocument(_)));
    assert_eq!(harness.storage.object(BUCKET, KEY).unwrap(), b"[1, 2");
    assert_eq!(harness.storage.writes(), 0);
}

#[test]
fn transient_load_failure_keeps_recorded_history() {
    let seeded = r#"{"v511-repo-ec2-instances": ["i-old"]}"#;
    let storage = InMemoryObjectStorage::new()
        .with_object(BUCKET, KEY, seeded)
        .with_read_failure(BackendError::Io("connection reset".to_string()));
    let harness = common::harness(common::inventory_builder(), storage);
    let err = harness.engine.discover(&common::identity()).unwrap_err();
    assert!(matches!(err, DiscoveryError::StorageUnavailable(_)));
    let persisted = stored(&harness.storage);
    assert_eq!(persisted.keys().collect::<Vec<_>>(), ["v511-repo-ec2-instances"]);
    assert_eq!(persisted.values("v511-repo-ec2-instances"), ["i-old"]);
}

#[test]
fn discover_appends_to_stored_history() {
    let seeded = r#"{"v511-repo-ec2-instances": ["i-old"]}"#;
    let storage = InMemoryObjectStorage::new().with_object(BUCKET, KEY, seeded);
    let harness = common::harness(common::inventory_builder(), storage);
    let report = harness.engine.discover(&common::identity()).unwrap();
    assert!(report.saved);
    let persisted = stored(&harness.storage);
    assert_eq!(persisted.keys().next(), Some("v511-repo-ec2-instances"));
    assert_eq!(persisted.len(), 8);
}

#[test]
fn partial_outage_saves_surviving_categories() {
    let builder = common::inventory_builder().tags(Arc::new(FailingBackend::new("denied")));
    let harness = common::harness(builder, InMemoryObjectStorage::new());
    let mut document = ConfigDocument::new();
    let report = harness.engine.run_full_discovery(&mut document, &common::identity()).unwrap();
    assert_eq!(report.failed_count(), 1);
    let alb = report.category("v512-repo-alb-name").unwrap();
    assert!(matches!(alb.status, CategoryStatus::Failed { .. }));
    let persisted = stored(&harness.storage);
    assert_eq!(persisted.len(), 6);
    assert!(!persisted.contains_key("v512-repo-alb-name"));
}

#[test]
fn document_view_spans_versions() {
    let storage = InMemoryObjectStorage::new().with_object(
        BUCKET,
        KEY,
        r#"{"v511-workers-names": ["SearchWorker", "LegacyWorker"]}"#,
    );
    let harness = common::harness(common::inventory_builder(), storage);
    let mut document = harness.engine.load_document().unwrap().into_document();
    harness.engine.run_full_discovery(&mut document, &common::identity()).unwrap();
    let names = document
        .view()
        .across(&["v511", "v512"], metrics_discovery_core::Category::WorkerNames);
    assert_eq!(names, [
        "SearchWorker",
        "LegacyWorker",
        "SearchWorker",
        "MessageWorker"
    ]);
}

#[test]
fn resolver_serves_database_lookups() {
    let resolver = InventoryResolver::new(common::inventory_builder().build());
    assert_eq!(resolver.database_instance_ids("prod", "512").unwrap(), ["prod-512-db"]);
    assert_eq!(resolver.idgen_database_id("prod").unwrap(), "prod-idgen-db");
    let every_statistic: Vec<Vec<String>> = WorkerStatistic::ALL
        .into_iter()
        .map(|statistic| resolver.worker_stat_instances("512-0", statistic).unwrap())
        .collect();
    assert_eq!(every_statistic[0], ["SearchWorker", "MessageWorker"]);
    assert!(every_statistic[1].is_empty());
}

#[test]
fn unbound_inventory_fails_every_category() {
    let harness = common::harness(Gateway::builder(), InMemoryObjectStorage::new());
    let mut document = ConfigDocument::new();
    let report = harness.engine.run_full_discovery(&mut document, &common::identity()).unwrap();
    assert_eq!(report.failed_count(), 7);
    assert!(report.saved);
    assert!(matches!(
        report.category("v512-repo-ec2-instances").unwrap().status,
        CategoryStatus::Failed {
            error_kind: "capability_not_bound",
            ..
        }
    ));
}
