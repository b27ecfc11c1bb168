// crates/metrics-discovery-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for argument parsing and command helpers.
// Purpose: Ensure commands shape their inputs and outputs without AWS access.
// Dependencies: metrics-discovery-cli main helpers
// ============================================================================

//! ## Overview
//! Validates argument parsing, list splitting, audit sink selection, and the
//! `show` and `databases` output builders against in-memory backends.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use metrics_discovery_core::BackendError;
use metrics_discovery_core::DocumentLocation;
use metrics_discovery_core::MemoryAuditSink;
use metrics_discovery_core::runtime::memory::InMemoryObjectStorage;
use metrics_discovery_core::runtime::memory::StaticDatabaseInventory;

use super::*;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn discover_arguments_parse() {
    let cli = Cli::try_parse_from([
        "metrics-discovery",
        "discover",
        "--stack",
        "prod",
        "--version",
        "v512",
        "--instances",
        "512-0,512-1,512-2",
        "--region",
        "us-west-2",
        "--dry-run",
    ])
    .expect("parse discover");
    let Commands::Discover(command) = cli.command else {
        panic!("expected discover command");
    };
    assert_eq!(command.stack, "prod");
    assert_eq!(command.stack_version, "v512");
    assert!(command.dry_run);
    assert_eq!(command.session.region.as_deref(), Some("us-west-2"));
    assert!(command.session.profile.is_none());
}

#[test]
fn config_flag_is_global() {
    let cli =
        Cli::try_parse_from(["metrics-discovery", "config", "validate", "--config", "x.toml"])
            .expect("parse config validate");
    assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    assert!(matches!(cli.command, Commands::Config {
        command: ConfigCommand::Validate
    }));
}

#[test]
fn discover_requires_instances() {
    let args = ["metrics-discovery", "discover", "--stack", "prod", "--version", "v1"];
    let result = Cli::try_parse_from(args);
    assert!(result.is_err());
}

#[test]
fn split_list_trims_and_drops_empty_entries() {
    assert_eq!(split_list(" v1, v2 ,,v3 "), ["v1", "v2", "v3"]);
    assert!(split_list(" , ").is_empty());
}

#[test]
fn audit_sink_follows_log_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("audit.log");
    let file = LogConfig {
        sink: LogSinkKind::File,
        path: Some(path.clone()),
    };
    let sink = build_audit_sink(&file).expect("file sink");
    sink.record(&metrics_discovery_core::DiscoveryAuditEvent::new(
        "document_saved",
        metrics_discovery_core::audit::AuditLevel::Info,
    ));
    let content = std::fs::read_to_string(&path).expect("read audit log");
    assert!(content.contains("\"event\":\"document_saved\""));

    let missing = LogConfig {
        sink: LogSinkKind::File,
        path: None,
    };
    assert!(build_audit_sink(&missing).is_err());
    assert!(build_audit_sink(&LogConfig::default()).is_ok());
}

#[test]
fn category_values_cover_every_category_in_order() {
    let mut document = ConfigDocument::new();
    document.merge_entry("v1-repo-vmids", ["vm-a"]);
    document.merge_entry("v2-repo-vmids", ["vm-b", "vm-a"]);
    let versions = vec!["v1".to_string(), "v2".to_string()];
    let values = category_values(&document, &versions);
    assert_eq!(values.len(), Category::DISCOVERY_ORDER.len());
    assert_eq!(values[0].category, "repo-ec2-instances");
    assert!(values[0].values.is_empty());
    assert_eq!(values[3].category, "repo-vmids");
    assert_eq!(values[3].values, ["vm-a", "vm-b", "vm-a"]);
}

fn store_over(storage: InMemoryObjectStorage) -> DocumentStore {
    let gateway = Gateway::builder().object_storage(Arc::new(storage)).build();
    let location = DocumentLocation::new("prod.cloudwatch.metrics.sagebase.org", "prod.json");
    DocumentStore::new(&gateway, location, Arc::new(MemoryAuditSink::new()))
}

#[test]
fn show_reads_missing_document_as_empty() {
    let document = stored_document(&store_over(InMemoryObjectStorage::new())).expect("document");
    assert!(document.is_empty());
    let values = category_values(&document, &["v1".to_string()]);
    assert!(values.iter().all(|category| category.values.is_empty()));
}

#[test]
fn show_fails_on_unreadable_document() {
    let corrupt = InMemoryObjectStorage::new().with_object(
        "prod.cloudwatch.metrics.sagebase.org",
        "prod.json",
        "{broken",
    );
    let err = stored_document(&store_over(corrupt)).unwrap_err();
    assert!(err.to_string().starts_with("document unavailable"));

    let outage = InMemoryObjectStorage::new()
        .with_read_failure(BackendError::Io("connection reset".to_string()));
    assert!(stored_document(&store_over(outage)).is_err());
}

#[test]
fn databases_output_lists_releases_and_idgen() {
    let databases = StaticDatabaseInventory::new()
        .with_instance("prod-511", Some("prod511"))
        .with_instance("prod-512", Some("prod512"))
        .with_instance("prod-idgen", Some("prodidgen"));
    let gateway = Gateway::builder().databases(Arc::new(databases)).build();
    let resolver = InventoryResolver::new(gateway);
    let releases = vec!["511".to_string(), "512".to_string(), "513".to_string()];
    let output = databases_output(&resolver, "prod", &releases).expect("databases output");
    assert_eq!(output.idgen, "prod-idgen");
    assert_eq!(output.releases[1].instances, ["prod-512"]);
    assert!(output.releases[2].instances.is_empty());
}

#[test]
fn databases_output_fails_without_idgen() {
    let databases = StaticDatabaseInventory::new().with_instance("prod-512", Some("prod512"));
    let gateway = Gateway::builder().databases(Arc::new(databases)).build();
    let resolver = InventoryResolver::new(gateway);
    let err = databases_output(&resolver, "prod", &["512".to_string()]).unwrap_err();
    assert!(err.to_string().contains("prodidgen"));
}
