// crates/metrics-discovery-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared fixtures for metrics-discovery-core integration tests.
// Purpose: Build a populated in-memory gateway for a `prod` stack.
// Dependencies: metrics-discovery-core
// ============================================================================

//! ## Overview
//! Provides a stack fixture with instances, metrics, and a load balancer
//! registered under the naming conventions a deployed stack uses.

#![allow(dead_code, reason = "Shared helpers are not used by every test binary.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only fixtures favor direct unwrap/expect for clarity."
)]

use std::sync::Arc;

use metrics_discovery_core::DiscoveryEngine;
use metrics_discovery_core::DocumentLocation;
use metrics_discovery_core::DocumentStore;
use metrics_discovery_core::EnvironmentInstances;
use metrics_discovery_core::Gateway;
use metrics_discovery_core::GatewayBuilder;
use metrics_discovery_core::InventoryResolver;
use metrics_discovery_core::MemoryAuditSink;
use metrics_discovery_core::StackIdentity;
use metrics_discovery_core::runtime::memory::InMemoryObjectStorage;
use metrics_discovery_core::runtime::memory::StaticDatabaseInventory;
use metrics_discovery_core::runtime::memory::StaticMetricsListing;
use metrics_discovery_core::runtime::memory::StaticResourceTagLookup;
use metrics_discovery_core::runtime::memory::StaticVirtualMachineInventory;

/// Document bucket of the `prod` stack.
pub const BUCKET: &str = "prod.cloudwatch.metrics.sagebase.org";
/// Document key of the `prod` stack.
pub const KEY: &str = "prod_cw_configuration.json";

/// Returns the `prod` identity for version `v512`.
pub fn identity() -> StackIdentity {
    StackIdentity::new("prod", "v512", EnvironmentInstances::parse("512-0,512-0,512-0").unwrap())
}

/// Returns a builder with every inventory capability bound.
pub fn inventory_builder() -> GatewayBuilder {
    let vms = StaticVirtualMachineInventory::new()
        .with_instances("Name", "repo-prod-512-0", &["i-repo-1", "i-repo-2"])
        .with_instances("Name", "workers-prod-512-0", &["i-workers-1"])
        .with_instances("Name", "portal-prod-512-0", &["i-portal-1"]);
    let metrics = StaticMetricsListing::new()
        .with_series("Repository-Memory-512", "used", "instance", &["vm-repo-1", "vm-repo-2"])
        .with_series("Workers-Memory-512", "used", "instance", &["vm-workers-1"])
        .with_series("Worker-Statistics-512", "Completed Job Count", "Worker", &[
            "SearchWorker",
            "MessageWorker",
        ]);
    let databases = StaticDatabaseInventory::new()
        .with_instance("prod-512-db", Some("prod512"))
        .with_instance("prod-idgen-db", Some("prodidgen"));
    let tags = StaticResourceTagLookup::new().with_resource(
        "arn:aws:elasticloadbalancing:us-east-1:123456789012:loadbalancer/app/repo-prod-512/f00d",
        &[("elasticbeanstalk:environment-name", "repo-prod-512-0")],
    );
    Gateway::builder()
        .virtual_machines(Arc::new(vms))
        .metrics(Arc::new(metrics))
        .databases(Arc::new(databases))
        .tags(Arc::new(tags))
}

/// Engine wired to in-memory storage with a recording audit sink.
pub struct Harness {
    /// Discovery engine under test.
    pub engine: DiscoveryEngine,
    /// Backing object storage.
    pub storage: Arc<InMemoryObjectStorage>,
    /// Recorded audit events.
    pub audit: Arc<MemoryAuditSink>,
}

/// Builds a harness over `builder` and `storage`.
pub fn harness(builder: GatewayBuilder, storage: InMemoryObjectStorage) -> Harness {
    let storage = Arc::new(storage);
    let audit = Arc::new(MemoryAuditSink::new());
    let gateway = builder.object_storage(storage.clone()).build();
    let store = DocumentStore::new(&gateway, DocumentLocation::new(BUCKET, KEY), audit.clone());
    let engine = DiscoveryEngine::new(InventoryResolver::new(gateway), store, audit.clone());
    Harness {
        engine,
        storage,
        audit,
    }
}
