// crates/metrics-discovery-core/src/lib.rs
// ============================================================================
// Module: Metrics Discovery Core Library
// Description: Public API surface for the metrics discovery core.
// Purpose: Expose naming, document, gateway, and discovery runtime types.
// Dependencies: crate::{audit, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Metrics discovery enumerates live infrastructure identifiers (compute
//! instances, memory and worker metric series, load balancers) for a deployed
//! stack version and folds them into a persisted configuration document that
//! the dashboard builder reads. The merge is append-only: identifiers seen
//! once stay recorded until an operator removes them.
//!
//! The core is backend-agnostic. Cloud access goes through the
//! [`Gateway`] capability facade, so every component is testable with the
//! in-memory backends in [`runtime::memory`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use audit::DiscoveryAuditEvent;
pub use audit::DiscoveryAuditSink;
pub use audit::FileAuditSink;
pub use audit::MemoryAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use interfaces::BackendError;
pub use interfaces::Capability;
pub use interfaces::CapabilityHandle;
pub use interfaces::DatabaseInstance;
pub use interfaces::Gateway;
pub use interfaces::GatewayBuilder;
pub use interfaces::ManagedDatabaseInventory;
pub use interfaces::MetricDimension;
pub use interfaces::MetricSeries;
pub use interfaces::MetricsNamespaceListing;
pub use interfaces::ObjectStorage;
pub use interfaces::ResourceTagLookup;
pub use interfaces::TagFilter;
pub use interfaces::TaggedResource;
pub use interfaces::VirtualMachineInventory;
pub use runtime::CategoryReport;
pub use runtime::CategoryStatus;
pub use runtime::DEFAULT_MAX_DOCUMENT_BYTES;
pub use runtime::DiscoveryEngine;
pub use runtime::DiscoveryReport;
pub use runtime::DocumentLocation;
pub use runtime::DocumentStore;
pub use runtime::InventoryResolver;
pub use runtime::LoadedDocument;
