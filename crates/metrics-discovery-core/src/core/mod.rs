// crates/metrics-discovery-core/src/core/mod.rs
// ============================================================================
// Module: Metrics Discovery Core Types
// Description: Naming grammar, stack identity, errors, and the config document.
// Purpose: Provide pure, serializable types shared by every discovery layer.
// Dependencies: indexmap, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Core types hold no I/O. The naming grammar derives every metrics namespace
//! and document key from a stack identity, and the configuration document
//! implements the append-only merge that keeps dashboards continuous across
//! discovery runs.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod document;
pub mod error;
pub mod identity;
pub mod naming;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use document::ConfigDocument;
pub use document::DocumentView;
pub use document::MergeOutcome;
pub use error::DiscoveryError;
pub use identity::EnvironmentInstances;
pub use identity::StackIdentity;
pub use naming::Category;
pub use naming::Environment;
pub use naming::InstanceKind;
pub use naming::WorkerStatistic;
