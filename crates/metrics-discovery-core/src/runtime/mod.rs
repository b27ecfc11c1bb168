// crates/metrics-discovery-core/src/runtime/mod.rs
// ============================================================================
// Module: Discovery Runtime
// Description: Document store, inventory resolver, and merge engine.
// Purpose: Turn live inventory into an updated configuration document.
// Dependencies: crate::{audit, core, interfaces}
// ============================================================================

//! ## Overview
//! The runtime wires the gateway to the document: [`InventoryResolver`]
//! queries live inventory, [`DiscoveryEngine`] merges the results, and
//! [`DocumentStore`] loads and saves the persisted document. Every component
//! receives its dependencies explicitly.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod engine;
pub mod memory;
pub mod resolver;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use engine::CategoryReport;
pub use engine::CategoryStatus;
pub use engine::DiscoveryEngine;
pub use engine::DiscoveryReport;
pub use resolver::InventoryResolver;
pub use store::DEFAULT_MAX_DOCUMENT_BYTES;
pub use store::DocumentLocation;
pub use store::DocumentStore;
pub use store::LoadedDocument;
