// crates/metrics-discovery-config/src/lib.rs
// ============================================================================
// Module: Metrics Discovery Config Library
// Description: Configuration model, validation, and example generation.
// Purpose: Single source of truth for metrics-discovery.toml semantics.
// Dependencies: metrics-discovery-core, serde, toml
// ============================================================================

//! ## Overview
//! `metrics-discovery-config` defines the TOML configuration for the
//! discovery tool: cloud session settings, where the configuration document
//! lives for a stack, and which audit sink receives events. Validation is
//! strict and fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
