// crates/metrics-discovery-core/src/core/error.rs
// ============================================================================
// Module: Discovery Errors
// Description: Error taxonomy shared by gateway, store, resolver, and engine.
// Purpose: Classify failures into fatal and recoverable discovery conditions.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every discovery layer reports failures through [`DiscoveryError`].
//! Construction-time misconfiguration (`NotInitialized`,
//! `UnsupportedCapability`, `CapabilityNotBound`) is fatal. Document load
//! failures (`MalformedDocument`, `StorageUnavailable`) are recoverable and
//! reported alongside an empty document. Naming, lookup, and query failures
//! are fatal only to the category that raised them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::interfaces::Capability;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Discovery failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// Capability name is outside the supported set.
    #[error("unsupported capability: {0}")]
    UnsupportedCapability(String),
    /// Capability is supported but the gateway has no handle bound for it.
    #[error("capability not bound: {0}")]
    CapabilityNotBound(Capability),
    /// Document store is missing its location or storage capability.
    #[error("document store not initialized: {0}")]
    NotInitialized(String),
    /// Stored document could not be decoded or parsed.
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    /// Storage transport failed or the document does not exist.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    /// Instance label does not follow `<version-code>-<instance-letter>`.
    #[error("invalid instance label: {0}")]
    InvalidLabelFormat(String),
    /// Instance kind is not `Repository` or `Workers`.
    #[error("invalid instance kind: {0}")]
    InvalidInstanceKind(String),
    /// A resource expected to exist was not found.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),
    /// Inventory backend query failed.
    #[error("{capability} query failed: {message}")]
    QueryFailed {
        /// Capability that served the query.
        capability: Capability,
        /// Backend error message.
        message: String,
    },
}

impl DiscoveryError {
    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedCapability(_) => "unsupported_capability",
            Self::CapabilityNotBound(_) => "capability_not_bound",
            Self::NotInitialized(_) => "not_initialized",
            Self::MalformedDocument(_) => "malformed_document",
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::InvalidLabelFormat(_) => "invalid_label_format",
            Self::InvalidInstanceKind(_) => "invalid_instance_kind",
            Self::ResourceNotFound(_) => "resource_not_found",
            Self::QueryFailed {
                ..
            } => "query_failed",
        }
    }

    /// Returns true for load failures that still allow a read-only collect.
    #[must_use]
    pub const fn is_recoverable_load(&self) -> bool {
        matches!(self, Self::MalformedDocument(_) | Self::StorageUnavailable(_))
    }

    /// Returns true for construction-time misconfiguration.
    #[must_use]
    pub const fn is_misconfiguration(&self) -> bool {
        matches!(
            self,
            Self::NotInitialized(_) | Self::UnsupportedCapability(_) | Self::CapabilityNotBound(_)
        )
    }
}
