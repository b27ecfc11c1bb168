// crates/metrics-discovery-core/src/interfaces/mod.rs
// ============================================================================
// Module: Infrastructure Interfaces
// Description: Capability traits for object storage and inventory queries.
// Purpose: Define the contract surfaces the discovery runtime depends on.
// Dependencies: crate::core, serde, thiserror
// ============================================================================

//! ## Overview
//! Discovery reads cloud inventory through five capabilities. Each is a small
//! synchronous trait so the runtime stays backend-agnostic: the AWS crate
//! implements them over the SDK clients and tests use the in-memory backends
//! in [`crate::runtime::memory`]. Implementations never retry; callers decide
//! retry policy.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod gateway;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::error::DiscoveryError;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use gateway::CapabilityHandle;
pub use gateway::Gateway;
pub use gateway::GatewayBuilder;

// ============================================================================
// SECTION: Capabilities
// ============================================================================

/// Query capabilities a gateway can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Blob storage holding the configuration document.
    ObjectStorage,
    /// Virtual machine inventory.
    VirtualMachineInventory,
    /// Managed database inventory.
    ManagedDatabaseInventory,
    /// Metrics listing within a namespace.
    MetricsNamespaceListing,
    /// Resource lookup by tag.
    ResourceTagLookup,
}

impl Capability {
    /// Every supported capability.
    pub const ALL: [Self; 5] = [
        Self::ObjectStorage,
        Self::VirtualMachineInventory,
        Self::ManagedDatabaseInventory,
        Self::MetricsNamespaceListing,
        Self::ResourceTagLookup,
    ];

    /// Returns the canonical capability name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ObjectStorage => "object-storage",
            Self::VirtualMachineInventory => "virtual-machine-inventory",
            Self::ManagedDatabaseInventory => "managed-database-inventory",
            Self::MetricsNamespaceListing => "metrics-namespace-listing",
            Self::ResourceTagLookup => "resource-tag-lookup",
        }
    }

    /// Returns the AWS service name serving the capability.
    #[must_use]
    pub const fn service_name(self) -> &'static str {
        match self {
            Self::ObjectStorage => "s3",
            Self::VirtualMachineInventory => "ec2",
            Self::ManagedDatabaseInventory => "rds",
            Self::MetricsNamespaceListing => "cloudwatch",
            Self::ResourceTagLookup => "resourcegroupstaggingapi",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = DiscoveryError;

    /// Accepts canonical names and AWS service names.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|capability| capability.as_str() == name || capability.service_name() == name)
            .ok_or_else(|| DiscoveryError::UnsupportedCapability(name.to_string()))
    }
}

// ============================================================================
// SECTION: Backend Errors
// ============================================================================

/// Errors raised by capability implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Requested object does not exist.
    #[error("object not found: {0}")]
    NotFound(String),
    /// Backend returned an error.
    #[error("backend error: {0}")]
    Backend(String),
    /// Transport or runtime failure.
    #[error("backend io error: {0}")]
    Io(String),
    /// Object exceeds the read limit.
    #[error("object too large: {key} ({actual_bytes} > {max_bytes})")]
    TooLarge {
        /// Object key.
        key: String,
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual size in bytes.
        actual_bytes: usize,
    },
}

// ============================================================================
// SECTION: Inventory Records
// ============================================================================

/// Managed database instance summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseInstance {
    /// Instance identifier.
    pub identifier: String,
    /// Initial database name, when the instance has one.
    pub database_name: Option<String>,
}

/// Metric dimension name/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDimension {
    /// Dimension name.
    pub name: String,
    /// Dimension value.
    pub value: String,
}

/// Metric series returned by a namespace listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSeries {
    /// Metric namespace.
    pub namespace: String,
    /// Metric name.
    pub metric_name: String,
    /// Dimensions in the order the backend reported them.
    pub dimensions: Vec<MetricDimension>,
}

impl MetricSeries {
    /// Returns the value of the first dimension.
    #[must_use]
    pub fn first_dimension_value(&self) -> Option<&str> {
        self.dimensions.first().map(|dimension| dimension.value.as_str())
    }
}

/// Tag filter: the tag key must carry one of the values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFilter {
    /// Tag key.
    pub key: String,
    /// Accepted tag values.
    pub values: Vec<String>,
}

impl TagFilter {
    /// Builds a filter matching a single tag value.
    #[must_use]
    pub fn exact(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            values: vec![value.into()],
        }
    }

    /// Returns true when the tags satisfy the filter.
    #[must_use]
    pub fn matches(&self, tags: &BTreeMap<String, String>) -> bool {
        tags.get(&self.key).is_some_and(|value| self.values.contains(value))
    }
}

/// Resource returned by a tag lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedResource {
    /// Resource ARN.
    pub arn: String,
    /// Resource tags.
    pub tags: BTreeMap<String, String>,
}

// ============================================================================
// SECTION: Capability Traits
// ============================================================================

/// Blob storage for the configuration document.
pub trait ObjectStorage: Send + Sync {
    /// Reads an object, failing when it exceeds `max_bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] for missing objects and other
    /// [`BackendError`] variants for transport failures.
    fn get_object(&self, bucket: &str, key: &str, max_bytes: usize)
    -> Result<Vec<u8>, BackendError>;

    /// Writes an object, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the write fails.
    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), BackendError>;
}

/// Virtual machine inventory.
pub trait VirtualMachineInventory: Send + Sync {
    /// Returns ids of instances whose tag `tag_key` equals `tag_value`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the query fails.
    fn instance_ids_by_tag(&self, tag_key: &str, tag_value: &str)
    -> Result<Vec<String>, BackendError>;
}

/// Managed database inventory.
pub trait ManagedDatabaseInventory: Send + Sync {
    /// Returns every database instance visible to the session.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the query fails.
    fn describe_instances(&self) -> Result<Vec<DatabaseInstance>, BackendError>;
}

/// Metrics listing scoped to a namespace.
pub trait MetricsNamespaceListing: Send + Sync {
    /// Returns the series of `metric_name` in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the query fails.
    fn list_metrics(&self, namespace: &str, metric_name: &str)
    -> Result<Vec<MetricSeries>, BackendError>;
}

/// Resource lookup by tag.
pub trait ResourceTagLookup: Send + Sync {
    /// Returns resources matching every filter and one of the resource types.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the query fails.
    fn resources(
        &self,
        tag_filters: &[TagFilter],
        resource_types: &[&str],
    ) -> Result<Vec<TaggedResource>, BackendError>;
}
