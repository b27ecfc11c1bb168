// crates/metrics-discovery-core/src/runtime/memory.rs
// ============================================================================
// Module: In-Memory Backends
// Description: Deterministic capability implementations held in memory.
// Purpose: Run the discovery runtime offline in tests.
// Dependencies: crate::interfaces
// ============================================================================

//! ## Overview
//! Each backend answers queries from fixed data with the same filtering rules
//! the cloud APIs apply. [`FailingBackend`] implements every capability and
//! fails every call, for exercising partial-failure handling.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use crate::interfaces::BackendError;
use crate::interfaces::DatabaseInstance;
use crate::interfaces::ManagedDatabaseInventory;
use crate::interfaces::MetricDimension;
use crate::interfaces::MetricSeries;
use crate::interfaces::MetricsNamespaceListing;
use crate::interfaces::ObjectStorage;
use crate::interfaces::ResourceTagLookup;
use crate::interfaces::TagFilter;
use crate::interfaces::TaggedResource;
use crate::interfaces::VirtualMachineInventory;

// ============================================================================
// SECTION: Object Storage
// ============================================================================

/// Object storage keyed by bucket and key.
#[derive(Default)]
pub struct InMemoryObjectStorage {
    /// Stored objects.
    objects: Mutex<BTreeMap<(String, String), Vec<u8>>>,
    /// Error returned by every read, when set.
    read_failure: Option<BackendError>,
    /// Error returned by every write, when set.
    write_failure: Option<BackendError>,
    /// Number of successful writes.
    writes: AtomicUsize,
}

impl InMemoryObjectStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an object.
    #[must_use]
    pub fn with_object(self, bucket: &str, key: &str, bytes: impl Into<Vec<u8>>) -> Self {
        if let Ok(mut objects) = self.objects.lock() {
            objects.insert((bucket.to_string(), key.to_string()), bytes.into());
        }
        self
    }

    /// Makes every read fail with `error`.
    #[must_use]
    pub fn with_read_failure(mut self, error: BackendError) -> Self {
        self.read_failure = Some(error);
        self
    }

    /// Makes every write fail with `error`.
    #[must_use]
    pub fn with_write_failure(mut self, error: BackendError) -> Self {
        self.write_failure = Some(error);
        self
    }

    /// Returns a stored object.
    #[must_use]
    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .ok()
            .and_then(|objects| objects.get(&(bucket.to_string(), key.to_string())).cloned())
    }

    /// Returns the number of successful writes.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl ObjectStorage for InMemoryObjectStorage {
    fn get_object(
        &self,
        bucket: &str,
        key: &str,
        max_bytes: usize,
    ) -> Result<Vec<u8>, BackendError> {
        if let Some(error) = &self.read_failure {
            return Err(error.clone());
        }
        let bytes = self
            .objects
            .lock()
            .map_err(|_| BackendError::Io("object store lock poisoned".to_string()))?
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("{bucket}/{key}")))?;
        if bytes.len() > max_bytes {
            return Err(BackendError::TooLarge {
                key: key.to_string(),
                max_bytes,
                actual_bytes: bytes.len(),
            });
        }
        Ok(bytes)
    }

    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        _content_type: Option<&str>,
    ) -> Result<(), BackendError> {
        if let Some(error) = &self.write_failure {
            return Err(error.clone());
        }
        self.objects
            .lock()
            .map_err(|_| BackendError::Io("object store lock poisoned".to_string()))?
            .insert((bucket.to_string(), key.to_string()), bytes);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// SECTION: Virtual Machines
// ============================================================================

/// Virtual machine inventory keyed by tag.
#[derive(Default)]
pub struct StaticVirtualMachineInventory {
    /// Instance ids per (tag key, tag value).
    instances: BTreeMap<(String, String), Vec<String>>,
}

impl StaticVirtualMachineInventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds instances carrying a tag.
    #[must_use]
    pub fn with_instances(mut self, tag_key: &str, tag_value: &str, ids: &[&str]) -> Self {
        self.instances
            .entry((tag_key.to_string(), tag_value.to_string()))
            .or_default()
            .extend(ids.iter().map(ToString::to_string));
        self
    }
}

impl VirtualMachineInventory for StaticVirtualMachineInventory {
    fn instance_ids_by_tag(
        &self,
        tag_key: &str,
        tag_value: &str,
    ) -> Result<Vec<String>, BackendError> {
        Ok(self
            .instances
            .get(&(tag_key.to_string(), tag_value.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

// ============================================================================
// SECTION: Databases
// ============================================================================

/// Managed database inventory with a fixed instance list.
#[derive(Default)]
pub struct StaticDatabaseInventory {
    /// Database instances in listing order.
    instances: Vec<DatabaseInstance>,
}

impl StaticDatabaseInventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a database instance.
    #[must_use]
    pub fn with_instance(mut self, identifier: &str, database_name: Option<&str>) -> Self {
        self.instances.push(DatabaseInstance {
            identifier: identifier.to_string(),
            database_name: database_name.map(ToString::to_string),
        });
        self
    }
}

impl ManagedDatabaseInventory for StaticDatabaseInventory {
    fn describe_instances(&self) -> Result<Vec<DatabaseInstance>, BackendError> {
        Ok(self.instances.clone())
    }
}

// ============================================================================
// SECTION: Metrics
// ============================================================================

/// Metrics listing over a fixed series list.
#[derive(Default)]
pub struct StaticMetricsListing {
    /// Series in listing order.
    series: Vec<MetricSeries>,
    /// Number of listing calls served.
    calls: AtomicUsize,
}

impl StaticMetricsListing {
    /// Creates an empty listing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one series per dimension value.
    #[must_use]
    pub fn with_series(
        mut self,
        namespace: &str,
        metric_name: &str,
        dimension_name: &str,
        values: &[&str],
    ) -> Self {
        self.series.extend(values.iter().map(|value| MetricSeries {
            namespace: namespace.to_string(),
            metric_name: metric_name.to_string(),
            dimensions: vec![MetricDimension {
                name: dimension_name.to_string(),
                value: (*value).to_string(),
            }],
        }));
        self
    }

    /// Adds a series without dimensions.
    #[must_use]
    pub fn with_dimensionless_series(mut self, namespace: &str, metric_name: &str) -> Self {
        self.series.push(MetricSeries {
            namespace: namespace.to_string(),
            metric_name: metric_name.to_string(),
            dimensions: Vec::new(),
        });
        self
    }

    /// Returns the number of listing calls served.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MetricsNamespaceListing for StaticMetricsListing {
    fn list_metrics(
        &self,
        namespace: &str,
        metric_name: &str,
    ) -> Result<Vec<MetricSeries>, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .series
            .iter()
            .filter(|series| series.namespace == namespace && series.metric_name == metric_name)
            .cloned()
            .collect())
    }
}

// ============================================================================
// SECTION: Tags
// ============================================================================

/// Resource tag lookup over a fixed resource list.
#[derive(Default)]
pub struct StaticResourceTagLookup {
    /// Resources in listing order.
    resources: Vec<TaggedResource>,
}

impl StaticResourceTagLookup {
    /// Creates an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource with its tags.
    #[must_use]
    pub fn with_resource(mut self, arn: &str, tags: &[(&str, &str)]) -> Self {
        self.resources.push(TaggedResource {
            arn: arn.to_string(),
            tags: tags
                .iter()
                .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
                .collect(),
        });
        self
    }
}

impl ResourceTagLookup for StaticResourceTagLookup {
    fn resources(
        &self,
        tag_filters: &[TagFilter],
        resource_types: &[&str],
    ) -> Result<Vec<TaggedResource>, BackendError> {
        Ok(self
            .resources
            .iter()
            .filter(|resource| tag_filters.iter().all(|filter| filter.matches(&resource.tags)))
            .filter(|resource| {
                resource_types.is_empty()
                    || arn_resource_type(&resource.arn)
                        .is_some_and(|kind| resource_types.contains(&kind.as_str()))
            })
            .cloned()
            .collect())
    }
}

/// Returns `service:resource-type` for an ARN.
fn arn_resource_type(arn: &str) -> Option<String> {
    let mut parts = arn.splitn(6, ':');
    let service = parts.nth(2)?;
    let resource = parts.nth(2)?;
    let kind = resource.split(['/', ':']).next()?;
    Some(format!("{service}:{kind}"))
}

// ============================================================================
// SECTION: Failing Backend
// ============================================================================

/// Backend failing every call with a fixed message.
pub struct FailingBackend {
    /// Error message returned by every call.
    message: String,
}

impl FailingBackend {
    /// Creates a backend failing with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error every call fails with.
    fn error(&self) -> BackendError {
        BackendError::Backend(self.message.clone())
    }
}

impl ObjectStorage for FailingBackend {
    fn get_object(&self, _bucket: &str, _key: &str, _max: usize) -> Result<Vec<u8>, BackendError> {
        Err(self.error())
    }

    fn put_object(
        &self,
        _bucket: &str,
        _key: &str,
        _bytes: Vec<u8>,
        _content_type: Option<&str>,
    ) -> Result<(), BackendError> {
        Err(self.error())
    }
}

impl VirtualMachineInventory for FailingBackend {
    fn instance_ids_by_tag(&self, _key: &str, _value: &str) -> Result<Vec<String>, BackendError> {
        Err(self.error())
    }
}

impl ManagedDatabaseInventory for FailingBackend {
    fn describe_instances(&self) -> Result<Vec<DatabaseInstance>, BackendError> {
        Err(self.error())
    }
}

impl MetricsNamespaceListing for FailingBackend {
    fn list_metrics(&self, _ns: &str, _name: &str) -> Result<Vec<MetricSeries>, BackendError> {
        Err(self.error())
    }
}

impl ResourceTagLookup for FailingBackend {
    fn resources(
        &self,
        _tag_filters: &[TagFilter],
        _resource_types: &[&str],
    ) -> Result<Vec<TaggedResource>, BackendError> {
        Err(self.error())
    }
}
