// crates/metrics-discovery-core/src/runtime/resolver.rs
// ============================================================================
// Module: Inventory Resolver
// Description: Live identifier lookups parameterized by the naming grammar.
// Purpose: Turn a stack identity into per-category identifier lists.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Each operation issues one read-only gateway query and returns identifiers
//! in the order the backend reported them, with repeats dropped. An empty
//! result is valid: it means nothing matched right now.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashSet;

use crate::core::error::DiscoveryError;
use crate::core::naming;
use crate::core::naming::Environment;
use crate::core::naming::InstanceKind;
use crate::core::naming::WorkerStatistic;
use crate::interfaces::BackendError;
use crate::interfaces::Capability;
use crate::interfaces::Gateway;
use crate::interfaces::MetricSeries;
use crate::interfaces::TagFilter;

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Inventory resolver over a gateway.
#[derive(Debug, Clone)]
pub struct InventoryResolver {
    /// Gateway serving the queries.
    gateway: Gateway,
}

impl InventoryResolver {
    /// Creates a resolver.
    #[must_use]
    pub const fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
        }
    }

    /// Returns the underlying gateway.
    #[must_use]
    pub const fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Returns ids of instances tagged `{environment}-{stack}-{label}`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] when the capability is unbound or the query
    /// fails.
    pub fn compute_instance_ids(
        &self,
        environment: Environment,
        stack: &str,
        label: &str,
    ) -> Result<Vec<String>, DiscoveryError> {
        let name = naming::ec2_name_tag(environment, stack, label);
        let ids = self
            .gateway
            .virtual_machines()?
            .instance_ids_by_tag(naming::EC2_NAME_TAG, &name)
            .map_err(|err| query_failed(Capability::VirtualMachineInventory, &err))?;
        Ok(dedupe(ids))
    }

    /// Returns the instances publishing memory metrics for a label and kind.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::InvalidLabelFormat`] for malformed labels and
    /// other [`DiscoveryError`] variants for gateway failures.
    pub fn memory_metric_instances(
        &self,
        label: &str,
        kind: InstanceKind,
    ) -> Result<Vec<String>, DiscoveryError> {
        let namespace = naming::memory_namespace(label, kind)?;
        self.first_dimension_values(&namespace, naming::MEMORY_USED_METRIC)
    }

    /// Returns the worker names publishing a worker statistic.
    ///
    /// All statistics share one dimension population, so one call serves
    /// every statistic.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::InvalidLabelFormat`] for malformed labels and
    /// other [`DiscoveryError`] variants for gateway failures.
    pub fn worker_stat_instances(
        &self,
        label: &str,
        statistic: WorkerStatistic,
    ) -> Result<Vec<String>, DiscoveryError> {
        let namespace = naming::worker_stats_namespace(label)?;
        self.first_dimension_values(&namespace, statistic.metric_name())
    }

    /// Returns ids of database instances named `{stack}{suffix}`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] when the capability is unbound or the query
    /// fails.
    pub fn database_instance_ids(
        &self,
        stack: &str,
        suffix: &str,
    ) -> Result<Vec<String>, DiscoveryError> {
        let database = naming::database_name(stack, suffix);
        let instances = self
            .gateway
            .databases()?
            .describe_instances()
            .map_err(|err| query_failed(Capability::ManagedDatabaseInventory, &err))?;
        Ok(dedupe(
            instances
                .into_iter()
                .filter(|instance| instance.database_name.as_deref() == Some(database.as_str()))
                .map(|instance| instance.identifier),
        ))
    }

    /// Returns the first database instance named `{stack}{suffix}`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::ResourceNotFound`] when none matches.
    pub fn required_database_instance_id(
        &self,
        stack: &str,
        suffix: &str,
    ) -> Result<String, DiscoveryError> {
        self.database_instance_ids(stack, suffix)?.into_iter().next().ok_or_else(|| {
            DiscoveryError::ResourceNotFound(format!(
                "database instance {}",
                naming::database_name(stack, suffix)
            ))
        })
    }

    /// Returns the id generator database instance of a stack.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::ResourceNotFound`] when it does not exist.
    pub fn idgen_database_id(&self, stack: &str) -> Result<String, DiscoveryError> {
        self.required_database_instance_id(stack, naming::IDGEN_DATABASE_SUFFIX)
    }

    /// Returns the short name of the repository load balancer.
    ///
    /// Returns an empty string when no load balancer carries the
    /// environment tag.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::ResourceNotFound`] when the matched ARN has
    /// no load balancer name, and other [`DiscoveryError`] variants for
    /// gateway failures.
    pub fn load_balancer_name(&self, stack: &str, label: &str) -> Result<String, DiscoveryError> {
        let filter = TagFilter::exact(
            naming::BEANSTALK_ENVIRONMENT_TAG,
            naming::beanstalk_environment_name(stack, label),
        );
        let resources = self
            .gateway
            .tags()?
            .resources(&[filter], &[naming::LOAD_BALANCER_RESOURCE_TYPE])
            .map_err(|err| query_failed(Capability::ResourceTagLookup, &err))?;
        let Some(resource) = resources.first() else {
            return Ok(String::new());
        };
        naming::load_balancer_short_name(&resource.arn).map(ToString::to_string).ok_or_else(|| {
            DiscoveryError::ResourceNotFound(format!("load balancer name in {}", resource.arn))
        })
    }

    /// Lists a metric and returns the first dimension value of each series.
    fn first_dimension_values(
        &self,
        namespace: &str,
        metric_name: &str,
    ) -> Result<Vec<String>, DiscoveryError> {
        let series = self
            .gateway
            .metrics()?
            .list_metrics(namespace, metric_name)
            .map_err(|err| query_failed(Capability::MetricsNamespaceListing, &err))?;
        Ok(dedupe(
            series
                .iter()
                .filter_map(MetricSeries::first_dimension_value)
                .map(ToString::to_string),
        ))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Drops repeated identifiers, keeping first occurrences in order.
fn dedupe(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values.into_iter().filter(|value| seen.insert(value.clone())).collect()
}

/// Wraps a backend failure with the capability that raised it.
fn query_failed(capability: Capability, error: &BackendError) -> DiscoveryError {
    DiscoveryError::QueryFailed {
        capability,
        message: error.to_string(),
    }
}
