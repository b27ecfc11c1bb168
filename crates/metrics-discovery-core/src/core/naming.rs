// crates/metrics-discovery-core/src/core/naming.rs
// ============================================================================
// Module: Naming Grammar
// Description: Namespace, tag, and document-key derivation from stack labels.
// Purpose: Keep every naming convention in one pure, testable place.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! An instance label has the form `<version-code>-<instance-letter>` (for
//! example `512-0`). The version code, everything before the first hyphen,
//! scopes the metrics namespaces published by a running stack. Every function
//! here is pure and deterministic; none performs I/O.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::core::error::DiscoveryError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Separator between the version code and the instance letter.
pub const LABEL_SEPARATOR: char = '-';
/// Metric name published by the memory monitors.
pub const MEMORY_USED_METRIC: &str = "used";
/// EC2 tag key holding the composite instance name.
pub const EC2_NAME_TAG: &str = "Name";
/// Tag key Elastic Beanstalk stamps on environment resources.
pub const BEANSTALK_ENVIRONMENT_TAG: &str = "elasticbeanstalk:environment-name";
/// Resource type filter for load balancers in the tagging API.
pub const LOAD_BALANCER_RESOURCE_TYPE: &str = "elasticloadbalancing:loadbalancer";
/// Resource marker preceding the load balancer short name in an ARN.
pub const LOAD_BALANCER_ARN_MARKER: &str = "loadbalancer/";
/// Database name suffix of the id generator database.
pub const IDGEN_DATABASE_SUFFIX: &str = "idgen";

// ============================================================================
// SECTION: Environments
// ============================================================================

/// Deployed environment of a stack version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Repository service.
    Repo,
    /// Background workers service.
    Workers,
    /// Web portal.
    Portal,
}

impl Environment {
    /// Environments in discovery order.
    pub const ALL: [Self; 3] = [Self::Repo, Self::Workers, Self::Portal];

    /// Returns the environment name used in tags and document keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Repo => "repo",
            Self::Workers => "workers",
            Self::Portal => "portal",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Instance Kinds
// ============================================================================

/// Instance kind publishing memory metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InstanceKind {
    /// Repository instances.
    Repository,
    /// Worker instances.
    Workers,
}

impl InstanceKind {
    /// Returns the namespace prefix for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Repository => "Repository",
            Self::Workers => "Workers",
        }
    }

    /// Returns the environment whose instances publish this kind.
    #[must_use]
    pub const fn environment(self) -> Environment {
        match self {
            Self::Repository => Environment::Repo,
            Self::Workers => Environment::Workers,
        }
    }
}

impl fmt::Display for InstanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstanceKind {
    type Err = DiscoveryError;

    /// Accepts the full kind names and the single-letter forms `R` and `W`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Repository" | "R" => Ok(Self::Repository),
            "Workers" | "W" => Ok(Self::Workers),
            other => Err(DiscoveryError::InvalidInstanceKind(format!(
                "{other:?} (expected Repository or Workers)"
            ))),
        }
    }
}

// ============================================================================
// SECTION: Worker Statistics
// ============================================================================

/// Statistics published by the worker stack.
///
/// # Invariants
/// - All statistics share one dimension population per namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WorkerStatistic {
    /// Jobs completed per period.
    CompletedJobCount,
    /// Share of time the worker was running.
    TimeRunning,
    /// Cumulative worker runtime.
    CumulativeRuntime,
}

impl WorkerStatistic {
    /// Every published worker statistic.
    pub const ALL: [Self; 3] =
        [Self::CompletedJobCount, Self::TimeRunning, Self::CumulativeRuntime];

    /// Returns the metric name as published.
    #[must_use]
    pub const fn metric_name(self) -> &'static str {
        match self {
            Self::CompletedJobCount => "Completed Job Count",
            Self::TimeRunning => "% Time Running",
            Self::CumulativeRuntime => "Cumulative runtime",
        }
    }
}

// ============================================================================
// SECTION: Document Categories
// ============================================================================

/// Category of identifiers recorded per stack version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    /// EC2 instance ids of an environment.
    Ec2Instances(Environment),
    /// Memory metric dimension values of an instance kind.
    MemoryInstances(InstanceKind),
    /// Worker names from the worker statistics namespace.
    WorkerNames,
    /// Short name of the repository load balancer.
    RepoAlbName,
}

impl Category {
    /// Categories in the order a full discovery run merges them.
    pub const DISCOVERY_ORDER: [Self; 7] = [
        Self::Ec2Instances(Environment::Repo),
        Self::Ec2Instances(Environment::Workers),
        Self::Ec2Instances(Environment::Portal),
        Self::MemoryInstances(InstanceKind::Repository),
        Self::MemoryInstances(InstanceKind::Workers),
        Self::WorkerNames,
        Self::RepoAlbName,
    ];

    /// Returns the document key suffix for the category.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Ec2Instances(Environment::Repo) => "repo-ec2-instances",
            Self::Ec2Instances(Environment::Workers) => "workers-ec2-instances",
            Self::Ec2Instances(Environment::Portal) => "portal-ec2-instances",
            Self::MemoryInstances(InstanceKind::Repository) => "repo-vmids",
            Self::MemoryInstances(InstanceKind::Workers) => "workers-vmids",
            Self::WorkerNames => "workers-names",
            Self::RepoAlbName => "repo-alb-name",
        }
    }

    /// Returns the document key for the category under a stack version.
    #[must_use]
    pub fn key(self, version: &str) -> String {
        document_key(version, self.suffix())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

// ============================================================================
// SECTION: Derivations
// ============================================================================

/// Returns the version code of an instance label.
///
/// # Errors
///
/// Returns [`DiscoveryError::InvalidLabelFormat`] when the label has no hyphen.
pub fn instance_code(label: &str) -> Result<&str, DiscoveryError> {
    label.split_once(LABEL_SEPARATOR).map(|(code, _)| code).ok_or_else(|| {
        DiscoveryError::InvalidLabelFormat(format!("{label:?} (expected format is 'xxx-y')"))
    })
}

/// Returns the worker statistics namespace for a label.
///
/// # Errors
///
/// Returns [`DiscoveryError::InvalidLabelFormat`] for malformed labels.
pub fn worker_stats_namespace(label: &str) -> Result<String, DiscoveryError> {
    Ok(format!("Worker-Statistics-{}", instance_code(label)?))
}

/// Returns the asynchronous workers namespace for a label.
///
/// # Errors
///
/// Returns [`DiscoveryError::InvalidLabelFormat`] for malformed labels.
pub fn async_workers_namespace(label: &str) -> Result<String, DiscoveryError> {
    Ok(format!("Asynchronous Workers - {}", instance_code(label)?))
}

/// Returns the asynchronous job statistics namespace for a label.
///
/// # Errors
///
/// Returns [`DiscoveryError::InvalidLabelFormat`] for malformed labels.
pub fn async_job_stats_namespace(label: &str) -> Result<String, DiscoveryError> {
    Ok(format!("Asynchronous-Jobs-{}", instance_code(label)?))
}

/// Returns the memory namespace for a label and instance kind.
///
/// # Errors
///
/// Returns [`DiscoveryError::InvalidLabelFormat`] for malformed labels.
pub fn memory_namespace(label: &str, kind: InstanceKind) -> Result<String, DiscoveryError> {
    Ok(format!("{kind}-Memory-{}", instance_code(label)?))
}

/// Returns the `Name` tag value of an environment's EC2 instances.
#[must_use]
pub fn ec2_name_tag(environment: Environment, stack: &str, label: &str) -> String {
    format!("{environment}-{stack}-{label}")
}

/// Returns the Elastic Beanstalk environment name of the repository.
#[must_use]
pub fn beanstalk_environment_name(stack: &str, label: &str) -> String {
    format!("repo-{stack}-{label}")
}

/// Returns the database name of a stack release.
#[must_use]
pub fn database_name(stack: &str, suffix: &str) -> String {
    format!("{stack}{suffix}")
}

/// Returns the document key for a version and category suffix.
#[must_use]
pub fn document_key(version: &str, suffix: &str) -> String {
    format!("{version}-{suffix}")
}

/// Extracts the load balancer short name from its ARN.
///
/// The short name is the resource part after `loadbalancer/`, for example
/// `app/my-alb/abc123`. Returns `None` when the ARN has no such part.
#[must_use]
pub fn load_balancer_short_name(arn: &str) -> Option<&str> {
    let resource = arn.rsplit(':').next()?;
    resource.strip_prefix(LOAD_BALANCER_ARN_MARKER).filter(|name| !name.is_empty())
}
