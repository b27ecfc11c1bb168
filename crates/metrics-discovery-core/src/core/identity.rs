// crates/metrics-discovery-core/src/core/identity.rs
// ============================================================================
// Module: Stack Identity
// Description: Stack, version, and per-environment instance labels.
// Purpose: Carry the discovery target through resolver and engine calls.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A discovery run targets one stack version. Each environment of that
//! version runs under its own instance label, supplied by the invoker as a
//! comma-separated `repo,workers,portal` list.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::error::DiscoveryError;
use crate::core::naming::Environment;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Instance labels for each environment of a stack version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentInstances {
    /// Repository instance label.
    pub repo: String,
    /// Workers instance label.
    pub workers: String,
    /// Portal instance label.
    pub portal: String,
}

impl EnvironmentInstances {
    /// Parses a `repo,workers,portal` label list.
    ///
    /// Labels are trimmed; their grammar is checked later by each category
    /// that uses them.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::InvalidLabelFormat`] unless exactly three
    /// non-empty labels are given.
    pub fn parse(list: &str) -> Result<Self, DiscoveryError> {
        let labels: Vec<&str> = list.split(',').map(str::trim).collect();
        match labels.as_slice() {
            [repo, workers, portal] if labels.iter().all(|label| !label.is_empty()) => Ok(Self {
                repo: (*repo).to_string(),
                workers: (*workers).to_string(),
                portal: (*portal).to_string(),
            }),
            _ => Err(DiscoveryError::InvalidLabelFormat(format!(
                "{list:?} (expected three comma-separated labels: repo,workers,portal)"
            ))),
        }
    }

    /// Returns the label of an environment.
    #[must_use]
    pub fn get(&self, environment: Environment) -> &str {
        match environment {
            Environment::Repo => &self.repo,
            Environment::Workers => &self.workers,
            Environment::Portal => &self.portal,
        }
    }
}

/// Discovery target: a stack version and its environment labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackIdentity {
    /// Stack name (for example `prod`).
    pub stack: String,
    /// Version label used in document keys.
    pub version: String,
    /// Instance labels per environment.
    pub instances: EnvironmentInstances,
}

impl StackIdentity {
    /// Creates a stack identity.
    #[must_use]
    pub fn new(
        stack: impl Into<String>,
        version: impl Into<String>,
        instances: EnvironmentInstances,
    ) -> Self {
        Self {
            stack: stack.into(),
            version: version.into(),
            instances,
        }
    }
}
