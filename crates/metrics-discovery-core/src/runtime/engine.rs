// crates/metrics-discovery-core/src/runtime/engine.rs
// ============================================================================
// Module: Document Merge Engine
// Description: Full discovery run folding resolver output into the document.
// Purpose: Update every category without losing recorded identifiers.
// Dependencies: crate::{audit, core, runtime}, serde
// ============================================================================

//! ## Overview
//! A discovery run resolves each category in a fixed order and merges the
//! result into the document one category at a time. A failing category is
//! logged and left untouched; the remaining categories still run. The whole
//! document is saved once at the end, and only when the stored state was
//! read or known to be absent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Serialize;

use crate::audit::AuditLevel;
use crate::audit::DiscoveryAuditEvent;
use crate::audit::DiscoveryAuditSink;
use crate::core::document::ConfigDocument;
use crate::core::document::MergeOutcome;
use crate::core::error::DiscoveryError;
use crate::core::identity::StackIdentity;
use crate::core::naming::Category;
use crate::core::naming::WorkerStatistic;
use crate::runtime::resolver::InventoryResolver;
use crate::runtime::store::DocumentStore;
use crate::runtime::store::LoadedDocument;

// ============================================================================
// SECTION: Reports
// ============================================================================

/// Outcome of one category in a discovery run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CategoryStatus {
    /// Values were merged into the document.
    Merged(MergeOutcome),
    /// Nothing was recorded.
    Skipped {
        /// Reason the category was skipped.
        reason: String,
    },
    /// Resolution failed; the key keeps its previous values.
    Failed {
        /// Normalized error kind label.
        error_kind: &'static str,
        /// Error message.
        message: String,
    },
}

/// Per-category entry of a discovery report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryReport {
    /// Document key of the category.
    pub key: String,
    /// Category outcome.
    #[serde(flatten)]
    pub status: CategoryStatus,
}

/// Summary of a discovery run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryReport {
    /// Stack name.
    pub stack: String,
    /// Version label.
    pub version: String,
    /// Category outcomes in discovery order.
    pub categories: Vec<CategoryReport>,
    /// Whether the document was saved.
    pub saved: bool,
}

impl DiscoveryReport {
    /// Returns the number of failed categories.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.categories
            .iter()
            .filter(|category| matches!(category.status, CategoryStatus::Failed { .. }))
            .count()
    }

    /// Returns the number of values appended across all categories.
    #[must_use]
    pub fn appended_count(&self) -> usize {
        self.categories
            .iter()
            .map(|category| match category.status {
                CategoryStatus::Merged(outcome) => outcome.appended,
                _ => 0,
            })
            .sum()
    }

    /// Returns the report entry for a key.
    #[must_use]
    pub fn category(&self, key: &str) -> Option<&CategoryReport> {
        self.categories.iter().find(|category| category.key == key)
    }
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Discovery engine merging resolver output into the document.
pub struct DiscoveryEngine {
    /// Inventory resolver.
    resolver: InventoryResolver,
    /// Document store.
    store: DocumentStore,
    /// Audit sink for merge events.
    audit: Arc<dyn DiscoveryAuditSink>,
}

impl DiscoveryEngine {
    /// Creates an engine.
    #[must_use]
    pub fn new(
        resolver: InventoryResolver,
        store: DocumentStore,
        audit: Arc<dyn DiscoveryAuditSink>,
    ) -> Self {
        Self {
            resolver,
            store,
            audit,
        }
    }

    /// Returns the resolver.
    #[must_use]
    pub const fn resolver(&self) -> &InventoryResolver {
        &self.resolver
    }

    /// Returns the document store.
    #[must_use]
    pub const fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Loads the persisted document.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::NotInitialized`] when the store is unusable.
    pub fn load_document(&self) -> Result<LoadedDocument, DiscoveryError> {
        self.store.load()
    }

    /// Merges values into a key and records the outcome.
    pub fn merge_entry(
        &self,
        document: &mut ConfigDocument,
        key: &str,
        values: Vec<String>,
    ) -> MergeOutcome {
        let outcome = document.merge_entry(key, values);
        self.audit.record(
            &DiscoveryAuditEvent::new("category_merged", AuditLevel::Info)
                .with_key(key)
                .with_count(outcome.appended),
        );
        outcome
    }

    /// Resolves and merges every category without saving.
    pub fn collect(
        &self,
        document: &mut ConfigDocument,
        identity: &StackIdentity,
    ) -> DiscoveryReport {
        let categories = Category::DISCOVERY_ORDER
            .into_iter()
            .map(|category| {
                let key = category.key(&identity.version);
                let status = match self.resolve(category, identity) {
                    Ok(values) if category == Category::RepoAlbName && values.is_empty() => {
                        let reason = "no load balancer matched".to_string();
                        self.audit.record(
                            &DiscoveryAuditEvent::new("category_skipped", AuditLevel::Info)
                                .with_key(key.clone())
                                .with_message(reason.clone()),
                        );
                        CategoryStatus::Skipped {
                            reason,
                        }
                    }
                    Ok(values) => CategoryStatus::Merged(self.merge_entry(document, &key, values)),
                    Err(error) => {
                        self.audit.record(
                            &DiscoveryAuditEvent::new("category_failed", AuditLevel::Error)
                                .with_key(key.clone())
                                .with_error(&error),
                        );
                        CategoryStatus::Failed {
                            error_kind: error.kind(),
                            message: error.to_string(),
                        }
                    }
                };
                CategoryReport {
                    key,
                    status,
                }
            })
            .collect();
        DiscoveryReport {
            stack: identity.stack.clone(),
            version: identity.version.clone(),
            categories,
            saved: false,
        }
    }

    /// Loads the stored document, runs every category, and saves once.
    ///
    /// An unreadable or corrupt blob aborts the run before any category is
    /// resolved, leaving the stored blob untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::NotInitialized`] when the store is unusable,
    /// the load cause when the stored blob could not be used, and the save
    /// error when the write fails.
    pub fn discover(&self, identity: &StackIdentity) -> Result<DiscoveryReport, DiscoveryError> {
        let mut document = self.store.load()?.into_current().inspect_err(|error| {
            self.audit.record(
                &DiscoveryAuditEvent::new("discovery_aborted", AuditLevel::Error)
                    .with_key(self.store.location().key.clone())
                    .with_error(error),
            );
        })?;
        self.run_full_discovery(&mut document, identity)
    }

    /// Runs every category on `document`, then saves it once.
    ///
    /// `document` must come from a writable load (see
    /// [`LoadedDocument::is_writable`]); the save replaces the stored blob.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] only when the save fails; category failures
    /// are reported in the returned [`DiscoveryReport`].
    pub fn run_full_discovery(
        &self,
        document: &mut ConfigDocument,
        identity: &StackIdentity,
    ) -> Result<DiscoveryReport, DiscoveryError> {
        let mut report = self.collect(document, identity);
        self.store.save(document)?;
        report.saved = true;
        self.audit.record(
            &DiscoveryAuditEvent::new("discovery_completed", AuditLevel::Info)
                .with_message(format!("{}/{}", identity.stack, identity.version))
                .with_count(report.appended_count()),
        );
        Ok(report)
    }

    /// Resolves the identifiers of one category.
    fn resolve(
        &self,
        category: Category,
        identity: &StackIdentity,
    ) -> Result<Vec<String>, DiscoveryError> {
        let instances = &identity.instances;
        match category {
            Category::Ec2Instances(environment) => self.resolver.compute_instance_ids(
                environment,
                &identity.stack,
                instances.get(environment),
            ),
            Category::MemoryInstances(kind) => {
                self.resolver.memory_metric_instances(instances.get(kind.environment()), kind)
            }
            Category::WorkerNames => self
                .resolver
                .worker_stat_instances(&instances.workers, WorkerStatistic::CompletedJobCount),
            Category::RepoAlbName => {
                let name = self.resolver.load_balancer_name(&identity.stack, &instances.repo)?;
                Ok(if name.is_empty() { Vec::new() } else { vec![name] })
            }
        }
    }
}
