// crates/metrics-discovery-aws/src/rds.rs
// ============================================================================
// Module: RDS Database Inventory
// Description: Managed database capability backed by RDS.
// Purpose: List database instances with their database names.
// Dependencies: aws-sdk-rds, metrics-discovery-core
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use aws_sdk_rds::Client;
use metrics_discovery_core::BackendError;
use metrics_discovery_core::DatabaseInstance;
use metrics_discovery_core::ManagedDatabaseInventory;

use crate::runtime::SharedRuntime;

// ============================================================================
// SECTION: Client
// ============================================================================

/// RDS-backed database inventory.
pub struct RdsDatabaseInventory {
    /// Underlying RDS client.
    client: Client,
    /// Runtime for blocking RDS operations.
    runtime: SharedRuntime,
}

impl RdsDatabaseInventory {
    /// Wraps an RDS client.
    pub(crate) const fn new(client: Client, runtime: SharedRuntime) -> Self {
        Self {
            client,
            runtime,
        }
    }
}

impl ManagedDatabaseInventory for RdsDatabaseInventory {
    fn describe_instances(&self) -> Result<Vec<DatabaseInstance>, BackendError> {
        let client = self.client.clone();
        self.runtime.block_on(async move {
            let mut pages = client.describe_db_instances().into_paginator().send();
            let mut instances = Vec::new();
            while let Some(page) = pages.next().await {
                let page = page.map_err(|err| BackendError::Backend(err.to_string()))?;
                instances.extend(page.db_instances().iter().filter_map(|instance| {
                    Some(DatabaseInstance {
                        identifier: instance.db_instance_identifier()?.to_string(),
                        database_name: instance.db_name().map(ToString::to_string),
                    })
                }));
            }
            Ok(instances)
        })
    }
}
