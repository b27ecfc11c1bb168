// crates/metrics-discovery-aws/src/ec2.rs
// ============================================================================
// Module: EC2 Instance Inventory
// Description: Virtual machine capability backed by EC2 DescribeInstances.
// Purpose: Find instance ids by tag across every result page.
// Dependencies: aws-sdk-ec2, metrics-discovery-core
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use aws_sdk_ec2::Client;
use aws_sdk_ec2::types::Filter;
use metrics_discovery_core::BackendError;
use metrics_discovery_core::VirtualMachineInventory;

use crate::runtime::SharedRuntime;

// ============================================================================
// SECTION: Client
// ============================================================================

/// EC2-backed virtual machine inventory.
pub struct Ec2VirtualMachineInventory {
    /// Underlying EC2 client.
    client: Client,
    /// Runtime for blocking EC2 operations.
    runtime: SharedRuntime,
}

impl Ec2VirtualMachineInventory {
    /// Wraps an EC2 client.
    pub(crate) const fn new(client: Client, runtime: SharedRuntime) -> Self {
        Self {
            client,
            runtime,
        }
    }
}

impl VirtualMachineInventory for Ec2VirtualMachineInventory {
    fn instance_ids_by_tag(
        &self,
        tag_key: &str,
        tag_value: &str,
    ) -> Result<Vec<String>, BackendError> {
        let client = self.client.clone();
        let filter = Filter::builder().name(format!("tag:{tag_key}")).values(tag_value).build();
        self.runtime.block_on(async move {
            let mut pages = client.describe_instances().filters(filter).into_paginator().send();
            let mut ids = Vec::new();
            while let Some(page) = pages.next().await {
                let page = page.map_err(|err| BackendError::Backend(err.to_string()))?;
                ids.extend(
                    page.reservations()
                        .iter()
                        .flat_map(|reservation| reservation.instances())
                        .filter_map(|instance| instance.instance_id())
                        .map(ToString::to_string),
                );
            }
            Ok(ids)
        })
    }
}
