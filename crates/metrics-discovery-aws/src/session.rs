// crates/metrics-discovery-aws/src/session.rs
// ============================================================================
// Module: AWS Session
// Description: Shared SDK configuration and gateway construction.
// Purpose: Build every service client from one profile, region, and endpoint.
// Dependencies: aws-config, aws-sdk-*, metrics-discovery-config, tokio
// ============================================================================

//! ## Overview
//! A session resolves credentials and region once and hands each service
//! client the same configuration. The endpoint override applies to every
//! client, which suits local emulators; path-style addressing only affects
//! S3.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use aws_config::BehaviorVersion;
use aws_config::Region;
use aws_config::SdkConfig;
use metrics_discovery_config::AwsConfig;
use metrics_discovery_core::BackendError;
use metrics_discovery_core::Gateway;

use crate::cloudwatch::CloudWatchMetricsListing;
use crate::ec2::Ec2VirtualMachineInventory;
use crate::rds::RdsDatabaseInventory;
use crate::runtime::SharedRuntime;
use crate::s3::S3ObjectStorage;
use crate::tagging::TaggingResourceLookup;

// ============================================================================
// SECTION: Session
// ============================================================================

/// Connected AWS session.
pub struct AwsSession {
    /// Shared SDK configuration.
    shared_config: SdkConfig,
    /// Force path-style S3 addressing.
    force_path_style: bool,
    /// Runtime shared by every client.
    runtime: SharedRuntime,
}

impl AwsSession {
    /// Loads the shared SDK configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Io`] when the runtime cannot start.
    pub fn connect(config: &AwsConfig) -> Result<Self, BackendError> {
        let runtime = SharedRuntime::new()?;
        let profile = config.profile.clone();
        let region = config.region.clone();
        let endpoint = config.endpoint.clone();
        let shared_config = runtime.block_on(async move {
            let mut loader =
                aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region));
            if let Some(profile) = profile {
                loader = loader.profile_name(profile);
            }
            if let Some(endpoint) = endpoint {
                loader = loader.endpoint_url(endpoint);
            }
            Ok(loader.load().await)
        })?;
        Ok(Self {
            shared_config,
            force_path_style: config.force_path_style,
            runtime,
        })
    }

    /// Builds a gateway with every capability bound to a live client.
    #[must_use]
    pub fn gateway(&self) -> Gateway {
        let mut s3_builder = aws_sdk_s3::config::Builder::from(&self.shared_config);
        if self.force_path_style {
            s3_builder = s3_builder.force_path_style(true);
        }
        let s3 = aws_sdk_s3::Client::from_conf(s3_builder.build());
        Gateway::builder()
            .object_storage(Arc::new(S3ObjectStorage::new(s3, self.runtime.clone())))
            .virtual_machines(Arc::new(Ec2VirtualMachineInventory::new(
                aws_sdk_ec2::Client::new(&self.shared_config),
                self.runtime.clone(),
            )))
            .databases(Arc::new(RdsDatabaseInventory::new(
                aws_sdk_rds::Client::new(&self.shared_config),
                self.runtime.clone(),
            )))
            .metrics(Arc::new(CloudWatchMetricsListing::new(
                aws_sdk_cloudwatch::Client::new(&self.shared_config),
                self.runtime.clone(),
            )))
            .tags(Arc::new(TaggingResourceLookup::new(
                aws_sdk_resourcegroupstagging::Client::new(&self.shared_config),
                self.runtime.clone(),
            )))
            .build()
    }
}
