// crates/metrics-discovery-aws/src/lib.rs
// ============================================================================
// Module: Metrics Discovery AWS Library
// Description: AWS SDK backends for the discovery gateway.
// Purpose: Bind every gateway capability to a live AWS service client.
// Dependencies: aws-config, aws-sdk-*, metrics-discovery-core, tokio
// ============================================================================

//! ## Overview
//! [`AwsSession`] loads one shared SDK configuration (profile, region,
//! endpoint) and builds a [`metrics_discovery_core::Gateway`] whose handles
//! call S3, EC2, RDS, CloudWatch, and the resource tagging API. Handles are
//! synchronous; each call blocks on a runtime owned by the session.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod cloudwatch;
pub mod ec2;
pub mod rds;
pub(crate) mod runtime;
pub mod s3;
pub mod session;
pub mod tagging;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use cloudwatch::CloudWatchMetricsListing;
pub use ec2::Ec2VirtualMachineInventory;
pub use rds::RdsDatabaseInventory;
pub use s3::S3ObjectStorage;
pub use session::AwsSession;
pub use tagging::TaggingResourceLookup;
