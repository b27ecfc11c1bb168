// crates/metrics-discovery-aws/src/cloudwatch.rs
// ============================================================================
// Module: CloudWatch Metrics Listing
// Description: Metrics listing capability backed by CloudWatch ListMetrics.
// Purpose: Enumerate metric series and their dimensions in a namespace.
// Dependencies: aws-sdk-cloudwatch, metrics-discovery-core
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use aws_sdk_cloudwatch::Client;
use aws_sdk_cloudwatch::types::Metric;
use metrics_discovery_core::BackendError;
use metrics_discovery_core::MetricDimension;
use metrics_discovery_core::MetricSeries;
use metrics_discovery_core::MetricsNamespaceListing;

use crate::runtime::SharedRuntime;

// ============================================================================
// SECTION: Client
// ============================================================================

/// CloudWatch-backed metrics listing.
pub struct CloudWatchMetricsListing {
    /// Underlying CloudWatch client.
    client: Client,
    /// Runtime for blocking CloudWatch operations.
    runtime: SharedRuntime,
}

impl CloudWatchMetricsListing {
    /// Wraps a CloudWatch client.
    pub(crate) const fn new(client: Client, runtime: SharedRuntime) -> Self {
        Self {
            client,
            runtime,
        }
    }
}

impl MetricsNamespaceListing for CloudWatchMetricsListing {
    fn list_metrics(
        &self,
        namespace: &str,
        metric_name: &str,
    ) -> Result<Vec<MetricSeries>, BackendError> {
        let client = self.client.clone();
        let namespace = namespace.to_string();
        let metric_name = metric_name.to_string();
        self.runtime.block_on(async move {
            let mut pages = client
                .list_metrics()
                .namespace(&namespace)
                .metric_name(&metric_name)
                .into_paginator()
                .send();
            let mut series = Vec::new();
            while let Some(page) = pages.next().await {
                let page = page.map_err(|err| BackendError::Backend(err.to_string()))?;
                series.extend(
                    page.metrics().iter().map(|metric| to_series(metric, &namespace, &metric_name)),
                );
            }
            Ok(series)
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Converts a listed metric, defaulting missing names to the query values.
fn to_series(metric: &Metric, namespace: &str, metric_name: &str) -> MetricSeries {
    MetricSeries {
        namespace: metric.namespace().unwrap_or(namespace).to_string(),
        metric_name: metric.metric_name().unwrap_or(metric_name).to_string(),
        dimensions: metric
            .dimensions()
            .iter()
            .filter_map(|dimension| {
                Some(MetricDimension {
                    name: dimension.name()?.to_string(),
                    value: dimension.value()?.to_string(),
                })
            })
            .collect(),
    }
}
