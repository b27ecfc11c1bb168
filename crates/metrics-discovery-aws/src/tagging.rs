// crates/metrics-discovery-aws/src/tagging.rs
// ============================================================================
// Module: Resource Tagging Lookup
// Description: Tag lookup capability backed by the Resource Groups Tagging API.
// Purpose: Find resources of given types by tag across every result page.
// Dependencies: aws-sdk-resourcegroupstagging, metrics-discovery-core
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use aws_sdk_resourcegroupstagging::Client;
use aws_sdk_resourcegroupstagging::types;
use metrics_discovery_core::BackendError;
use metrics_discovery_core::ResourceTagLookup;
use metrics_discovery_core::TagFilter;
use metrics_discovery_core::TaggedResource;

use crate::runtime::SharedRuntime;

// ============================================================================
// SECTION: Client
// ============================================================================

/// Tagging API-backed resource lookup.
pub struct TaggingResourceLookup {
    /// Underlying tagging client.
    client: Client,
    /// Runtime for blocking tagging operations.
    runtime: SharedRuntime,
}

impl TaggingResourceLookup {
    /// Wraps a tagging client.
    pub(crate) const fn new(client: Client, runtime: SharedRuntime) -> Self {
        Self {
            client,
            runtime,
        }
    }
}

impl ResourceTagLookup for TaggingResourceLookup {
    fn resources(
        &self,
        tag_filters: &[TagFilter],
        resource_types: &[&str],
    ) -> Result<Vec<TaggedResource>, BackendError> {
        let client = self.client.clone();
        let filters: Vec<types::TagFilter> = tag_filters
            .iter()
            .map(|filter| {
                types::TagFilter::builder()
                    .key(&filter.key)
                    .set_values(Some(filter.values.clone()))
                    .build()
            })
            .collect();
        let resource_types: Vec<String> =
            resource_types.iter().map(ToString::to_string).collect();
        self.runtime.block_on(async move {
            let mut request = client.get_resources().set_tag_filters(Some(filters));
            if !resource_types.is_empty() {
                request = request.set_resource_type_filters(Some(resource_types));
            }
            let mut pages = request.into_paginator().send();
            let mut resources = Vec::new();
            while let Some(page) = pages.next().await {
                let page = page.map_err(|err| BackendError::Backend(err.to_string()))?;
                resources.extend(page.resource_tag_mapping_list().iter().filter_map(|mapping| {
                    Some(TaggedResource {
                        arn: mapping.resource_arn()?.to_string(),
                        tags: mapping
                            .tags()
                            .iter()
                            .map(|tag| (tag.key().to_string(), tag.value().to_string()))
                            .collect(),
                    })
                }));
            }
            Ok(resources)
        })
    }
}
