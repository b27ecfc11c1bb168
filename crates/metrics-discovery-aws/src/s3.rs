// crates/metrics-discovery-aws/src/s3.rs
// ============================================================================
// Module: S3 Object Storage
// Description: Object storage capability backed by Amazon S3.
// Purpose: Read and replace the configuration document blob.
// Dependencies: aws-sdk-s3, metrics-discovery-core, tokio
// ============================================================================

//! ## Overview
//! Reads are size-limited twice: up front from the reported content length,
//! and while streaming the body. A missing key is reported as
//! [`BackendError::NotFound`] so a first run can tell it apart from an
//! access or transport failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use metrics_discovery_core::BackendError;
use metrics_discovery_core::ObjectStorage;

use crate::runtime::SharedRuntime;
use crate::runtime::read_limited;

// ============================================================================
// SECTION: Client
// ============================================================================

/// S3-backed object storage.
pub struct S3ObjectStorage {
    /// Underlying S3 client.
    client: Client,
    /// Runtime for blocking S3 operations.
    runtime: SharedRuntime,
}

impl S3ObjectStorage {
    /// Wraps an S3 client.
    pub(crate) const fn new(client: Client, runtime: SharedRuntime) -> Self {
        Self {
            client,
            runtime,
        }
    }
}

impl ObjectStorage for S3ObjectStorage {
    fn get_object(
        &self,
        bucket: &str,
        key: &str,
        max_bytes: usize,
    ) -> Result<Vec<u8>, BackendError> {
        let client = self.client.clone();
        let bucket = bucket.to_string();
        let key = key.to_string();
        self.runtime.block_on(async move {
            let output =
                client.get_object().bucket(&bucket).key(&key).send().await.map_err(|err| {
                    if err.as_service_error().is_some_and(|service| service.is_no_such_key()) {
                        BackendError::NotFound(format!("s3://{bucket}/{key}"))
                    } else {
                        BackendError::Backend(err.to_string())
                    }
                })?;
            if let Some(length) = output.content_length() {
                let actual_bytes = usize::try_from(length).unwrap_or(usize::MAX);
                if actual_bytes > max_bytes {
                    return Err(BackendError::TooLarge {
                        key,
                        max_bytes,
                        actual_bytes,
                    });
                }
            }
            read_limited(output.body.into_async_read(), &key, max_bytes).await
        })
    }

    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), BackendError> {
        let client = self.client.clone();
        let bucket = bucket.to_string();
        let key = key.to_string();
        let content_type = content_type.map(str::to_string);
        self.runtime.block_on(async move {
            let body = ByteStream::from(bytes);
            let mut request = client.put_object().bucket(bucket).key(key).body(body);
            if let Some(content_type) = content_type {
                request = request.content_type(content_type);
            }
            request.send().await.map_err(|err| BackendError::Backend(err.to_string()))?;
            Ok(())
        })
    }
}
