// crates/metrics-discovery-aws/src/runtime.rs
// ============================================================================
// Module: Blocking Runtime Bridge
// Description: Run SDK futures from synchronous capability calls.
// Purpose: Share one Tokio runtime across every service client.
// Dependencies: tokio
// ============================================================================

//! ## Overview
//! Capability traits are synchronous while the SDK is async. Calls block on
//! the session runtime, or on the caller's runtime when one is already
//! running, so handles work from plain threads and from async command code.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::sync::Arc;

use metrics_discovery_core::BackendError;
use tokio::io::AsyncRead;
use tokio::io::AsyncReadExt;
use tokio::runtime::Handle;
use tokio::runtime::Runtime;
use tokio::runtime::RuntimeFlavor;

// ============================================================================
// SECTION: Runtime Helpers
// ============================================================================

/// Blocks on a backend future using a compatible runtime.
fn block_on_with_runtime<F, T>(runtime: &Runtime, future: F) -> Result<T, BackendError>
where
    F: Future<Output = Result<T, BackendError>> + Send + 'static,
    T: Send + 'static,
{
    if let Ok(handle) = Handle::try_current() {
        if matches!(handle.runtime_flavor(), RuntimeFlavor::MultiThread) {
            return tokio::task::block_in_place(|| handle.block_on(future));
        }
        let (tx, rx) = std::sync::mpsc::sync_channel(1);
        std::thread::spawn(move || {
            let result = Runtime::new()
                .map_err(|err| BackendError::Io(err.to_string()))
                .and_then(|runtime| runtime.block_on(future));
            let _ = tx.send(result);
        });
        return rx
            .recv()
            .unwrap_or_else(|_| Err(BackendError::Io("backend thread join failed".to_string())));
    }

    runtime.block_on(future)
}

/// Reads a body stream into memory, failing once it exceeds `max_bytes`.
pub(crate) async fn read_limited<R>(
    mut reader: R,
    key: &str,
    max_bytes: usize,
) -> Result<Vec<u8>, BackendError>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = Vec::new();
    let mut total_bytes = 0usize;
    let mut chunk = [0u8; 8192];
    loop {
        let read = reader.read(&mut chunk).await.map_err(|err| BackendError::Io(err.to_string()))?;
        if read == 0 {
            break;
        }
        total_bytes = total_bytes
            .checked_add(read)
            .ok_or_else(|| BackendError::Io("object size overflow".to_string()))?;
        if total_bytes > max_bytes {
            return Err(BackendError::TooLarge {
                key: key.to_string(),
                max_bytes,
                actual_bytes: total_bytes,
            });
        }
        buffer.extend_from_slice(&chunk[.. read]);
    }
    Ok(buffer)
}

// ============================================================================
// SECTION: Shared Runtime
// ============================================================================

/// Runtime handle shared by every client of a session.
#[derive(Clone)]
pub(crate) struct SharedRuntime {
    /// Tokio runtime for blocking SDK operations.
    runtime: Option<Arc<Runtime>>,
}

impl SharedRuntime {
    /// Starts a new multi-threaded runtime.
    pub(crate) fn new() -> Result<Self, BackendError> {
        let runtime = Runtime::new().map_err(|err| BackendError::Io(err.to_string()))?;
        Ok(Self {
            runtime: Some(Arc::new(runtime)),
        })
    }

    /// Blocks on a future.
    pub(crate) fn block_on<F, T>(&self, future: F) -> Result<T, BackendError>
    where
        F: Future<Output = Result<T, BackendError>> + Send + 'static,
        T: Send + 'static,
    {
        let runtime = self
            .runtime
            .as_ref()
            .ok_or_else(|| BackendError::Io("backend runtime closed".to_string()))?;
        block_on_with_runtime(runtime, future)
    }
}

impl Drop for SharedRuntime {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            let _ = std::thread::spawn(move || drop(runtime));
        }
    }
}
