// crates/metrics-discovery-core/src/runtime/store.rs
// ============================================================================
// Module: Document Store Adapter
// Description: Load and save the configuration document in object storage.
// Purpose: Persist the document as one blob with recoverable load failures.
// Dependencies: crate::{audit, core, interfaces}
// ============================================================================

//! ## Overview
//! The document lives in a single blob addressed by a container (bucket) and
//! an object key. A load distinguishes three states: a stored document
//! ([`LoadedDocument::Found`]), no object yet ([`LoadedDocument::Missing`],
//! the first run), and a blob that could not be read or parsed
//! ([`LoadedDocument::Unavailable`]). Saves overwrite the whole blob, so only
//! the first two states may be written back.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::audit::AuditLevel;
use crate::audit::DiscoveryAuditEvent;
use crate::audit::DiscoveryAuditSink;
use crate::core::document::ConfigDocument;
use crate::core::error::DiscoveryError;
use crate::interfaces::BackendError;
use crate::interfaces::Gateway;
use crate::interfaces::ObjectStorage;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default maximum document size in bytes.
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 1024 * 1024;
/// Content type written with the document.
const DOCUMENT_CONTENT_TYPE: &str = "application/json";

// ============================================================================
// SECTION: Location
// ============================================================================

/// Blob location of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLocation {
    /// Container (bucket) name.
    pub container: String,
    /// Object key.
    pub key: String,
}

impl DocumentLocation {
    /// Creates a location.
    #[must_use]
    pub fn new(container: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            key: key.into(),
        }
    }
}

// ============================================================================
// SECTION: Load Outcome
// ============================================================================

/// Outcome of a document load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadedDocument {
    /// The stored document was read and parsed.
    Found(ConfigDocument),
    /// No object exists at the location yet.
    Missing,
    /// The object exists or may exist but could not be used.
    Unavailable {
        /// Cause (`MalformedDocument` or `StorageUnavailable`).
        error: DiscoveryError,
    },
}

impl LoadedDocument {
    /// Returns true when a stored document was read.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns true when the stored state is known and may be overwritten.
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        matches!(self, Self::Found(_) | Self::Missing)
    }

    /// Returns the cause when the stored state could not be read.
    #[must_use]
    pub const fn error(&self) -> Option<&DiscoveryError> {
        match self {
            Self::Found(_) | Self::Missing => None,
            Self::Unavailable {
                error,
            } => Some(error),
        }
    }

    /// Returns the document to merge into before a save.
    ///
    /// A missing object yields an empty document.
    ///
    /// # Errors
    ///
    /// Returns the load cause when the stored blob could not be used;
    /// writing over it would discard recorded entries.
    pub fn into_current(self) -> Result<ConfigDocument, DiscoveryError> {
        match self {
            Self::Found(document) => Ok(document),
            Self::Missing => Ok(ConfigDocument::new()),
            Self::Unavailable {
                error,
            } => Err(error),
        }
    }

    /// Returns the loaded document, or an empty one otherwise.
    ///
    /// Suited to read-only use; pass the result to a save only when
    /// [`Self::is_writable`] holds.
    #[must_use]
    pub fn into_document(self) -> ConfigDocument {
        match self {
            Self::Found(document) => document,
            Self::Missing
            | Self::Unavailable {
                ..
            } => ConfigDocument::new(),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Document store over the gateway's object storage capability.
pub struct DocumentStore {
    /// Object storage handle, when the gateway had one bound.
    storage: Option<Arc<dyn ObjectStorage>>,
    /// Document location.
    location: DocumentLocation,
    /// Maximum document size in bytes.
    max_bytes: usize,
    /// Audit sink for load and save events.
    audit: Arc<dyn DiscoveryAuditSink>,
}

impl DocumentStore {
    /// Creates a store for a location using the gateway's object storage.
    ///
    /// Construction never fails; an unusable store reports
    /// [`DiscoveryError::NotInitialized`] from [`Self::load`] and
    /// [`Self::save`], and [`Self::ensure_ready`] checks it up front.
    #[must_use]
    pub fn new(
        gateway: &Gateway,
        location: DocumentLocation,
        audit: Arc<dyn DiscoveryAuditSink>,
    ) -> Self {
        Self {
            storage: gateway.object_storage().ok(),
            location,
            max_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            audit,
        }
    }

    /// Creates a store and fails when it cannot perform I/O.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::NotInitialized`] when the location is empty
    /// or no object storage is bound.
    pub fn try_new(
        gateway: &Gateway,
        location: DocumentLocation,
        audit: Arc<dyn DiscoveryAuditSink>,
    ) -> Result<Self, DiscoveryError> {
        let store = Self::new(gateway, location, audit);
        store.ensure_ready()?;
        Ok(store)
    }

    /// Overrides the maximum document size.
    #[must_use]
    pub const fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Returns the document location.
    #[must_use]
    pub const fn location(&self) -> &DocumentLocation {
        &self.location
    }

    /// Checks that the store can perform I/O.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::NotInitialized`] when the location is empty
    /// or no object storage is bound.
    pub fn ensure_ready(&self) -> Result<(), DiscoveryError> {
        self.storage().map(|_| ())
    }

    /// Loads the document.
    ///
    /// A missing object is [`LoadedDocument::Missing`]. Storage and decoding
    /// failures are logged and returned as [`LoadedDocument::Unavailable`].
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::NotInitialized`] before any I/O when the
    /// store is unusable.
    pub fn load(&self) -> Result<LoadedDocument, DiscoveryError> {
        let storage = self.storage()?;
        let bytes = match storage.get_object(
            &self.location.container,
            &self.location.key,
            self.max_bytes,
        ) {
            Ok(bytes) => bytes,
            Err(BackendError::NotFound(_)) => {
                self.audit.record(
                    &DiscoveryAuditEvent::new("document_missing", AuditLevel::Info)
                        .with_key(self.location.key.clone()),
                );
                return Ok(LoadedDocument::Missing);
            }
            Err(err) => return Ok(self.unavailable(load_error(&err))),
        };
        match ConfigDocument::from_json_slice(&bytes) {
            Ok(document) => {
                self.audit.record(
                    &DiscoveryAuditEvent::new("document_loaded", AuditLevel::Info)
                        .with_key(self.location.key.clone())
                        .with_count(document.len()),
                );
                Ok(LoadedDocument::Found(document))
            }
            Err(error) => Ok(self.unavailable(error)),
        }
    }

    /// Saves the document, replacing the stored blob.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::NotInitialized`] when the store is unusable,
    /// [`DiscoveryError::MalformedDocument`] when encoding fails, and
    /// [`DiscoveryError::StorageUnavailable`] when the write fails.
    pub fn save(&self, document: &ConfigDocument) -> Result<(), DiscoveryError> {
        let storage = self.storage()?;
        let result = document.to_json_vec().and_then(|bytes| {
            storage
                .put_object(
                    &self.location.container,
                    &self.location.key,
                    bytes,
                    Some(DOCUMENT_CONTENT_TYPE),
                )
                .map_err(|err| DiscoveryError::StorageUnavailable(err.to_string()))
        });
        match &result {
            Ok(()) => self.audit.record(
                &DiscoveryAuditEvent::new("document_saved", AuditLevel::Info)
                    .with_key(self.location.key.clone())
                    .with_count(document.len()),
            ),
            Err(error) => self.audit.record(
                &DiscoveryAuditEvent::new("document_save_failed", AuditLevel::Error)
                    .with_key(self.location.key.clone())
                    .with_error(error),
            ),
        }
        result
    }

    /// Logs an unusable blob and wraps the cause.
    fn unavailable(&self, error: DiscoveryError) -> LoadedDocument {
        self.audit.record(
            &DiscoveryAuditEvent::new("document_unavailable", AuditLevel::Warn)
                .with_key(self.location.key.clone())
                .with_error(&error),
        );
        LoadedDocument::Unavailable {
            error,
        }
    }

    /// Returns the storage handle after validating the location.
    fn storage(&self) -> Result<&Arc<dyn ObjectStorage>, DiscoveryError> {
        if self.location.container.trim().is_empty() || self.location.key.trim().is_empty() {
            return Err(DiscoveryError::NotInitialized(
                "container name and object key must be non-empty".to_string(),
            ));
        }
        self.storage.as_ref().ok_or_else(|| {
            DiscoveryError::NotInitialized("object storage capability is not bound".to_string())
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Classifies a backend read failure.
fn load_error(error: &BackendError) -> DiscoveryError {
    match error {
        BackendError::TooLarge {
            ..
        } => DiscoveryError::MalformedDocument(error.to_string()),
        BackendError::NotFound(_) | BackendError::Backend(_) | BackendError::Io(_) => {
            DiscoveryError::StorageUnavailable(error.to_string())
        }
    }
}
