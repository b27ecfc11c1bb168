// crates/metrics-discovery-core/src/audit.rs
// ============================================================================
// Module: Discovery Audit Logging
// Description: Structured audit events for document and category handling.
// Purpose: Emit JSON-line logs without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Discovery reports what it loaded, merged, skipped, and saved as JSON-line
//! audit events. Sinks are pluggable so deployments can route events to
//! stderr, an append-only file, or nowhere.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::error::DiscoveryError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Audit event severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditLevel {
    /// Normal progress.
    Info,
    /// Recoverable condition.
    Warn,
    /// Failure that changed the run outcome.
    Error,
}

/// Discovery audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Event severity.
    pub level: AuditLevel,
    /// Document key the event concerns, when any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Normalized error kind label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    /// Human-readable detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Count attached to the event (values appended, keys saved).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl DiscoveryAuditEvent {
    /// Creates an event with a consistent timestamp.
    #[must_use]
    pub fn new(event: &'static str, level: AuditLevel) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event,
            timestamp_ms,
            level,
            key: None,
            error_kind: None,
            message: None,
            count: None,
        }
    }

    /// Attaches a document key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Attaches an error kind and message.
    #[must_use]
    pub fn with_error(mut self, error: &DiscoveryError) -> Self {
        self.error_kind = Some(error.kind());
        self.message = Some(error.to_string());
        self
    }

    /// Attaches a message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches a count.
    #[must_use]
    pub const fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for discovery events.
pub trait DiscoveryAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &DiscoveryAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl DiscoveryAuditSink for StderrAuditSink {
    fn record(&self, event: &DiscoveryAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl DiscoveryAuditSink for FileAuditSink {
    fn record(&self, event: &DiscoveryAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl DiscoveryAuditSink for NoopAuditSink {
    fn record(&self, _event: &DiscoveryAuditEvent) {}
}

/// Audit sink that keeps events in memory for inspection.
#[derive(Default)]
pub struct MemoryAuditSink {
    /// Recorded events in order.
    events: Mutex<Vec<DiscoveryAuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<DiscoveryAuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Returns the names of the recorded events.
    #[must_use]
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events().iter().map(|event| event.event).collect()
    }
}

impl DiscoveryAuditSink for MemoryAuditSink {
    fn record(&self, event: &DiscoveryAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
