// crates/metrics-discovery-config/src/config.rs
// ============================================================================
// Module: Metrics Discovery Configuration
// Description: Configuration loading and validation for metrics discovery.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: metrics-discovery-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The file is optional: when no path is given, the environment variable is
//! unset, and the default file is absent, built-in defaults apply. An explicit
//! path that cannot be read is an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use metrics_discovery_core::DEFAULT_MAX_DOCUMENT_BYTES;
use metrics_discovery_core::DocumentLocation;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "metrics-discovery.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "METRICS_DISCOVERY_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Upper bound for `storage.max_document_bytes`.
pub(crate) const MAX_DOCUMENT_BYTES_LIMIT: usize = 16 * 1024 * 1024;
/// Placeholder substituted with the stack name in storage templates.
pub const STACK_PLACEHOLDER: &str = "{stack}";
/// Default AWS region.
pub const DEFAULT_REGION: &str = "us-east-1";
/// Default bucket name template.
pub const DEFAULT_BUCKET_TEMPLATE: &str = "{stack}.cloudwatch.metrics.sagebase.org";
/// Default object key template.
pub const DEFAULT_KEY_TEMPLATE: &str = "{stack}_cw_configuration.json";

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Metrics discovery configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Cloud session configuration.
    #[serde(default)]
    pub aws: AwsConfig,
    /// Document location configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Audit log configuration.
    #[serde(default)]
    pub log: LogConfig,
}

impl DiscoveryConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, required) = resolve_path(path)?;
        validate_path(&resolved)?;
        if !required && !resolved.exists() {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        Self::from_toml_bytes(&bytes)
    }

    /// Parses and validates configuration from TOML bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the bytes are oversized, not UTF-8, not
    /// valid TOML, or fail validation.
    pub fn from_toml_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.aws.validate()?;
        self.storage.validate()?;
        self.log.validate()?;
        Ok(())
    }

    /// Applies command-line session overrides.
    #[must_use]
    pub fn with_overrides(mut self, profile: Option<String>, region: Option<String>) -> Self {
        if let Some(profile) = profile {
            self.aws.profile = Some(profile);
        }
        if let Some(region) = region {
            self.aws.region = region;
        }
        self
    }

    /// Returns the document location for a stack.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the stack name is empty or
    /// contains characters not allowed in bucket names.
    pub fn location_for(&self, stack: &str) -> Result<DocumentLocation, ConfigError> {
        validate_stack_name(stack)?;
        Ok(DocumentLocation::new(
            self.storage.bucket_template.replace(STACK_PLACEHOLDER, stack),
            self.storage.key_template.replace(STACK_PLACEHOLDER, stack),
        ))
    }
}

/// Cloud session configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AwsConfig {
    /// Named credentials profile; the default chain when unset.
    #[serde(default)]
    pub profile: Option<String>,
    /// Region for every service client.
    #[serde(default = "default_region")]
    pub region: String,
    /// Optional endpoint override (S3-compatible and local emulators).
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Force path-style bucket addressing.
    #[serde(default)]
    pub force_path_style: bool,
    /// Allow non-TLS endpoints (explicit opt-in).
    #[serde(default)]
    pub allow_http: bool,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            profile: None,
            region: default_region(),
            endpoint: None,
            force_path_style: false,
            allow_http: false,
        }
    }
}

impl AwsConfig {
    /// Validates session configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.region.trim().is_empty() {
            return Err(ConfigError::Invalid("aws.region must be non-empty".to_string()));
        }
        if let Some(profile) = &self.profile
            && profile.trim().is_empty()
        {
            return Err(ConfigError::Invalid("aws.profile must be non-empty when set".to_string()));
        }
        if let Some(endpoint) = &self.endpoint {
            let trimmed = endpoint.trim();
            if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
                return Err(ConfigError::Invalid(
                    "aws.endpoint must include http:// or https://".to_string(),
                ));
            }
            if trimmed.starts_with("http://") && !self.allow_http {
                return Err(ConfigError::Invalid(
                    "aws.endpoint uses http:// without allow_http".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Document location configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Bucket name template; `{stack}` is replaced by the stack name.
    #[serde(default = "default_bucket_template")]
    pub bucket_template: String,
    /// Object key template; `{stack}` is replaced by the stack name.
    #[serde(default = "default_key_template")]
    pub key_template: String,
    /// Maximum document size accepted on load.
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket_template: default_bucket_template(),
            key_template: default_key_template(),
            max_document_bytes: default_max_document_bytes(),
        }
    }
}

impl StorageConfig {
    /// Validates storage configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, template) in [
            ("storage.bucket_template", &self.bucket_template),
            ("storage.key_template", &self.key_template),
        ] {
            if !template.contains(STACK_PLACEHOLDER) {
                return Err(ConfigError::Invalid(format!(
                    "{field} must contain {STACK_PLACEHOLDER}"
                )));
            }
            if template.chars().any(char::is_whitespace) {
                return Err(ConfigError::Invalid(format!("{field} must not contain whitespace")));
            }
        }
        if self.max_document_bytes == 0 || self.max_document_bytes > MAX_DOCUMENT_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "storage.max_document_bytes must be between 1 and {MAX_DOCUMENT_BYTES_LIMIT}"
            )));
        }
        Ok(())
    }
}

/// Audit log sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Discard events.
    None,
}

/// Audit log configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Sink receiving audit events.
    #[serde(default)]
    pub sink: LogSinkKind,
    /// Log file path, required for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl LogConfig {
    /// Validates log configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (&self.sink, &self.path) {
            (LogSinkKind::File, None) => {
                Err(ConfigError::Invalid("log.path is required for the file sink".to_string()))
            }
            (LogSinkKind::File, Some(path)) => validate_path_string("log.path", path),
            (LogSinkKind::Stderr | LogSinkKind::None, Some(_)) => Err(ConfigError::Invalid(
                "log.path is only valid for the file sink".to_string(),
            )),
            (LogSinkKind::Stderr | LogSinkKind::None, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path and whether it must exist.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a configured path against length constraints.
fn validate_path_string(field: &str, path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a stack name for use in bucket names and object keys.
fn validate_stack_name(stack: &str) -> Result<(), ConfigError> {
    if stack.is_empty() {
        return Err(ConfigError::Invalid("stack name must be non-empty".to_string()));
    }
    if !stack.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '.') {
        return Err(ConfigError::Invalid(format!(
            "stack name {stack:?} may only contain letters, digits, '-' and '.'"
        )));
    }
    Ok(())
}

/// Default AWS region.
fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

/// Default bucket template.
fn default_bucket_template() -> String {
    DEFAULT_BUCKET_TEMPLATE.to_string()
}

/// Default object key template.
fn default_key_template() -> String {
    DEFAULT_KEY_TEMPLATE.to_string()
}

/// Default maximum document size.
const fn default_max_document_bytes() -> usize {
    DEFAULT_MAX_DOCUMENT_BYTES
}

// ============================================================================
// SECTION: Tests
// ============================================================================
