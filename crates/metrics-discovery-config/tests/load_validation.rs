// crates/metrics-discovery-config/tests/load_validation.rs
// ============================================================================
// Module: Config Load Validation Tests
// Description: Tests for file loading, defaults, and fail-closed validation.
// Purpose: Ensure invalid configuration never reaches the discovery runtime.
// ============================================================================

//! Load and validation tests for metrics-discovery-config.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::fs;

use metrics_discovery_config::ConfigError;
use metrics_discovery_config::DiscoveryConfig;
use metrics_discovery_config::LogSinkKind;
use metrics_discovery_config::config_toml_example;

type TestResult = Result<(), String>;

/// Assert that a parse result is an invalid-config error containing `needle`.
fn assert_invalid(toml: &str, needle: &str) -> TestResult {
    match DiscoveryConfig::from_toml_bytes(toml.as_bytes()) {
        Err(ConfigError::Invalid(message)) if message.contains(needle) => Ok(()),
        Err(error) => Err(format!("error '{error}' did not contain '{needle}'")),
        Ok(_) => Err(format!("expected invalid config containing '{needle}'")),
    }
}

#[test]
fn empty_file_yields_defaults() {
    let config = DiscoveryConfig::from_toml_bytes(b"").unwrap();
    assert_eq!(config.aws.region, "us-east-1");
    assert!(config.aws.profile.is_none());
    assert_eq!(config.storage.max_document_bytes, 1024 * 1024);
    assert_eq!(config.log.sink, LogSinkKind::Stderr);
}

#[test]
fn example_parses_and_matches_defaults() {
    let config = DiscoveryConfig::from_toml_bytes(config_toml_example().as_bytes()).unwrap();
    let defaults = DiscoveryConfig::default();
    assert_eq!(config.aws.region, defaults.aws.region);
    assert_eq!(config.storage.bucket_template, defaults.storage.bucket_template);
    assert_eq!(config.storage.key_template, defaults.storage.key_template);
    assert_eq!(config.storage.max_document_bytes, defaults.storage.max_document_bytes);
}

#[test]
fn load_reads_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("discovery.toml");
    let log_path = dir.path().join("audit.log");
    fs::write(
        &path,
        format!(
            "[aws]\nprofile = \"ops\"\nregion = \"us-west-2\"\n\n[storage]\nbucket_template = \
             \"metrics-{{stack}}\"\nkey_template = \"{{stack}}.json\"\n\n[log]\nsink = \
             \"file\"\npath = {:?}\n",
            log_path.display().to_string()
        ),
    )
    .unwrap();
    let config = DiscoveryConfig::load(Some(&path)).unwrap();
    assert_eq!(config.aws.profile.as_deref(), Some("ops"));
    assert_eq!(config.log.sink, LogSinkKind::File);
    let location = config.location_for("dev").unwrap();
    assert_eq!(location.container, "metrics-dev");
    assert_eq!(location.key, "dev.json");
}

#[test]
fn missing_explicit_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = DiscoveryConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn unknown_fields_are_rejected() {
    let err = DiscoveryConfig::from_toml_bytes(b"[aws]\nregoin = \"us-east-1\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn non_utf8_is_rejected() {
    let err = DiscoveryConfig::from_toml_bytes(&[0xff, 0xfe]).unwrap_err();
    assert!(err.to_string().contains("utf-8"));
}

#[test]
fn oversized_file_is_rejected() {
    let bytes = vec![b'#'; 1024 * 1024 + 1];
    let err = DiscoveryConfig::from_toml_bytes(&bytes).unwrap_err();
    assert!(err.to_string().contains("size limit"));
}

#[test]
fn templates_require_stack_placeholder() -> TestResult {
    assert_invalid("[storage]\nbucket_template = \"fixed-bucket\"\n", "storage.bucket_template")?;
    assert_invalid("[storage]\nkey_template = \"config.json\"\n", "storage.key_template")
}

#[test]
fn document_limit_is_bounded() -> TestResult {
    assert_invalid("[storage]\nmax_document_bytes = 0\n", "max_document_bytes")?;
    assert_invalid("[storage]\nmax_document_bytes = 16777217\n", "max_document_bytes")
}

#[test]
fn endpoint_requires_scheme_and_http_opt_in() -> TestResult {
    assert_invalid("[aws]\nendpoint = \"localhost:4566\"\n", "http:// or https://")?;
    assert_invalid("[aws]\nendpoint = \"http://localhost:4566\"\n", "allow_http")?;
    DiscoveryConfig::from_toml_bytes(
        b"[aws]\nendpoint = \"http://localhost:4566\"\nallow_http = true\n",
    )
    .map(|_| ())
    .map_err(|err| err.to_string())
}

#[test]
fn file_sink_requires_path() -> TestResult {
    assert_invalid("[log]\nsink = \"file\"\n", "log.path is required")?;
    assert_invalid("[log]\nsink = \"none\"\npath = \"x.log\"\n", "only valid for the file sink")
}

#[test]
fn location_rejects_unsafe_stack_names() {
    let config = DiscoveryConfig::default();
    assert!(config.location_for("../etc").is_err());
    assert!(config.location_for("").is_err());
}

#[test]
fn overrides_replace_session_settings() {
    let config = DiscoveryConfig::default()
        .with_overrides(Some("ops".to_string()), Some("eu-west-1".to_string()));
    assert_eq!(config.aws.profile.as_deref(), Some("ops"));
    assert_eq!(config.aws.region, "eu-west-1");
    let unchanged = DiscoveryConfig::default().with_overrides(None, None);
    assert_eq!(unchanged.aws.region, "us-east-1");
}
