// crates/metrics-discovery-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and `config example`.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for metrics discovery configuration. The output spells
//! out every default and parses to the same values as an empty file.

/// Returns a canonical example `metrics-discovery.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[aws]
region = "us-east-1"
# profile = "sandbox"
# endpoint = "https://s3.example.com"
# force_path_style = false
# allow_http = false

[storage]
bucket_template = "{stack}.cloudwatch.metrics.sagebase.org"
key_template = "{stack}_cw_configuration.json"
max_document_bytes = 1048576

[log]
sink = "stderr"
# sink = "file"
# path = "metrics-discovery.log"
"#,
    )
}
