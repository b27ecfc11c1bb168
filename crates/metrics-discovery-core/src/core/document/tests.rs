// crates/metrics-discovery-core/src/core/document/tests.rs
// ============================================================================
// Module: Configuration Document Tests
// Description: Unit and property tests for the append-only merge.
// Purpose: Guarantee merges never drop, duplicate, or reorder identifiers.
// Dependencies: metrics-discovery-core, proptest
// ============================================================================

//! ## Overview
//! Covers merge scenarios, idempotence, monotonicity, order preservation, and
//! the JSON wire format.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use proptest::prelude::*;

use super::*;
use crate::core::naming::Environment;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

// ============================================================================
// SECTION: Merge Scenarios
// ============================================================================

#[test]
fn merge_into_empty_document_inserts_values() {
    let mut document = ConfigDocument::new();
    let outcome = document.merge_entry("v1-repo-ec2-instances", ["i-1", "i-2"]);
    assert!(outcome.created);
    assert_eq!(outcome.appended, 2);
    assert_eq!(document.values("v1-repo-ec2-instances"), strings(&["i-1", "i-2"]).as_slice());
}

#[test]
fn merge_appends_only_new_values() {
    let mut document = ConfigDocument::new();
    document.merge_entry("v1-repo-ec2-instances", ["i-1", "i-2"]);
    let outcome = document.merge_entry("v1-repo-ec2-instances", ["i-2", "i-3"]);
    assert!(!outcome.created);
    assert_eq!(outcome.appended, 1);
    assert_eq!(outcome.total, 3);
    assert_eq!(
        document.values("v1-repo-ec2-instances"),
        strings(&["i-1", "i-2", "i-3"]).as_slice()
    );
}

#[test]
fn merge_keeps_stale_values() {
    let mut document = ConfigDocument::new();
    document.merge_entry("v1-workers-names", ["w-old"]);
    document.merge_entry("v1-workers-names", ["w-new"]);
    assert_eq!(document.values("v1-workers-names"), strings(&["w-old", "w-new"]).as_slice());
}

#[test]
fn merge_with_no_values_creates_empty_key() {
    let mut document = ConfigDocument::new();
    let outcome = document.merge_entry("v1-portal-ec2-instances", Vec::<String>::new());
    assert!(outcome.created);
    assert!(document.contains_key("v1-portal-ec2-instances"));
    assert!(document.values("v1-portal-ec2-instances").is_empty());
}

#[test]
fn repeated_merge_is_noop() {
    let mut document = ConfigDocument::new();
    document.merge_entry("k", ["a", "b"]);
    let outcome = document.merge_entry("k", ["b", "a"]);
    assert!(outcome.is_noop());
}

#[test]
fn missing_keys_read_as_empty() {
    let document = ConfigDocument::new();
    assert!(document.get("v9-repo-vmids").is_none());
    assert!(document.values("v9-repo-vmids").is_empty());
}

// ============================================================================
// SECTION: Wire Format
// ============================================================================

#[test]
fn json_uses_four_space_indent_and_document_order() {
    let mut document = ConfigDocument::new();
    document.merge_entry("v2-repo-alb-name", ["app/alb/1"]);
    document.merge_entry("v1-repo-alb-name", ["app/alb/0"]);
    let text = String::from_utf8(document.to_json_vec().unwrap()).unwrap();
    assert_eq!(
        text,
        "{\n    \"v2-repo-alb-name\": [\n        \"app/alb/1\"\n    ],\n    \
         \"v1-repo-alb-name\": [\n        \"app/alb/0\"\n    ]\n}"
    );
}

#[test]
fn json_round_trip_keeps_key_order() {
    let bytes = br#"{"b": ["2"], "a": ["1", "1", "0"]}"#;
    let document = ConfigDocument::from_json_slice(bytes).unwrap();
    let keys: Vec<_> = document.keys().collect();
    assert_eq!(keys, ["b", "a"]);
    assert_eq!(document.values("a"), strings(&["1", "0"]).as_slice());
    let reparsed = ConfigDocument::from_json_slice(&document.to_json_vec().unwrap()).unwrap();
    assert_eq!(reparsed, document);
}

#[test]
fn decode_rejects_non_utf8_and_wrong_shape() {
    let err = ConfigDocument::from_json_slice(&[0xff, 0xfe]).unwrap_err();
    assert!(matches!(err, DiscoveryError::MalformedDocument(_)));
    let err = ConfigDocument::from_json_slice(br#"{"k": "not-a-list"}"#).unwrap_err();
    assert!(matches!(err, DiscoveryError::MalformedDocument(_)));
    let err = ConfigDocument::from_json_slice(b"[1, 2]").unwrap_err();
    assert!(matches!(err, DiscoveryError::MalformedDocument(_)));
}

// ============================================================================
// SECTION: Consumer View
// ============================================================================

#[test]
fn view_concatenates_across_versions() {
    let mut document = ConfigDocument::new();
    document.merge_entry("v1-repo-ec2-instances", ["i-1"]);
    document.merge_entry("v2-repo-ec2-instances", ["i-2", "i-3"]);
    let view = document.view();
    let category = Category::Ec2Instances(Environment::Repo);
    assert_eq!(view.across(&["v1", "v2", "v3"], category), ["i-1", "i-2", "i-3"]);
    assert!(view.values("v3", category).is_empty());
}

// ============================================================================
// SECTION: Properties
// ============================================================================

fn identifier_lists() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
    let ids = prop::collection::vec("i-[0-9]{1,2}", 0..12);
    (ids.clone(), ids)
}

proptest! {
    #[test]
    fn merge_is_idempotent((existing, fresh) in identifier_lists()) {
        let mut document = ConfigDocument::new();
        document.merge_entry("k", existing);
        document.merge_entry("k", fresh.clone());
        let once = document.clone();
        document.merge_entry("k", fresh);
        prop_assert_eq!(document, once);
    }

    #[test]
    fn merge_is_monotonic((existing, fresh) in identifier_lists()) {
        let mut document = ConfigDocument::new();
        document.merge_entry("k", existing);
        let before = document.values("k").len();
        document.merge_entry("k", fresh);
        prop_assert!(document.values("k").len() >= before);
    }

    #[test]
    fn merge_preserves_existing_order((existing, fresh) in identifier_lists()) {
        let mut document = ConfigDocument::new();
        document.merge_entry("k", existing);
        let before = document.values("k").to_vec();
        document.merge_entry("k", fresh.clone());
        let after = document.values("k");
        prop_assert_eq!(&after[.. before.len()], before.as_slice());
        let mut expected_tail: Vec<String> = Vec::new();
        for value in fresh {
            if !before.contains(&value) && !expected_tail.contains(&value) {
                expected_tail.push(value);
            }
        }
        prop_assert_eq!(&after[before.len() ..], expected_tail.as_slice());
    }

    #[test]
    fn merged_values_stay_unique((existing, fresh) in identifier_lists()) {
        let mut document = ConfigDocument::new();
        document.merge_entry("k", existing);
        document.merge_entry("k", fresh);
        let values = document.values("k");
        let unique: HashSet<&String> = values.iter().collect();
        prop_assert_eq!(unique.len(), values.len());
    }
}
