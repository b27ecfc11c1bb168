// crates/metrics-discovery-core/src/core/document.rs
// ============================================================================
// Module: Configuration Document
// Description: Ordered key to identifier-list mapping with append-only merge.
// Purpose: Record every identifier seen per version and category.
// Dependencies: indexmap, serde, serde_json
// ============================================================================

//! ## Overview
//! The configuration document maps `"{version}-{category}"` keys to ordered
//! lists of unique identifiers. Merges only append: values already present
//! keep their position and new values follow in discovery order, so the
//! document is a cache of every resource seen at least once. Key order is
//! insertion order and survives a load/save round trip.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::core::error::DiscoveryError;
use crate::core::naming::Category;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Indentation used when serializing the document.
const DOCUMENT_INDENT: &[u8] = b"    ";

// ============================================================================
// SECTION: Document
// ============================================================================

/// Persisted discovery document.
///
/// # Invariants
/// - Values under a key are unique and keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    /// Entries in insertion order.
    entries: IndexMap<String, Vec<String>>,
}

/// Result of a single merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    /// Whether the key was absent before the merge.
    pub created: bool,
    /// Number of values appended.
    pub appended: usize,
    /// Number of values under the key after the merge.
    pub total: usize,
}

impl MergeOutcome {
    /// Returns true when the merge left the document unchanged.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        !self.created && self.appended == 0
    }
}

impl ConfigDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a UTF-8 JSON document.
    ///
    /// Duplicate values under a key are collapsed to their first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::MalformedDocument`] when the bytes are not
    /// UTF-8 or not a JSON object of string lists.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, DiscoveryError> {
        let text = std::str::from_utf8(bytes).map_err(|err| {
            DiscoveryError::MalformedDocument(format!("document is not utf-8: {err}"))
        })?;
        let raw: IndexMap<String, Vec<String>> = serde_json::from_str(text)
            .map_err(|err| DiscoveryError::MalformedDocument(format!("invalid json: {err}")))?;
        let mut document = Self::new();
        for (key, values) in raw {
            document.merge_entry(&key, values);
        }
        Ok(document)
    }

    /// Encodes the document as indented JSON, keys in document order.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::MalformedDocument`] when serialization fails.
    pub fn to_json_vec(&self) -> Result<Vec<u8>, DiscoveryError> {
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(DOCUMENT_INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)
            .map_err(|err| DiscoveryError::MalformedDocument(err.to_string()))?;
        Ok(buffer)
    }

    /// Merges values into a key without dropping or reordering existing ones.
    ///
    /// An absent key is inserted with `values` in order. A present key gets
    /// each value not already recorded appended at the end, in order.
    pub fn merge_entry<I, S>(&mut self, key: &str, values: I) -> MergeOutcome
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let created = !self.entries.contains_key(key);
        let existing = self.entries.entry(key.to_string()).or_default();
        let before = existing.len();
        let mut seen: HashSet<String> = existing.iter().cloned().collect();
        for value in values {
            let value = value.into();
            if !seen.contains(&value) {
                seen.insert(value.clone());
                existing.push(value);
            }
        }
        MergeOutcome {
            created,
            appended: existing.len() - before,
            total: existing.len(),
        }
    }

    /// Returns the values of a key, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Returns the values of a key, empty when the key is absent.
    #[must_use]
    pub fn values(&self, key: &str) -> &[String] {
        self.get(key).unwrap_or_default()
    }

    /// Returns true when the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the document has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a read-only consumer view.
    #[must_use]
    pub const fn view(&self) -> DocumentView<'_> {
        DocumentView {
            document: self,
        }
    }
}

// ============================================================================
// SECTION: Consumer View
// ============================================================================

/// Read-only view used by dashboard assembly.
///
/// # Invariants
/// - Missing keys read as empty lists; lookups never fail.
#[derive(Debug, Clone, Copy)]
pub struct DocumentView<'a> {
    /// Underlying document.
    document: &'a ConfigDocument,
}

impl<'a> DocumentView<'a> {
    /// Returns the values recorded for a version and category.
    #[must_use]
    pub fn values(&self, version: &str, category: Category) -> &'a [String] {
        self.document.values(&category.key(version))
    }

    /// Concatenates a category's values across versions, in version order.
    #[must_use]
    pub fn across<S: AsRef<str>>(&self, versions: &[S], category: Category) -> Vec<&'a str> {
        versions
            .iter()
            .flat_map(|version| self.values(version.as_ref(), category))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests;
