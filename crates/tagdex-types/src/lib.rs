//! # tagdex-types
//!
//! **Tier 0 (Core Types)**
//!
//! This crate defines the core data structures and contracts for `tagdex`.
//! It contains only data types, Serde definitions, and `schema_version`.
//!
//! ## What belongs here
//! * Pure data structs (descriptors, the tag index, receipts)
//! * Serialization/Deserialization logic
//! * Stability markers (SCHEMA_VERSION)
//!
//! ## What does NOT belong here
//! * File I/O
//! * CLI argument parsing
//! * Toolchain invocation

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// The current schema version for the JSON receipt.
pub const SCHEMA_VERSION: u32 = 1;

/// Identifies the tool that produced a receipt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

impl ToolInfo {
    pub fn current() -> Self {
        Self {
            name: "tagdex".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// The result of importing one package: its import path and every
/// conditional-compilation tag discovered in its source files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageDescriptor {
    pub import_path: String,
    pub tags: BTreeSet<String>,
}

impl PackageDescriptor {
    pub fn new(import_path: impl Into<String>, tags: BTreeSet<String>) -> Self {
        Self {
            import_path: import_path.into(),
            tags,
        }
    }
}

/// A single failed package import. Recoverable: the path simply contributes
/// nothing to the index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportFailure {
    pub path: String,
    pub message: String,
}

/// Mapping from tag to the packages that reference it.
///
/// Built incrementally by the aggregator and frozen with [`TagIndex::finish`]
/// once the descriptor stream ends. After `finish`, every bucket is sorted and
/// duplicate-free, and the tag keys iterate in lexicographic order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagIndex {
    buckets: BTreeMap<String, Vec<String>>,
}

impl TagIndex {
    /// Fold one descriptor into the index. Arrival order does not matter.
    pub fn add(&mut self, descriptor: &PackageDescriptor) {
        for tag in &descriptor.tags {
            self.buckets
                .entry(tag.clone())
                .or_default()
                .push(descriptor.import_path.clone());
        }
    }

    /// Sort and de-duplicate every bucket. Call exactly once, after the last
    /// descriptor has been added.
    pub fn finish(&mut self) {
        for paths in self.buckets.values_mut() {
            paths.sort();
            paths.dedup();
        }
    }

    /// All known tags, in lexicographic order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// The packages referencing `tag`, if any.
    pub fn packages(&self, tag: &str) -> Option<&[String]> {
        self.buckets.get(tag).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.buckets
            .iter()
            .map(|(tag, paths)| (tag.as_str(), paths.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Flatten into receipt buckets.
    pub fn to_buckets(&self) -> Vec<TagBucket> {
        self.buckets
            .iter()
            .map(|(tag, paths)| TagBucket {
                tag: tag.clone(),
                packages: paths.clone(),
            })
            .collect()
    }
}

/// One tag entry in a JSON receipt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagBucket {
    pub tag: String,
    pub packages: Vec<String>,
}

/// The four-way tag partition produced in classify mode.
///
/// Categories are disjoint and exhaustive over the discovered tag set;
/// each list is sorted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagCategories {
    pub os: Vec<String>,
    pub arch: Vec<String>,
    pub release: Vec<String>,
    pub other: Vec<String>,
}

/// The JSON receipt envelope for a tagdex run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsReceipt {
    pub schema_version: u32,
    pub generated_at_ms: u128,
    pub tool: ToolInfo,
    pub mode: String,
    pub patterns: Vec<String>,
    pub jobs: usize,
    pub packages_total: usize,
    pub packages_imported: usize,
    pub tags: Vec<TagBucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<TagCategories>,
    pub failures: Vec<ImportFailure>,
}
