//! # tagdex-classify
//!
//! **Tier 2 (Core)**
//!
//! Partitions a discovered tag set into operating-system, architecture,
//! release, and other tags against a [`PlatformCatalog`]. The catalog is
//! built once per run from the toolchain's supported-platform list; the
//! classification itself is pure.
//!
//! ## What belongs here
//! * The platform catalog
//! * The four-way partition
//!
//! ## What does NOT belong here
//! * Toolchain invocation (use tagdex-go)
//! * Rendering of the partition (use tagdex-format)

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tagdex_types::TagCategories;

/// The known OS, architecture, and release identifiers for one toolchain.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatformCatalog {
    pub os: BTreeSet<String>,
    pub arch: BTreeSet<String>,
    pub release: BTreeSet<String>,
}

impl PlatformCatalog {
    /// Build a catalog from `os/arch` pairs (as reported by the toolchain's
    /// platform list) and a set of release identifiers.
    pub fn from_dist_pairs(
        pairs: &[(String, String)],
        release_tags: &[String],
    ) -> Self {
        let mut catalog = Self::default();
        for (os, arch) in pairs {
            catalog.os.insert(os.clone());
            catalog.arch.insert(arch.clone());
        }
        catalog.release.extend(release_tags.iter().cloned());
        catalog
    }
}

/// Partition `tags` into the four categories.
///
/// Membership is checked OS first, then architecture, then release, so a tag
/// appearing in more than one catalog set lands in exactly one category. The
/// partition is disjoint and covers every input tag; each output list keeps
/// the input's lexicographic order.
pub fn classify<'a>(
    tags: impl IntoIterator<Item = &'a str>,
    catalog: &PlatformCatalog,
) -> TagCategories {
    let mut categories = TagCategories::default();
    for tag in tags {
        if catalog.os.contains(tag) {
            categories.os.push(tag.to_string());
        } else if catalog.arch.contains(tag) {
            categories.arch.push(tag.to_string());
        } else if catalog.release.contains(tag) {
            categories.release.push(tag.to_string());
        } else {
            categories.other.push(tag.to_string());
        }
    }
    categories
}
