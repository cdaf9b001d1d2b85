//! # tagdex-import
//!
//! **Tier 1 (Adapter)**
//!
//! Toolchain-facing adapters implementing the pipeline seams: a
//! [`GoResolver`] that expands patterns through `go list`, and a
//! [`GoImporter`] that locates a package's directory and scans every source
//! file in it for build-constraint tags.
//!
//! ## What belongs here
//! * `PatternResolver` / `PackageImporter` implementations
//! * Source-file selection rules (which files of a package get scanned)
//!
//! ## What does NOT belong here
//! * Constraint parsing (use tagdex-constraints)
//! * Process spawning details (use tagdex-go)
//! * Concurrency coordination (use tagdex-pipeline)

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use tagdex_constraints::{KNOWN_ARCH, KNOWN_OS, default_release_tags, file_tags, filename_tags};
use tagdex_pipeline::{PackageImporter, PatternResolver};
use tagdex_types::PackageDescriptor;

/// Importer configuration, shared read-only across all workers.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Scan every source file regardless of whether its constraints match
    /// the host platform. This is what tag discovery wants: tags that could
    /// *ever* apply, not just those active right now.
    pub use_all_files: bool,
    /// Release identifiers the toolchain implies by default; the platform
    /// catalog's release set comes from here.
    pub release_tags: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            use_all_files: true,
            release_tags: default_release_tags(),
        }
    }
}

/// Expands package patterns via `go list`.
pub struct GoResolver {
    workdir: PathBuf,
}

impl GoResolver {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

impl PatternResolver for GoResolver {
    fn resolve(&self, pattern: &str) -> Result<Vec<String>> {
        tagdex_go::list_packages(&self.workdir, pattern)
    }
}

/// Imports one package by scanning its source directory.
///
/// Read-only after construction; safe to share across workers.
pub struct GoImporter {
    workdir: PathBuf,
    config: ScanConfig,
}

impl GoImporter {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            config: ScanConfig::default(),
        }
    }

    pub fn with_config(workdir: impl Into<PathBuf>, config: ScanConfig) -> Self {
        Self {
            workdir: workdir.into(),
            config,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }
}

impl PackageImporter for GoImporter {
    fn import(&self, path: &str) -> Result<PackageDescriptor> {
        let dir = tagdex_go::package_dir(&self.workdir, path)?;
        let tags = scan_dir(&dir, &self.config)
            .with_context(|| format!("failed to scan package `{path}`"))?;
        Ok(PackageDescriptor::new(path, tags))
    }
}

/// Union the tag sets of every Go source file in `dir`.
///
/// Files prefixed with `.` or `_` are never part of a package and are
/// skipped, as are subdirectories (a package is a single directory).
pub fn scan_dir(dir: &Path, config: &ScanConfig) -> Result<BTreeSet<String>> {
    let mut tags = BTreeSet::new();

    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read package directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !name.ends_with(".go") || name.starts_with('.') || name.starts_with('_') {
            continue;
        }
        if !config.use_all_files && !matches_host(&filename_tags(name)) {
            continue;
        }

        let bytes = fs::read(entry.path())
            .with_context(|| format!("Failed to read {}", entry.path().display()))?;
        let source = String::from_utf8_lossy(&bytes);
        tags.extend(file_tags(name, &source));
    }

    Ok(tags)
}

/// Whether the filename-implied OS/arch tags match the host platform.
fn matches_host(tags: &BTreeSet<String>) -> bool {
    for tag in tags {
        if KNOWN_OS.contains(&tag.as_str()) && tag != host_os() {
            return false;
        }
        if KNOWN_ARCH.contains(&tag.as_str()) && tag != host_arch() {
            return false;
        }
    }
    true
}

fn host_os() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

fn host_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        other => other,
    }
}
