//! # tagdex-pipeline
//!
//! **Tier 2 (Core)**
//!
//! The concurrent package-import pipeline: expanding package patterns into a
//! deduplicated, sorted path set, fanning imports out across a bounded worker
//! pool, and folding the resulting descriptors into a [`TagIndex`].
//!
//! ## What belongs here
//! * The `PatternResolver` / `PackageImporter` / `ProgressSink` seams
//! * Path set construction
//! * Worker pool and single-consumer aggregation
//!
//! ## What does NOT belong here
//! * Toolchain invocation (use tagdex-go / tagdex-import)
//! * Output formatting (use tagdex-format)

mod paths;
mod pool;

pub use paths::{ResolveMode, UNIVERSAL_PATTERN, expand_patterns};
pub use pool::{Survey, default_width, run};

use anyhow::Result;
use tagdex_types::PackageDescriptor;

/// Expands one package pattern into concrete import paths.
pub trait PatternResolver {
    fn resolve(&self, pattern: &str) -> Result<Vec<String>>;
}

/// Imports one package: returns its descriptor or fails.
///
/// Invoked concurrently from every worker with shared configuration, so
/// implementations must be read-only after construction.
pub trait PackageImporter: Send + Sync {
    fn import(&self, path: &str) -> Result<PackageDescriptor>;
}

/// Observer callbacks for pipeline progress and recoverable failures.
///
/// None of these affect correctness; the pool works fine with [`NullSink`].
pub trait ProgressSink: Send + Sync {
    /// A path was handed to the pool: `seq` counts up from 1 to `total`.
    fn on_dispatch(&self, _seq: usize, _total: usize, _path: &str) {}

    /// A pattern failed to resolve in lenient mode and was skipped.
    fn on_pattern_skipped(&self, _pattern: &str, _error: &anyhow::Error) {}

    /// A package failed to import; the run continues without it.
    fn on_import_error(&self, _path: &str, _error: &anyhow::Error) {}
}

/// A sink that ignores every event.
pub struct NullSink;

impl ProgressSink for NullSink {}
