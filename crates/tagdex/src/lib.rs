//! # tagdex
//!
//! **CLI Binary**
//!
//! This is the entry point for the `tagdex` command-line application.
//! It orchestrates the other crates to perform the requested actions.
//!
//! ## Responsibilities
//! * Parse command line arguments
//! * Wire the resolver, importer, and worker pool together
//! * Render the report and failure summary
//! * Handle errors and exit codes
//!
//! This crate should contain minimal business logic.

mod cli;
mod error_hints;
mod progress;

use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use clap::Parser;

use cli::{Cli, OutputFormat};
use progress::Progress;
use tagdex_classify::PlatformCatalog;
use tagdex_format::RunMeta;
use tagdex_import::{GoImporter, GoResolver};
use tagdex_pipeline::{ProgressSink, ResolveMode, UNIVERSAL_PATTERN};
use tagdex_types::ImportFailure;

/// Render an error (plus any hints) for the terminal.
pub fn format_error(err: &anyhow::Error) -> String {
    error_hints::format(err)
}

/// Warns about skipped patterns during path-set expansion.
struct PatternWarnings;

impl ProgressSink for PatternWarnings {
    fn on_pattern_skipped(&self, pattern: &str, error: &anyhow::Error) {
        eprintln!("tagdex: skipping pattern `{pattern}`: {error:#}");
    }
}

/// Drives the progress bar and records import failures as they happen.
struct CliSink {
    progress: Progress,
    verbose: u8,
    failures: Mutex<Vec<ImportFailure>>,
}

impl CliSink {
    fn new(progress: Progress, verbose: u8) -> Self {
        Self {
            progress,
            verbose,
            failures: Mutex::new(Vec::new()),
        }
    }

    /// Clear the bar and hand back every recorded failure, in arrival order.
    fn finish(self) -> Vec<ImportFailure> {
        self.progress.finish_and_clear();
        self.failures
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ProgressSink for CliSink {
    fn on_dispatch(&self, seq: usize, total: usize, path: &str) {
        self.progress.tick(seq as u64, path);
        if self.verbose >= 2 {
            eprintln!("tagdex: {seq:4}/{total:4} {path}");
        }
    }

    fn on_import_error(&self, path: &str, error: &anyhow::Error) {
        if self.verbose >= 1 {
            eprintln!("tagdex: failed to import {path}: {error:#}");
        }
        self.failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(ImportFailure {
                path: path.to_string(),
                message: format!("{error:#}"),
            });
    }
}

/// Entry point used by the `tagdex` binary.
pub fn run() -> Result<()> {
    let args = Cli::parse();

    if !tagdex_go::go_available() {
        bail!("go is not available on PATH");
    }

    let resolver = GoResolver::new(&args.chdir);
    let importer = GoImporter::new(&args.chdir);
    let jobs = args.jobs.unwrap_or_else(tagdex_pipeline::default_width);
    let mode = if args.skip_unresolved {
        ResolveMode::Lenient
    } else {
        ResolveMode::Strict
    };

    let paths = tagdex_pipeline::expand_patterns(&resolver, &args.patterns, mode, &PatternWarnings)?;
    if args.verbose >= 1 {
        eprintln!("tagdex: expanded patterns to {} packages", paths.len());
    }

    let sink = CliSink::new(
        Progress::new(paths.len() as u64, !args.no_progress),
        args.verbose,
    );
    let survey = tagdex_pipeline::run(&importer, &paths, jobs, &sink);
    let failures = sink.finish();

    let categories = if args.classify {
        let pairs =
            tagdex_go::dist_list(&args.chdir).context("failed to load platform catalog")?;
        let catalog = PlatformCatalog::from_dist_pairs(&pairs, &importer.config().release_tags);
        Some(tagdex_classify::classify(survey.index.tags(), &catalog))
    } else {
        None
    };

    match args.format {
        OutputFormat::Text => {
            print!("{}", tagdex_format::render_text(&survey.index));
            if let Some(categories) = &categories {
                print!("{}", tagdex_format::render_categories(categories));
            }
        }
        OutputFormat::Json => {
            let patterns = if args.patterns.is_empty() {
                vec![UNIVERSAL_PATTERN.to_string()]
            } else {
                args.patterns.clone()
            };
            let receipt = tagdex_format::build_receipt(
                &survey.index,
                categories,
                failures.clone(),
                RunMeta {
                    mode: if args.classify { "classify" } else { "index" }.to_string(),
                    patterns,
                    jobs,
                    packages_total: paths.len(),
                    packages_imported: survey.imported,
                },
            );
            let stdout = std::io::stdout();
            tagdex_format::write_json(&mut stdout.lock(), &receipt)?;
        }
    }

    // Failed imports are reported but never change the exit code; the index
    // over everything that did import is still the answer.
    if !failures.is_empty() {
        eprintln!(
            "tagdex: {} of {} packages failed to import",
            failures.len(),
            paths.len()
        );
        if args.verbose >= 1 {
            for failure in &failures {
                eprintln!("  {}: {}", failure.path, failure.message);
            }
        }
    }

    Ok(())
}
