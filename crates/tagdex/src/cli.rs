//! Command-line surface.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "tagdex",
    version,
    about = "Index the build-constraint tags of Go packages",
    long_about = "Expands package patterns through `go list`, scans every package's \
source files for build-constraint tags, and reports which packages use which tags."
)]
pub struct Cli {
    /// Package patterns to index. Defaults to `all` when empty.
    pub patterns: Vec<String>,

    /// Partition the discovered tags into OS/arch/release/other categories.
    #[arg(long)]
    pub classify: bool,

    /// Number of concurrent import workers. Defaults to the CPU count.
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Skip patterns that fail to resolve instead of aborting.
    #[arg(long)]
    pub skip_unresolved: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Run as if started in this directory.
    #[arg(short = 'C', long = "chdir", value_name = "DIR", default_value = ".")]
    pub chdir: PathBuf,

    /// Disable the progress bar even on a terminal.
    #[arg(long)]
    pub no_progress: bool,

    /// Increase log verbosity (-v: failures as they happen, -vv: every dispatch).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report.
    Text,
    /// Versioned JSON receipt.
    Json,
}
