//! # tagdex-format
//!
//! **Tier 3 (Formatting)**
//!
//! Renders a finished survey as the human-readable text report or as a
//! versioned JSON receipt. Everything here is a pure function from data to
//! string; writing to stdout is the CLI's job.
//!
//! ## What belongs here
//! * Text report rendering
//! * Receipt assembly and JSON serialization
//!
//! ## What does NOT belong here
//! * Index construction (use tagdex-pipeline)
//! * Argument parsing or exit codes (use the tagdex binary)

use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tagdex_types::{
    ImportFailure, SCHEMA_VERSION, TagCategories, TagIndex, TagsReceipt, ToolInfo,
};

/// Milliseconds since the Unix epoch, for receipt timestamps.
pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Everything the receipt records about how a run was invoked.
#[derive(Debug, Clone)]
pub struct RunMeta {
    pub mode: String,
    pub patterns: Vec<String>,
    pub jobs: usize,
    pub packages_total: usize,
    pub packages_imported: usize,
}

/// Render the tag index as the text report: a bracketed summary line
/// followed by one indented package list per tag.
pub fn render_text(index: &TagIndex) -> String {
    let mut out = String::new();
    out.push_str("All tags: ");
    out.push_str(&bracketed(index.tags()));
    out.push('\n');

    for (tag, packages) in index.iter() {
        out.push_str(tag);
        out.push_str(":\n");
        for path in packages {
            out.push('\t');
            out.push_str(path);
            out.push('\n');
        }
    }

    out
}

/// Render the four-way partition as one summary line per category.
pub fn render_categories(categories: &TagCategories) -> String {
    let mut out = String::new();
    out.push_str("OS tags: ");
    out.push_str(&bracketed(categories.os.iter().map(String::as_str)));
    out.push('\n');
    out.push_str("Arch tags: ");
    out.push_str(&bracketed(categories.arch.iter().map(String::as_str)));
    out.push('\n');
    out.push_str("Release tags: ");
    out.push_str(&bracketed(categories.release.iter().map(String::as_str)));
    out.push('\n');
    out.push_str("Other tags: ");
    out.push_str(&bracketed(categories.other.iter().map(String::as_str)));
    out.push('\n');
    out
}

/// Assemble the JSON receipt for a finished run.
pub fn build_receipt(
    index: &TagIndex,
    categories: Option<TagCategories>,
    failures: Vec<ImportFailure>,
    meta: RunMeta,
) -> TagsReceipt {
    TagsReceipt {
        schema_version: SCHEMA_VERSION,
        generated_at_ms: now_ms(),
        tool: ToolInfo::current(),
        mode: meta.mode,
        patterns: meta.patterns,
        jobs: meta.jobs,
        packages_total: meta.packages_total,
        packages_imported: meta.packages_imported,
        tags: index.to_buckets(),
        categories,
        failures,
    }
}

/// Serialize a receipt as pretty JSON with a trailing newline.
pub fn write_json(writer: &mut dyn Write, receipt: &TagsReceipt) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, receipt)
        .context("Failed to serialize JSON receipt")?;
    writeln!(writer).context("Failed to write JSON receipt")?;
    Ok(())
}

/// `[a b c]`, the Go slice notation the original report used.
fn bracketed<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::from("[");
    for (i, item) in items.enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(item);
    }
    out.push(']');
    out
}
