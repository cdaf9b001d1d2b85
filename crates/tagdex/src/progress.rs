//! Progress bar for the import phase.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;

/// A dispatch counter that wraps indicatif.
pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Create a new progress counter over `total` packages.
    ///
    /// The bar is only shown if:
    /// - `enabled` is true
    /// - stderr is a TTY
    /// - NO_COLOR env var is not set
    /// - TAGDEX_NO_PROGRESS env var is not set
    pub fn new(total: u64, enabled: bool) -> Self {
        let should_show = enabled && is_interactive();

        let bar = if should_show {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::with_template("{pos:>4}/{len:4} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            Some(pb)
        } else {
            None
        };

        Self { bar }
    }

    /// Record that the package at position `seq` was handed to a worker.
    pub fn tick(&self, seq: u64, path: &str) {
        if let Some(bar) = &self.bar {
            bar.set_position(seq);
            bar.set_message(path.to_string());
        }
    }

    /// Finish and clear the bar.
    pub fn finish_and_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

/// Check if we should show interactive output.
fn is_interactive() -> bool {
    // The report goes to stdout; progress must not corrupt a piped report,
    // so it keys off stderr.
    if !std::io::stderr().is_terminal() {
        return false;
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("TAGDEX_NO_PROGRESS").is_ok() {
        return false;
    }

    true
}
