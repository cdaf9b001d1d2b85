//! # tagdex-go
//!
//! **Tier 1 (Adapter)**
//!
//! This crate adapts the `go` toolchain for use within `tagdex`. It isolates
//! every process spawn to a single location.
//!
//! ## What belongs here
//! * Package pattern expansion (`go list -e -find`)
//! * Package directory lookup
//! * Platform pair enumeration (`go tool dist list`)
//!
//! ## What does NOT belong here
//! * Source parsing (use tagdex-constraints)
//! * Concurrency coordination (use tagdex-pipeline)
//! * Output formatting

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

/// Create a `Command` for go with process-environment isolation.
///
/// Strips `GOFLAGS` so inherited flags cannot change how patterns expand or
/// how package metadata is printed.
fn go_cmd(workdir: &Path) -> Command {
    let mut cmd = Command::new("go");
    cmd.current_dir(workdir).env_remove("GOFLAGS");
    cmd
}

pub fn go_available() -> bool {
    Command::new("go")
        .arg("version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Expand one package pattern into concrete import paths.
///
/// `-e` tolerates broken packages (they are still listed; importing them is
/// where failure surfaces), `-find` skips dependency resolution.
pub fn list_packages(workdir: &Path, pattern: &str) -> Result<Vec<String>> {
    let output = go_cmd(workdir)
        .args(["list", "-e", "-find", "--", pattern])
        .output()
        .context("Failed to spawn go list")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "failed to resolve package pattern `{pattern}`: {}",
            stderr.trim()
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Locate the source directory for one import path.
pub fn package_dir(workdir: &Path, import_path: &str) -> Result<PathBuf> {
    let output = go_cmd(workdir)
        .args(["list", "-e", "-find", "-f", "{{.Dir}}", "--", import_path])
        .output()
        .context("Failed to spawn go list")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("go list failed for `{import_path}`: {}", stderr.trim());
    }

    let dir = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if dir.is_empty() {
        anyhow::bail!("no directory for package `{import_path}`");
    }
    Ok(PathBuf::from(dir))
}

/// Enumerate the valid `OS/ARCH` pairs known to the toolchain.
pub fn dist_list(workdir: &Path) -> Result<Vec<(String, String)>> {
    let output = go_cmd(workdir)
        .args(["tool", "dist", "list"])
        .output()
        .context("Failed to spawn go tool dist list")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("go tool dist list failed: {}", stderr.trim());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut pairs = Vec::new();
    for line in stdout.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (os, arch) = line
            .split_once('/')
            .with_context(|| format!("malformed platform pair `{line}`"))?;
        pairs.push((os.to_string(), arch.to_string()));
    }
    Ok(pairs)
}
