//! Shared fixtures for e2e tests.

use std::fs;
use std::path::Path;
use std::process::Command;

/// Whether the `go` toolchain is on PATH. Tests that need it return early
/// when it is not, the same way the unit tests in the adapter crates do.
pub fn go_available() -> bool {
    Command::new("go")
        .arg("version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Lay out a small Go module with a known tag population:
///
/// - `example.com/fixture` itself carries no tags
/// - `example.com/fixture/a` carries `cgo` (constraint) and `linux` (filename)
/// - `example.com/fixture/b` carries `darwin` and `linux` (legacy constraint)
pub fn write_fixture_module(dir: &Path) {
    fs::write(
        dir.join("go.mod"),
        "module example.com/fixture\n\ngo 1.21\n",
    )
    .unwrap();
    fs::write(dir.join("fixture.go"), "package fixture\n").unwrap();

    fs::create_dir(dir.join("a")).unwrap();
    fs::write(
        dir.join("a").join("a.go"),
        "//go:build cgo\n\npackage a\n",
    )
    .unwrap();
    fs::write(dir.join("a").join("a_linux.go"), "package a\n").unwrap();

    fs::create_dir(dir.join("b")).unwrap();
    fs::write(
        dir.join("b").join("b.go"),
        "// +build linux darwin\n\npackage b\n",
    )
    .unwrap();
}
