use anyhow::Error;

pub(crate) fn format(err: &Error) -> String {
    let mut out = format!("Error: {err:#}");
    let hints = suggestions(err);
    if !hints.is_empty() {
        out.push_str("\n\nHints:\n");
        for hint in hints {
            out.push_str("- ");
            out.push_str(&hint);
            out.push('\n');
        }
    }
    out
}

fn suggestions(err: &Error) -> Vec<String> {
    let chain: Vec<String> = err.chain().map(|e| e.to_string()).collect();
    let haystack = chain.join(" | ").to_ascii_lowercase();
    let mut out: Vec<String> = Vec::new();

    if haystack.contains("go is not available on path") {
        push_hint(&mut out, "Install Go and verify it with `go version`.");
        push_hint(
            &mut out,
            "If Go is installed, make sure its bin directory is on PATH.",
        );
    }

    if haystack.contains("failed to resolve package pattern") {
        push_hint(
            &mut out,
            "Run from inside a Go module, or point at one with `-C <dir>`.",
        );
        push_hint(
            &mut out,
            "Bad patterns can be skipped instead with `--skip-unresolved`.",
        );
    }

    if haystack.contains("no directory for package") {
        push_hint(
            &mut out,
            "The package may not be downloaded yet; try `go mod download` first.",
        );
    }

    if haystack.contains("failed to load platform catalog") {
        push_hint(
            &mut out,
            "Check that `go tool dist list` works with your toolchain.",
        );
        push_hint(&mut out, "Classification can be skipped by dropping `--classify`.");
    }

    out
}

fn push_hint(out: &mut Vec<String>, hint: &str) {
    if !out.iter().any(|h| h == hint) {
        out.push(hint.to_string());
    }
}
