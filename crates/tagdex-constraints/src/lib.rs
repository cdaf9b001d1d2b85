//! # tagdex-constraints
//!
//! **Tier 2 (Utilities)**
//!
//! Pure build-constraint scanning for Go source files. Given a file name and
//! its contents, this crate reports every tag that can gate inclusion of that
//! file: identifiers from `//go:build` expressions, terms from legacy
//! `// +build` lines, and recognized GOOS/GOARCH filename suffixes.
//!
//! ## What belongs here
//! * Constraint comment parsing
//! * Filename suffix rules
//! * Known OS/arch tables and the default release tag list
//!
//! ## What does NOT belong here
//! * File I/O (use tagdex-import)
//! * Toolchain invocation (use tagdex-go)
//! * Tag classification policy (use tagdex-classify)

use std::collections::BTreeSet;

/// Operating systems recognized in filename suffixes, per the Go toolchain.
pub const KNOWN_OS: &[&str] = &[
    "aix",
    "android",
    "darwin",
    "dragonfly",
    "freebsd",
    "hurd",
    "illumos",
    "ios",
    "js",
    "linux",
    "nacl",
    "netbsd",
    "openbsd",
    "plan9",
    "solaris",
    "wasip1",
    "windows",
    "zos",
];

/// Architectures recognized in filename suffixes, per the Go toolchain.
pub const KNOWN_ARCH: &[&str] = &[
    "386",
    "amd64",
    "amd64p32",
    "arm",
    "armbe",
    "arm64",
    "arm64be",
    "loong64",
    "mips",
    "mipsle",
    "mips64",
    "mips64le",
    "mips64p32",
    "mips64p32le",
    "ppc",
    "ppc64",
    "ppc64le",
    "riscv",
    "riscv64",
    "s390",
    "s390x",
    "sparc",
    "sparc64",
    "wasm",
];

/// Highest minor release enumerated in [`default_release_tags`].
const MAX_RELEASE_MINOR: u32 = 25;

/// Release tags implied by targeting a minimum language version
/// (`go1.1` through the current release), mirroring the toolchain defaults.
pub fn default_release_tags() -> Vec<String> {
    (1..=MAX_RELEASE_MINOR)
        .map(|minor| format!("go1.{minor}"))
        .collect()
}

/// Every tag that can affect inclusion of one source file: constraint
/// comments in the file header plus the filename-implied OS/arch tags.
pub fn file_tags(file_name: &str, source: &str) -> BTreeSet<String> {
    let mut tags = filename_tags(file_name);
    tags.extend(constraint_tags(source));
    tags
}

/// Tags implied by a `*_GOOS.go`, `*_GOARCH.go`, or `*_GOOS_GOARCH.go`
/// filename. The `_test` suffix is stripped first, and a bare `linux.go`
/// carries no constraint (the suffix needs a non-empty stem).
pub fn filename_tags(file_name: &str) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();

    // Everything from the first dot on is ignored, so `a_linux.pb.go`
    // constrains the same way `a_linux.go` does.
    let name = file_name.split('.').next().unwrap_or("");
    let name = name.strip_suffix("_test").unwrap_or(name);

    let Some(underscore) = name.find('_') else {
        return tags;
    };

    // The stem before the first underscore is irrelevant; keep the split of
    // the suffix chain (its first element is always empty).
    let mut parts: Vec<&str> = name[underscore..].split('_').collect();
    if parts.last() == Some(&"") {
        parts.pop();
    }

    let n = parts.len();
    if n >= 2 && KNOWN_OS.contains(&parts[n - 2]) && KNOWN_ARCH.contains(&parts[n - 1]) {
        tags.insert(parts[n - 2].to_string());
        tags.insert(parts[n - 1].to_string());
        return tags;
    }
    if n >= 1 && (KNOWN_OS.contains(&parts[n - 1]) || KNOWN_ARCH.contains(&parts[n - 1])) {
        tags.insert(parts[n - 1].to_string());
    }
    tags
}

/// Tags referenced by constraint comments in the file header.
///
/// Constraints are only honored above the package clause, so scanning stops
/// at the first line that is neither blank nor a comment.
pub fn constraint_tags(source: &str) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();
    let mut in_block_comment = false;

    for line in source.lines() {
        let trimmed = line.trim();

        if in_block_comment {
            if let Some(end) = trimmed.find("*/") {
                in_block_comment = false;
                if !trimmed[end + 2..].trim().is_empty() {
                    break;
                }
            }
            continue;
        }

        if trimmed.is_empty() {
            continue;
        }

        if let Some(comment) = trimmed.strip_prefix("//") {
            collect_comment_tags(comment, &mut tags);
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix("/*") {
            match rest.find("*/") {
                Some(end) => {
                    if !rest[end + 2..].trim().is_empty() {
                        break;
                    }
                }
                None => in_block_comment = true,
            }
            continue;
        }

        // Package clause (or stray code): the header is over.
        break;
    }

    tags
}

/// Extract tags from one line comment body (the text after `//`).
fn collect_comment_tags(comment: &str, tags: &mut BTreeSet<String>) {
    // `//go:build` must directly follow the slashes and be followed by the
    // expression; identifiers are everything between the operators.
    if let Some(expr) = comment.strip_prefix("go:build") {
        if expr.is_empty() || expr.starts_with(char::is_whitespace) {
            for ident in expr.split(|c: char| !is_tag_char(c)) {
                if !ident.is_empty() {
                    tags.insert(ident.to_string());
                }
            }
        }
        return;
    }

    // Legacy form: `// +build linux,cgo darwin` (space = OR, comma = AND,
    // `!` = negation; negated terms still name the tag).
    let body = comment.trim_start();
    if let Some(rest) = body.strip_prefix("+build")
        && (rest.is_empty() || rest.starts_with(char::is_whitespace))
    {
        for group in rest.split_whitespace() {
            for term in group.split(',') {
                let term = term.trim_start_matches('!');
                if !term.is_empty() {
                    tags.insert(term.to_string());
                }
            }
        }
    }
}

fn is_tag_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.' || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    // ========================
    // go:build expressions
    // ========================

    #[test]
    fn go_build_single_tag() {
        assert_eq!(constraint_tags("//go:build linux\n\npackage a\n"), set(&["linux"]));
    }

    #[test]
    fn go_build_boolean_expression() {
        let src = "//go:build (linux || darwin) && !cgo\n\npackage a\n";
        assert_eq!(constraint_tags(src), set(&["cgo", "darwin", "linux"]));
    }

    #[test]
    fn go_build_release_tag() {
        let src = "//go:build go1.21\n\npackage a\n";
        assert_eq!(constraint_tags(src), set(&["go1.21"]));
    }

    #[test]
    fn go_build_requires_no_space_after_slashes() {
        // "// go:build" is an ordinary comment, not a constraint.
        assert!(constraint_tags("// go:build linux\n\npackage a\n").is_empty());
    }

    // ========================
    // Legacy +build lines
    // ========================

    #[test]
    fn plus_build_space_and_comma_groups() {
        let src = "// +build linux,cgo darwin\n\npackage a\n";
        assert_eq!(constraint_tags(src), set(&["cgo", "darwin", "linux"]));
    }

    #[test]
    fn plus_build_negation_still_names_the_tag() {
        let src = "// +build !windows\n\npackage a\n";
        assert_eq!(constraint_tags(src), set(&["windows"]));
    }

    #[test]
    fn both_constraint_forms_union() {
        let src = "//go:build linux && amd64\n// +build linux,amd64\n\npackage a\n";
        assert_eq!(constraint_tags(src), set(&["amd64", "linux"]));
    }

    // ========================
    // Header termination
    // ========================

    #[test]
    fn constraints_after_package_clause_are_ignored() {
        let src = "package a\n\n//go:build linux\n";
        assert!(constraint_tags(src).is_empty());
    }

    #[test]
    fn license_block_comment_does_not_end_header() {
        let src = "/*\nCopyright notice.\n*/\n\n//go:build plan9\n\npackage a\n";
        assert_eq!(constraint_tags(src), set(&["plan9"]));
    }

    #[test]
    fn single_line_block_comment_before_constraint() {
        let src = "/* header */\n//go:build js\n\npackage a\n";
        assert_eq!(constraint_tags(src), set(&["js"]));
    }

    #[test]
    fn ordinary_comments_are_skipped() {
        let src = "// Package a does things.\n//go:build ignore\n\npackage a\n";
        assert_eq!(constraint_tags(src), set(&["ignore"]));
    }

    #[test]
    fn empty_source_yields_no_tags() {
        assert!(constraint_tags("").is_empty());
    }

    // ========================
    // Filename suffixes
    // ========================

    #[test]
    fn filename_os_suffix() {
        assert_eq!(filename_tags("conn_linux.go"), set(&["linux"]));
    }

    #[test]
    fn filename_arch_suffix() {
        assert_eq!(filename_tags("asm_amd64.go"), set(&["amd64"]));
    }

    #[test]
    fn filename_os_arch_suffix() {
        assert_eq!(filename_tags("sys_linux_arm64.go"), set(&["arm64", "linux"]));
    }

    #[test]
    fn filename_test_suffix_is_stripped_first() {
        assert_eq!(filename_tags("conn_linux_test.go"), set(&["linux"]));
    }

    #[test]
    fn bare_os_name_is_not_constrained() {
        // `linux.go` has no stem before the suffix, so it carries no tag.
        assert!(filename_tags("linux.go").is_empty());
    }

    #[test]
    fn unknown_suffix_is_not_a_tag() {
        assert!(filename_tags("conn_posix.go").is_empty());
    }

    #[test]
    fn multi_dot_names_use_first_segment() {
        assert_eq!(filename_tags("gen_windows.pb.go"), set(&["windows"]));
    }

    #[test]
    fn file_tags_unions_filename_and_constraints() {
        let src = "//go:build cgo\n\npackage a\n";
        assert_eq!(file_tags("dial_darwin.go", src), set(&["cgo", "darwin"]));
    }

    // ========================
    // Release tags
    // ========================

    #[test]
    fn release_tags_start_at_go1_1() {
        let tags = default_release_tags();
        assert_eq!(tags.first().map(String::as_str), Some("go1.1"));
        assert!(tags.contains(&"go1.21".to_string()));
        assert_eq!(tags.len(), MAX_RELEASE_MINOR as usize);
    }

    // ========================
    // Properties
    // ========================

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn tag_strategy() -> impl Strategy<Value = String> {
            "[a-z][a-z0-9_.]{0,8}"
        }

        proptest! {
            #[test]
            fn conjunction_round_trips(tags in proptest::collection::btree_set(tag_strategy(), 1..6)) {
                let expr: Vec<&str> = tags.iter().map(String::as_str).collect();
                let src = format!("//go:build {}\n\npackage a\n", expr.join(" && "));
                prop_assert_eq!(constraint_tags(&src), tags);
            }

            #[test]
            fn extracted_idents_contain_only_tag_chars(src in "\\PC{0,200}") {
                for tag in constraint_tags(&src) {
                    prop_assert!(tag.chars().all(is_tag_char));
                }
            }

            #[test]
            fn filename_tags_are_known(name in "[a-z_0-9]{1,20}\\.go") {
                for tag in filename_tags(&name) {
                    prop_assert!(
                        KNOWN_OS.contains(&tag.as_str()) || KNOWN_ARCH.contains(&tag.as_str())
                    );
                }
            }
        }
    }
}
