//! Package Path Set: pattern expansion into a deduplicated, sorted sequence.

use std::collections::BTreeSet;

use anyhow::{Context, Result};

use crate::{PatternResolver, ProgressSink};

/// The pattern substituted for an empty pattern list: every package in the
/// current module and its dependencies.
pub const UNIVERSAL_PATTERN: &str = "all";

/// How resolver failures are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveMode {
    /// Any resolver failure aborts the run before the pool starts.
    #[default]
    Strict,
    /// A failing pattern is reported through the sink and skipped.
    Lenient,
}

/// Expand `patterns` through the resolver into a sorted, duplicate-free
/// sequence of package paths. An empty pattern list behaves exactly like
/// `[UNIVERSAL_PATTERN]`.
pub fn expand_patterns(
    resolver: &dyn PatternResolver,
    patterns: &[String],
    mode: ResolveMode,
    sink: &dyn ProgressSink,
) -> Result<Vec<String>> {
    let universal = [UNIVERSAL_PATTERN.to_string()];
    let patterns: &[String] = if patterns.is_empty() {
        &universal
    } else {
        patterns
    };

    let mut set = BTreeSet::new();
    for pattern in patterns {
        match resolver.resolve(pattern) {
            Ok(resolved) => set.extend(resolved),
            Err(err) => match mode {
                ResolveMode::Strict => {
                    return Err(err)
                        .with_context(|| format!("failed to resolve package pattern `{pattern}`"));
                }
                ResolveMode::Lenient => sink.on_pattern_skipped(pattern, &err),
            },
        }
    }

    Ok(set.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NullSink;
    use std::sync::Mutex;

    /// Resolver backed by a fixed table; records the patterns it was asked for.
    struct TableResolver {
        table: Vec<(&'static str, Vec<&'static str>)>,
        seen: Mutex<Vec<String>>,
    }

    impl TableResolver {
        fn new(table: Vec<(&'static str, Vec<&'static str>)>) -> Self {
            Self {
                table,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl PatternResolver for TableResolver {
        fn resolve(&self, pattern: &str) -> Result<Vec<String>> {
            self.seen.lock().unwrap().push(pattern.to_string());
            for (key, paths) in &self.table {
                if *key == pattern {
                    return Ok(paths.iter().map(|p| p.to_string()).collect());
                }
            }
            anyhow::bail!("unknown pattern `{pattern}`")
        }
    }

    struct SkipRecorder(Mutex<Vec<String>>);

    impl ProgressSink for SkipRecorder {
        fn on_pattern_skipped(&self, pattern: &str, _error: &anyhow::Error) {
            self.0.lock().unwrap().push(pattern.to_string());
        }
    }

    #[test]
    fn duplicate_and_overlapping_patterns_dedup_and_sort() {
        let resolver = TableResolver::new(vec![
            ("./a", vec!["pkg/a"]),
            ("./b", vec!["pkg/b", "pkg/a"]),
        ]);
        let patterns = vec!["./a".to_string(), "./a".to_string(), "./b".to_string()];

        let paths =
            expand_patterns(&resolver, &patterns, ResolveMode::Strict, &NullSink).unwrap();
        assert_eq!(paths, vec!["pkg/a".to_string(), "pkg/b".to_string()]);
    }

    #[test]
    fn empty_pattern_list_uses_universal_pattern() {
        let resolver = TableResolver::new(vec![(UNIVERSAL_PATTERN, vec!["pkg/x"])]);

        let implicit = expand_patterns(&resolver, &[], ResolveMode::Strict, &NullSink).unwrap();
        let explicit = expand_patterns(
            &resolver,
            &[UNIVERSAL_PATTERN.to_string()],
            ResolveMode::Strict,
            &NullSink,
        )
        .unwrap();

        assert_eq!(implicit, explicit);
        assert_eq!(
            resolver.seen.lock().unwrap().as_slice(),
            &[UNIVERSAL_PATTERN.to_string(), UNIVERSAL_PATTERN.to_string()]
        );
    }

    #[test]
    fn strict_mode_fails_on_first_bad_pattern() {
        let resolver = TableResolver::new(vec![("./a", vec!["pkg/a"])]);
        let patterns = vec!["./a".to_string(), "./missing".to_string()];

        let err =
            expand_patterns(&resolver, &patterns, ResolveMode::Strict, &NullSink).unwrap_err();
        assert!(err.to_string().contains("./missing"));
    }

    #[test]
    fn lenient_mode_skips_bad_patterns_and_continues() {
        let resolver = TableResolver::new(vec![
            ("./a", vec!["pkg/a"]),
            ("./c", vec!["pkg/c"]),
        ]);
        let patterns = vec![
            "./a".to_string(),
            "./missing".to_string(),
            "./c".to_string(),
        ];
        let sink = SkipRecorder(Mutex::new(Vec::new()));

        let paths = expand_patterns(&resolver, &patterns, ResolveMode::Lenient, &sink).unwrap();
        assert_eq!(paths, vec!["pkg/a".to_string(), "pkg/c".to_string()]);
        assert_eq!(sink.0.lock().unwrap().as_slice(), &["./missing".to_string()]);
    }
}
