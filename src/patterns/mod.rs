//! Include/exclude glob patterns for directory-tree snapshots.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use snafu::{ResultExt, Snafu};

use crate::file_tree::RelativePath;

/// Include and exclude globs matched against `/`-joined relative paths.
///
/// `*` and `?` never cross a `/`; use `**` to match across directories. An
/// empty include list includes every file. Excludes win over includes and
/// also prune whole directories; includes only ever filter files.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    includes: Vec<String>,
    excludes: Vec<String>,
    include_set: Option<GlobSet>,
    exclude_set: Option<GlobSet>,
}

impl PatternSet {
    /// A pattern set that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patterns(
        includes: Vec<String>,
        excludes: Vec<String>,
    ) -> Result<Self, PatternSetError> {
        let include_set = Self::compile(&includes)?;
        let exclude_set = Self::compile(&excludes)?;
        Ok(Self {
            includes,
            excludes,
            include_set,
            exclude_set,
        })
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }

    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }

    pub fn is_file_included(&self, path: &RelativePath) -> bool {
        let path = path.to_string();
        let included = match &self.include_set {
            Some(set) => set.is_match(&path),
            None => true,
        };
        included && !self.is_excluded(&path)
    }

    pub fn is_dir_included(&self, path: &RelativePath) -> bool {
        !self.is_excluded(&path.to_string())
    }

    fn is_excluded(&self, path: &str) -> bool {
        self.exclude_set
            .as_ref()
            .is_some_and(|set| set.is_match(path))
    }

    fn compile(patterns: &[String]) -> Result<Option<GlobSet>, PatternSetError> {
        if patterns.is_empty() {
            return Ok(None);
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .context(InvalidPatternSnafu {
                    pattern: pattern.clone(),
                })?;
            builder.add(glob);
        }
        builder.build().map(Some).context(BuildSnafu)
    }
}

impl PartialEq for PatternSet {
    fn eq(&self, other: &Self) -> bool {
        self.includes == other.includes && self.excludes == other.excludes
    }
}

impl Eq for PatternSet {}

#[derive(Debug, Snafu)]
pub enum PatternSetError {
    #[snafu(display("Invalid glob pattern '{}'", pattern))]
    InvalidPatternError {
        pattern: String,
        source: globset::Error,
    },
    #[snafu(display("Failed to compile glob patterns"))]
    BuildError { source: globset::Error },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn path(value: &str) -> RelativePath {
        RelativePath::from_segments(value.split('/'))
    }

    fn patterns(includes: &[&str], excludes: &[&str]) -> PatternSet {
        PatternSet::with_patterns(
            includes.iter().map(|s| s.to_string()).collect(),
            excludes.iter().map(|s| s.to_string()).collect(),
        )
        .expect("Failed to compile patterns")
    }

    #[test]
    fn test_empty_pattern_set_includes_everything() {
        let set = PatternSet::new();
        assert!(set.is_empty());
        assert!(set.is_file_included(&path("a/b.txt")));
        assert!(set.is_dir_included(&path("a")));
    }

    #[rstest]
    #[case("src/main.rs", true)]
    #[case("src/nested/lib.rs", true)]
    #[case("src/notes.md", false)]
    #[case("src/generated/out.rs", false)]
    fn test_include_and_exclude(#[case] file: &str, #[case] expected: bool) {
        let set = patterns(&["**/*.rs"], &["**/generated/**"]);
        assert_eq!(set.is_file_included(&path(file)), expected);
    }

    #[rstest]
    #[case("*.rs", "main.rs", true)]
    #[case("*.rs", "src/main.rs", false)]
    #[case("src/*.rs", "src/nested/lib.rs", false)]
    #[case("src/?.rs", "src/a.rs", true)]
    #[case("**/*.rs", "main.rs", true)]
    #[case("**/*.rs", "src/nested/lib.rs", true)]
    #[case("src/**", "src/nested/lib.rs", true)]
    fn test_wildcards_stay_within_one_segment(
        #[case] include: &str,
        #[case] file: &str,
        #[case] expected: bool,
    ) {
        let set = patterns(&[include], &[]);
        assert_eq!(set.is_file_included(&path(file)), expected);
    }

    #[test]
    fn test_includes_do_not_prune_directories() {
        let set = patterns(&["**/*.rs"], &[]);
        assert!(set.is_dir_included(&path("docs")));
    }

    #[test]
    fn test_excludes_prune_directories() {
        let set = patterns(&[], &["target"]);
        assert!(!set.is_dir_included(&path("target")));
        assert!(set.is_dir_included(&path("src")));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let result = PatternSet::with_patterns(vec!["a[".to_string()], vec![]);
        assert!(matches!(
            result,
            Err(PatternSetError::InvalidPatternError { .. })
        ));
    }

    #[test]
    fn test_equality_ignores_compiled_sets() {
        assert_eq!(patterns(&["*.rs"], &[]), patterns(&["*.rs"], &[]));
        assert_ne!(patterns(&["*.rs"], &[]), patterns(&[], &["*.rs"]));
    }
}
