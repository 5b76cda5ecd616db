//! Glob matching for include/exclude file selection.
//!
//! Patterns follow the Ant-style conventions used by deployment tooling and
//! are compiled with the `glob` crate:
//!
//! - `**` matches any number of path segments, including none.
//! - `*` and `?` never cross a `/`.
//! - A leading `/` anchors the pattern at the file set root.
//! - Any other pattern may match at any depth (an implicit `**/` prefix), so
//!   `*.pyc` excludes compiled files in every directory.
//! - A trailing `/` selects everything below that directory.
//!
//! On top of the user's exclude patterns, [`BUILTIN_EXCLUDES`] drops version
//! control metadata and editor droppings unless the matcher is told
//! otherwise.
//!
//! Paths handed to the matcher are root-relative and use `/` separators.

use crate::error::PatternError;
use glob::{MatchOptions, Pattern};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Patterns excluded from every file set unless explicitly disabled.
///
/// These are the Ant default excludes: editor backups and lock files, plus
/// the metadata of CVS, SCCS, Visual SourceSafe, Subversion, Git, Mercurial
/// and Bazaar, and macOS Finder files.
pub const BUILTIN_EXCLUDES: &[&str] = &[
    "**/*~",
    "**/#*#",
    "**/.#*",
    "**/%*%",
    "**/._*",
    "**/CVS",
    "**/CVS/**",
    "**/.cvsignore",
    "**/SCCS",
    "**/SCCS/**",
    "**/vssver.scc",
    "**/.svn",
    "**/.svn/**",
    "**/.DS_Store",
    "**/.git",
    "**/.git/**",
    "**/.gitattributes",
    "**/.gitignore",
    "**/.gitmodules",
    "**/.hg",
    "**/.hg/**",
    "**/.hgignore",
    "**/.hgsub",
    "**/.hgsubstate",
    "**/.hgtags",
    "**/.bzr",
    "**/.bzr/**",
    "**/.bzrignore",
];

/// A single compiled pattern, remembering what the user wrote.
#[derive(Debug, Clone)]
struct CompiledPattern {
    source: String,
    pattern: Pattern,
}

impl CompiledPattern {
    fn compile(source: &str) -> Result<Self, PatternError> {
        let normalised = normalise_pattern(source);
        let pattern = Pattern::new(&normalised).map_err(|err| PatternError::InvalidPattern {
            pattern: source.to_owned(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            source: source.to_owned(),
            pattern,
        })
    }

    fn matches(&self, path: &str) -> bool {
        self.pattern.matches_with(path, MATCH_OPTIONS)
    }
}

/// Rewrite a user pattern into the form understood by [`glob::Pattern`].
///
/// # Examples
///
/// ```
/// use stowage_common::matcher::normalise_pattern;
///
/// assert_eq!(normalise_pattern("*.pyc"), "**/*.pyc");
/// assert_eq!(normalise_pattern("/setup.py"), "setup.py");
/// assert_eq!(normalise_pattern("vendor/"), "**/vendor/**");
/// assert_eq!(normalise_pattern("**"), "**");
/// ```
#[must_use]
pub fn normalise_pattern(raw: &str) -> String {
    let mut pattern = raw.trim().to_owned();
    if pattern.ends_with('/') {
        pattern.push_str("**");
    }

    if let Some(anchored) = pattern
        .strip_prefix("./")
        .or_else(|| pattern.strip_prefix('/'))
    {
        return anchored.to_owned();
    }

    if pattern.starts_with("**") {
        pattern
    } else {
        format!("**/{pattern}")
    }
}

/// Check a single root-relative path against a single pattern.
///
/// # Errors
///
/// Returns [`PatternError::InvalidPattern`] if `pattern` is not valid glob
/// syntax.
pub fn matches(path: &str, pattern: &str) -> Result<bool, PatternError> {
    Ok(CompiledPattern::compile(pattern)?.matches(path))
}

/// Compiled include and exclude pattern sets.
///
/// A path is selected when it matches at least one include pattern and no
/// exclude pattern. Exclusion always wins. [`BUILTIN_EXCLUDES`] apply unless
/// removed with [`GlobMatcher::without_builtin_excludes`].
///
/// # Examples
///
/// ```
/// use stowage_common::matcher::GlobMatcher;
///
/// let matcher = GlobMatcher::new(&["f1/**"], &["**/*.pyc"]).unwrap();
/// assert!(matcher.is_selected("f1/a.py"));
/// assert!(!matcher.is_selected("f1/a.pyc"));
/// assert!(!matcher.is_selected("f2/b.js"));
/// assert!(!matcher.is_selected("f1/.git/config"));
/// ```
#[derive(Debug, Clone)]
pub struct GlobMatcher {
    includes: Vec<CompiledPattern>,
    excludes: Vec<CompiledPattern>,
    builtin: Vec<CompiledPattern>,
}

impl GlobMatcher {
    /// Compile include and exclude patterns.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidPattern`] for the first pattern that
    /// fails to compile.
    pub fn new<S: AsRef<str>>(includes: &[S], excludes: &[S]) -> Result<Self, PatternError> {
        Ok(Self {
            includes: compile_all(includes)?,
            excludes: compile_all(excludes)?,
            builtin: compile_all(BUILTIN_EXCLUDES)?,
        })
    }

    /// Drop [`BUILTIN_EXCLUDES`], leaving only the caller's patterns.
    #[must_use]
    pub fn without_builtin_excludes(self) -> Self {
        Self {
            builtin: Vec::new(),
            ..self
        }
    }

    /// Returns true when `path` is included and not excluded.
    #[must_use]
    pub fn is_selected(&self, path: &str) -> bool {
        self.includes.iter().any(|p| p.matches(path)) && !self.is_excluded(path)
    }

    /// Returns true when any exclude pattern, built-in or user, matches
    /// `path`.
    #[must_use]
    pub fn is_excluded(&self, path: &str) -> bool {
        self.excludes
            .iter()
            .chain(&self.builtin)
            .any(|p| p.matches(path))
    }

    /// The include patterns as originally written.
    pub fn include_sources(&self) -> impl Iterator<Item = &str> {
        self.includes.iter().map(|p| p.source.as_str())
    }

    /// The user's exclude patterns as originally written.
    pub fn exclude_sources(&self) -> impl Iterator<Item = &str> {
        self.excludes.iter().map(|p| p.source.as_str())
    }
}

fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<CompiledPattern>, PatternError> {
    patterns
        .iter()
        .map(|p| CompiledPattern::compile(p.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::everything("**", "f1/test/f1.py", true)]
    #[case::everything_top_level("**", "setup.py", true)]
    #[case::subtree("f1/**", "f1/test/f1.py", true)]
    #[case::subtree_other_dir("f1/**", "f2/f2.js", false)]
    #[case::extension_any_depth("*.pyc", "f1/test/f1.pyc", true)]
    #[case::extension_top_level("*.pyc", "a.pyc", true)]
    #[case::star_stays_in_segment("/f1/*.py", "f1/test/f1.py", false)]
    #[case::star_in_segment("/f1/*.py", "f1/f1.py", true)]
    #[case::anchored_miss("/f1.py", "f1/f1.py", false)]
    #[case::trailing_slash("test2/", "f1/test2/test.txt", true)]
    #[case::question_mark("f?/f?.py", "f1/f1.py", true)]
    #[case::subtree_matches_nested_dir("f1/**", "x/f1/c.py", true)]
    #[case::anchored_subtree_stays_at_root("/f1/**", "x/f1/c.py", false)]
    #[case::anchored_subtree("/f1/**", "f1/c.py", true)]
    fn pattern_matching(#[case] pattern: &str, #[case] path: &str, #[case] expected: bool) {
        assert_eq!(
            matches(path, pattern).expect("valid pattern"),
            expected,
            "{pattern} vs {path}"
        );
    }

    #[rstest]
    fn exclusion_wins_over_inclusion() {
        let matcher = GlobMatcher::new(&["**/*.py"], &["f1/**"]).expect("valid");
        assert!(!matcher.is_selected("f1/f1.py"));
        assert!(matcher.is_selected("f2/f2.py"));
    }

    #[rstest]
    fn empty_include_list_selects_nothing() {
        let matcher = GlobMatcher::new::<&str>(&[], &[]).expect("valid");
        assert!(!matcher.is_selected("anything"));
    }

    #[rstest]
    fn invalid_glob_reports_original_pattern() {
        let err = GlobMatcher::new(&["a/**b"], &[]).expect_err("invalid recursive wildcard");
        assert!(matches!(
            err,
            PatternError::InvalidPattern { ref pattern, .. } if pattern == "a/**b"
        ));
    }

    #[rstest]
    #[case::git_dir(".git/config")]
    #[case::nested_git_object("lib/.git/objects/ab/cd")]
    #[case::svn(".svn/entries")]
    #[case::finder(".DS_Store")]
    #[case::editor_backup("a.py~")]
    #[case::emacs_autosave("src/#handler.py#")]
    #[case::emacs_lock(".#handler.py")]
    #[case::gitignore(".gitignore")]
    fn builtin_excludes_drop_tooling_files(#[case] path: &str) {
        let matcher = GlobMatcher::new(&["**"], &[]).expect("valid");
        assert!(!matcher.is_selected(path), "{path} should be excluded");
        assert!(matcher.without_builtin_excludes().is_selected(path));
    }

    #[rstest]
    #[case("handler.py")]
    #[case("git/config")]
    #[case("lib/gitignore.py")]
    fn builtin_excludes_leave_ordinary_files(#[case] path: &str) {
        let matcher = GlobMatcher::new(&["**"], &[]).expect("valid");
        assert!(matcher.is_selected(path));
    }

    #[rstest]
    fn sources_are_kept_verbatim() {
        let matcher = GlobMatcher::new(&["f1/**"], &["*.pyc"]).expect("valid");
        assert_eq!(matcher.include_sources().collect::<Vec<_>>(), vec!["f1/**"]);
        assert_eq!(matcher.exclude_sources().collect::<Vec<_>>(), vec!["*.pyc"]);
    }
}
