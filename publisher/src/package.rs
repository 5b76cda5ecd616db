//! Package specifications.
//!
//! A [`PackageSpec`] says what to package: the artefact name, the root
//! directory, and the include and exclude patterns selecting files under
//! it, plus whether the built-in tooling excludes apply. It is immutable
//! once built.

use crate::artefact::ArtefactName;
use camino::{Utf8Path, Utf8PathBuf};
use stowage_common::{
    DEFAULT_EXCLUDE, DEFAULT_INCLUDE, GlobMatcher, PatternError, PatternInput, resolve_patterns,
};

/// Describes one artefact to package.
///
/// # Examples
///
/// ```
/// use stowage_publisher::artefact::ArtefactName;
/// use stowage_publisher::package::PackageSpec;
///
/// let name = ArtefactName::try_from("things").unwrap();
/// let spec = PackageSpec::new(name, "lambda/things")
///     .with_exclude(vec!["**/*.pyc".to_owned()]);
/// assert_eq!(spec.include(), ["**"]);
/// assert_eq!(spec.exclude(), ["**/*.pyc"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    name: ArtefactName,
    root: Utf8PathBuf,
    include: Vec<String>,
    exclude: Vec<String>,
    builtin_excludes: bool,
}

impl PackageSpec {
    /// Create a spec selecting every file under `root`.
    #[must_use]
    pub fn new(name: ArtefactName, root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            name,
            root: root.into(),
            include: to_owned(DEFAULT_INCLUDE),
            exclude: to_owned(DEFAULT_EXCLUDE),
            builtin_excludes: true,
        }
    }

    /// Create a spec from raw configuration values.
    ///
    /// Pattern fields are resolved with [`resolve_patterns`]; errors name the
    /// key as `<section>.include` or `<section>.exclude`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidConfiguration`] when a pattern field is
    /// neither a string nor a list of strings.
    pub fn from_config(
        name: ArtefactName,
        root: impl Into<Utf8PathBuf>,
        section: &str,
        include: Option<PatternInput>,
        exclude: Option<PatternInput>,
    ) -> Result<Self, PatternError> {
        let include = resolve_patterns(include, &format!("{section}.include"), DEFAULT_INCLUDE)?;
        let exclude = resolve_patterns(exclude, &format!("{section}.exclude"), DEFAULT_EXCLUDE)?;
        Ok(Self::new(name, root)
            .with_include(include)
            .with_exclude(exclude))
    }

    /// Replace the include patterns.
    #[must_use]
    pub fn with_include(self, include: Vec<String>) -> Self {
        Self { include, ..self }
    }

    /// Replace the exclude patterns.
    #[must_use]
    pub fn with_exclude(self, exclude: Vec<String>) -> Self {
        Self { exclude, ..self }
    }

    /// Enable or disable [`BUILTIN_EXCLUDES`](stowage_common::BUILTIN_EXCLUDES).
    #[must_use]
    pub fn with_builtin_excludes(self, builtin_excludes: bool) -> Self {
        Self {
            builtin_excludes,
            ..self
        }
    }

    /// The artefact name.
    #[must_use]
    pub fn name(&self) -> &ArtefactName {
        &self.name
    }

    /// The directory to package.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Include patterns, in configuration order.
    #[must_use]
    pub fn include(&self) -> &[String] {
        &self.include
    }

    /// Exclude patterns, in configuration order.
    #[must_use]
    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    /// Whether the built-in tooling excludes apply.
    #[must_use]
    pub fn builtin_excludes(&self) -> bool {
        self.builtin_excludes
    }

    /// Compile the patterns into a matcher.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidPattern`] when a pattern is not valid
    /// glob syntax.
    pub fn matcher(&self) -> Result<GlobMatcher, PatternError> {
        let matcher = GlobMatcher::new(self.include.as_slice(), self.exclude.as_slice())?;
        Ok(if self.builtin_excludes {
            matcher
        } else {
            matcher.without_builtin_excludes()
        })
    }
}

fn to_owned(patterns: &[&str]) -> Vec<String> {
    patterns.iter().map(|p| (*p).to_owned()).collect()
}
