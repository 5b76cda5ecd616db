//! Deployment configuration.
//!
//! Artefacts are described in a TOML file (by default `stowage.toml`):
//!
//! ```toml
//! bucket = "deploy-artefacts"
//! key_prefix = "lambda"
//!
//! [[artefact]]
//! name = "things"
//! path = "~/src/things"
//! include = "**"
//! exclude = ["**/*.pyc", "tests/"]
//! # Keep `.git`, `.svn`, editor backups and the like in the archive.
//! builtin_excludes = false
//! ```
//!
//! Parsing only checks the shape of the file. [`StowageConfig::deployment`]
//! then validates names, resolves pattern fields and expands `~`, producing
//! a [`Deployment`] ready to publish.

use crate::artefact::{ArtefactError, ArtefactName, KeyPolicy};
use crate::dirs::BaseDirs;
use crate::package::PackageSpec;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;
use stowage_common::{PatternError, PatternInput};
use thiserror::Error;

/// Configuration file read when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "stowage.toml";

/// Errors arising from loading or interpreting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {path}")]
    Read {
        /// The file that was requested.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML or has unexpected keys.
    #[error("invalid configuration in {origin}: {source}")]
    Parse {
        /// Where the text came from.
        origin: String,
        /// The parser's diagnosis.
        #[source]
        source: toml::de::Error,
    },

    /// A pattern field had the wrong shape.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// An artefact name is unusable in object keys.
    #[error(transparent)]
    Name(#[from] ArtefactError),

    /// Two artefacts share a name.
    #[error("artefact {name} is configured more than once")]
    DuplicateArtefact {
        /// The repeated name.
        name: String,
    },

    /// A requested artefact is not configured.
    #[error("no artefact named {name} is configured")]
    UnknownArtefact {
        /// The requested name.
        name: String,
    },

    /// Neither the file nor the caller named a bucket.
    #[error("no bucket configured; set `bucket` or pass --bucket")]
    MissingBucket,

    /// A path starts with `~` but the home directory is unknown.
    #[error("cannot expand {path}: home directory is unknown")]
    HomeDirectoryUnavailable {
        /// The path as configured.
        path: String,
    },

    /// The home directory is not valid UTF-8.
    #[error("home directory is not valid UTF-8: {}", .0.display())]
    NonUtf8Home(PathBuf),
}

/// Top-level configuration file contents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StowageConfig {
    /// Bucket receiving every artefact.
    #[serde(default)]
    pub bucket: Option<String>,
    /// Key prefix; defaults to `lambda`.
    #[serde(default)]
    pub key_prefix: Option<String>,
    /// Artefacts to package, in publishing order.
    #[serde(default, rename = "artefact")]
    pub artefacts: Vec<ArtefactConfig>,
}

/// One `[[artefact]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtefactConfig {
    /// Artefact name, used in the object key.
    pub name: String,
    /// Directory to package. A leading `~` expands to the home directory;
    /// relative paths resolve against the working directory.
    pub path: String,
    /// Include patterns: a string or a list of strings.
    #[serde(default)]
    pub include: Option<PatternInput>,
    /// Exclude patterns: a string or a list of strings.
    #[serde(default)]
    pub exclude: Option<PatternInput>,
    /// Whether version-control metadata and editor droppings are excluded.
    #[serde(default = "builtin_excludes_enabled")]
    pub builtin_excludes: bool,
}

const fn builtin_excludes_enabled() -> bool {
    true
}

impl StowageConfig {
    /// Parse configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Self::parse(source, "inline configuration")
    }

    /// Read and parse the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when it is malformed.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(&source, path.as_str())
    }

    fn parse(source: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|source| ConfigError::Parse {
            origin: origin.to_owned(),
            source,
        })
    }

    /// The key policy implied by `key_prefix`.
    #[must_use]
    pub fn key_policy(&self) -> KeyPolicy {
        self.key_prefix
            .as_deref()
            .map_or_else(KeyPolicy::default, KeyPolicy::with_prefix)
    }

    /// Validate every artefact and produce package specs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Name`] for invalid names,
    /// [`ConfigError::DuplicateArtefact`] for repeated names,
    /// [`ConfigError::Pattern`] for malformed pattern fields, and the home
    /// directory errors when `~` cannot be expanded.
    pub fn package_specs(&self, dirs: &dyn BaseDirs) -> Result<Vec<PackageSpec>, ConfigError> {
        let mut seen = HashSet::new();
        self.artefacts
            .iter()
            .map(|artefact| {
                if !seen.insert(artefact.name.as_str()) {
                    return Err(ConfigError::DuplicateArtefact {
                        name: artefact.name.clone(),
                    });
                }
                artefact.package_spec(dirs)
            })
            .collect()
    }

    /// Produce a [`Deployment`], optionally overriding the bucket.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingBucket`] when no bucket is known, or
    /// any error from [`Self::package_specs`].
    pub fn deployment(
        &self,
        dirs: &dyn BaseDirs,
        bucket_override: Option<&str>,
    ) -> Result<Deployment, ConfigError> {
        let bucket = bucket_override
            .or(self.bucket.as_deref())
            .filter(|bucket| !bucket.is_empty())
            .ok_or(ConfigError::MissingBucket)?;
        Ok(Deployment {
            bucket: bucket.to_owned(),
            keys: self.key_policy(),
            packages: self.package_specs(dirs)?,
        })
    }
}

impl ArtefactConfig {
    fn package_spec(&self, dirs: &dyn BaseDirs) -> Result<PackageSpec, ConfigError> {
        let name = ArtefactName::try_from(self.name.as_str())?;
        let root = expand_home(&self.path, dirs)?;
        let section = format!("artefact.{}", self.name);
        Ok(PackageSpec::from_config(
            name,
            root,
            &section,
            self.include.clone(),
            self.exclude.clone(),
        )?
        .with_builtin_excludes(self.builtin_excludes))
    }
}

/// Expand a leading `~` in `path` to the home directory.
///
/// # Errors
///
/// Returns [`ConfigError::HomeDirectoryUnavailable`] when `path` needs the
/// home directory and none is known.
pub fn expand_home(path: &str, dirs: &dyn BaseDirs) -> Result<Utf8PathBuf, ConfigError> {
    let rest = match path.strip_prefix('~') {
        Some("") => "",
        Some(rest) if rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return Ok(Utf8PathBuf::from(path)),
    };
    let home = dirs
        .home_dir()
        .ok_or_else(|| ConfigError::HomeDirectoryUnavailable {
            path: path.to_owned(),
        })?;
    let home = Utf8PathBuf::from_path_buf(home).map_err(ConfigError::NonUtf8Home)?;
    Ok(if rest.is_empty() { home } else { home.join(rest) })
}

/// A validated set of artefacts bound for one bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    /// Destination bucket.
    pub bucket: String,
    /// Object key policy.
    pub keys: KeyPolicy,
    /// Artefacts in publishing order.
    pub packages: Vec<PackageSpec>,
}

impl Deployment {
    /// Keep only the artefacts named in `names`, preserving configuration
    /// order. An empty `names` keeps everything.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownArtefact`] for a name that is not
    /// configured.
    pub fn select(self, names: &[String]) -> Result<Self, ConfigError> {
        let packages = select_packages(self.packages, names)?;
        Ok(Self { packages, ..self })
    }
}

/// Keep only the packages named in `names`, preserving their order. An
/// empty `names` keeps everything.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownArtefact`] for a name that matches no
/// package.
pub fn select_packages(
    packages: Vec<PackageSpec>,
    names: &[String],
) -> Result<Vec<PackageSpec>, ConfigError> {
    if names.is_empty() {
        return Ok(packages);
    }
    if let Some(unknown) = names
        .iter()
        .find(|name| !packages.iter().any(|p| p.name().as_str() == name.as_str()))
    {
        return Err(ConfigError::UnknownArtefact {
            name: unknown.clone(),
        });
    }
    Ok(packages
        .into_iter()
        .filter(|p| names.iter().any(|name| name == p.name().as_str()))
        .collect())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
