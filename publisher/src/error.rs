//! Error types for packaging and publishing.
//!
//! [`PublishError`] gathers every failure a single operation can hit.
//! [`PipelineError`] wraps it with the artefact being processed and the
//! stage that failed, which is what the CLI reports to the user.

use crate::artefact::{ArchiveError, ArtefactError};
use crate::config::ConfigError;
use crate::store::StoreError;
use std::fmt;
use stowage_common::{PatternError, ScanError};
use thiserror::Error;

/// Errors that can occur while packaging or publishing an artefact.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Include or exclude patterns were malformed.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// The file set could not be scanned.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// An artefact name or fingerprint was invalid.
    #[error(transparent)]
    Artefact(#[from] ArtefactError),

    /// The archive could not be built.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// The object store reported a failure.
    #[error("object store error: {0}")]
    Store(#[from] StoreError),

    /// The bucket exists but the current credentials may not use it.
    #[error("access denied to bucket {bucket}: {detail}")]
    AccessDenied {
        /// The bucket that was checked.
        bucket: String,
        /// Store-supplied detail.
        detail: String,
    },

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PublishError {
    /// Returns true when the failure came from a store condition that may
    /// clear on retry.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Store(err) if err.is_transient())
    }
}

/// Pipeline stage in which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Ensuring the bucket exists.
    Provision,
    /// Resolving patterns and walking the file tree.
    Scan,
    /// Encoding the archive.
    Build,
    /// Checking for and uploading the object.
    Publish,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Provision => "bucket provisioning",
            Self::Scan => "file scan",
            Self::Build => "archive build",
            Self::Publish => "publish",
        };
        f.write_str(label)
    }
}

/// A [`PublishError`] tagged with the artefact and stage that failed.
#[derive(Debug, Error)]
#[error("artefact {name}: {stage} failed: {source}")]
pub struct PipelineError {
    /// Name of the artefact being processed.
    pub name: String,
    /// Stage that failed.
    pub stage: Stage,
    /// The underlying failure.
    #[source]
    pub source: PublishError,
}

impl PipelineError {
    /// Attach artefact and stage context to `source`.
    pub fn new(name: impl Into<String>, stage: Stage, source: impl Into<PublishError>) -> Self {
        Self {
            name: name.into(),
            stage,
            source: source.into(),
        }
    }
}

/// Result type alias using [`PublishError`].
pub type Result<T> = std::result::Result<T, PublishError>;
