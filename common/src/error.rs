//! Error types for pattern resolution and file set scanning.
//!
//! Configuration problems are reported through [`PatternError`] and never
//! retried; filesystem traversal problems surface as [`ScanError`] with the
//! path that failed.

use camino::Utf8PathBuf;
use std::path::PathBuf;
use thiserror::Error;

/// Errors arising from user-supplied include/exclude patterns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// The configuration value is neither a string nor a list of strings.
    #[error("invalid file patterns in key '{field}': must be a string or list of strings")]
    InvalidConfiguration {
        /// Name of the configuration key the value came from.
        field: String,
    },

    /// A pattern string could not be compiled as a glob.
    #[error("invalid glob pattern \"{pattern}\": {reason}")]
    InvalidPattern {
        /// The rejected pattern as written by the user.
        pattern: String,
        /// Description of the syntax problem.
        reason: String,
    },
}

/// Errors arising while walking a file set root.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The root directory does not exist or is not a directory.
    #[error("file set root {path} is not an existing directory")]
    RootNotFound {
        /// The root as supplied by the caller.
        path: Utf8PathBuf,
    },

    /// Reading a directory or its entries failed.
    #[error("failed to read {path}")]
    Io {
        /// Directory or file being inspected.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A file name under the root is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    /// The include or exclude patterns could not be compiled.
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

impl ScanError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
