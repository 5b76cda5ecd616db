//! Error types reported by object stores.

use camino::Utf8PathBuf;
use std::io::ErrorKind;
use thiserror::Error;

/// Service codes that indicate a temporary condition.
const TRANSIENT_CODES: &[&str] = &[
    "InternalError",
    "RequestTimeout",
    "ServiceUnavailable",
    "SlowDown",
];

/// Errors arising from object store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store rejected a request.
    #[error("{operation} failed with {code}: {message}")]
    Backend {
        /// The store call that failed, such as `put_object`.
        operation: &'static str,
        /// Service error code.
        code: String,
        /// Human-readable detail.
        message: String,
    },

    /// A local I/O operation failed.
    #[error("{operation} failed on {path}")]
    Io {
        /// The store call that failed.
        operation: &'static str,
        /// The file or directory involved.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Object metadata could not be encoded or decoded.
    #[error("invalid object metadata at {path}")]
    Metadata {
        /// The metadata record involved.
        path: Utf8PathBuf,
        /// The underlying serialisation failure.
        #[source]
        source: serde_json::Error,
    },

    /// Bucket creation raced with another creator.
    #[error("bucket {bucket} already exists")]
    BucketAlreadyExists {
        /// The bucket that already exists.
        bucket: String,
    },
}

impl StoreError {
    /// Build a [`StoreError::Backend`].
    #[must_use]
    pub fn backend(
        operation: &'static str,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Backend {
            operation,
            code: code.into(),
            message: message.into(),
        }
    }

    pub(crate) fn io(
        operation: &'static str,
        path: impl Into<Utf8PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Returns true when retrying the same call might succeed.
    ///
    /// The publisher never retries on its own; this lets callers decide.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Backend { code, .. } => TRANSIENT_CODES.contains(&code.as_str()),
            Self::Io { source, .. } => matches!(
                source.kind(),
                ErrorKind::Interrupted | ErrorKind::TimedOut | ErrorKind::WouldBlock
            ),
            Self::Metadata { .. } | Self::BucketAlreadyExists { .. } => false,
        }
    }
}
