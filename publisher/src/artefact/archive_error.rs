//! Error types for archive building and inspection.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors arising while building or reading an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The file list was empty, so there is nothing to package.
    #[error("empty archive: no files were selected for packaging")]
    EmptyArchive,

    /// A selected file could not be read.
    #[error("failed to read {path} while building archive")]
    Read {
        /// Absolute path of the file that failed.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Writing archive bytes failed.
    #[error("I/O error while writing archive: {0}")]
    Io(#[from] std::io::Error),

    /// The ZIP encoder or decoder reported an error.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}
