//! Artefact identity and packaging.
//!
//! # Sub-modules
//!
//! - [`archive`] - Deterministic ZIP construction (`build_archive`).
//! - [`archive_error`] - Error types for archive building.
//! - [`error`] - Validation errors for names and fingerprints.
//! - [`fingerprint`] - SHA-256 content fingerprint newtype (`Fingerprint`).
//! - [`name`] - Artefact name newtype (`ArtefactName`).
//! - [`naming`] - Content-addressed object keys (`KeyPolicy`, `ObjectKey`).
//! - [`permissions`] - Permission normalisation for archive entries.

pub mod archive;
pub mod archive_error;
pub mod error;
pub mod fingerprint;
pub mod name;
pub mod naming;
pub mod permissions;

pub use archive::{Archive, ArchiveEntry, build_archive, read_entries};
pub use archive_error::ArchiveError;
pub use error::ArtefactError;
pub use fingerprint::Fingerprint;
pub use name::ArtefactName;
pub use naming::{DEFAULT_KEY_PREFIX, KeyPolicy, ObjectKey};
