//! Object store abstraction.
//!
//! The publisher talks to remote storage only through [`ObjectStore`], a
//! narrow blocking interface modelled on the bucket and object calls of
//! S3-compatible services. [`fs::FsObjectStore`] keeps buckets on a local
//! filesystem; the in-memory store backs tests.

pub mod error;
pub mod fs;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;

pub use error::StoreError;
pub use fs::FsObjectStore;
#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryObjectStore;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Content type used for published archives.
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// Result of probing a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketStatus {
    /// The bucket exists and is reachable with the current credentials.
    Exists,
    /// No bucket by that name exists.
    NotFound,
    /// The bucket exists but the caller may not use it.
    AccessDenied,
}

/// Metadata reported for a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// Entity tag as reported by the store, usually a quoted hex digest.
    pub etag: String,
    /// Stored content type.
    pub content_type: String,
    /// Object size in bytes.
    pub size: u64,
}

/// Result of probing an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectLookup {
    /// The object exists.
    Found(ObjectMetadata),
    /// No object is stored under the key.
    NotFound,
}

/// Canned access policies applied to uploaded objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessPolicy {
    /// Only the owner may read the object.
    Private,
    /// Any authenticated principal may read the object.
    AuthenticatedRead,
}

impl AccessPolicy {
    /// The canned ACL name understood by S3-compatible stores.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::AuthenticatedRead => "authenticated-read",
        }
    }
}

impl fmt::Display for AccessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes attached to an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutOptions {
    /// MIME type of the body.
    pub content_type: String,
    /// Access policy for readers.
    pub access: AccessPolicy,
}

impl PutOptions {
    /// Options used for every published archive.
    #[must_use]
    pub fn zip_archive() -> Self {
        Self {
            content_type: ZIP_CONTENT_TYPE.to_owned(),
            access: AccessPolicy::AuthenticatedRead,
        }
    }
}

/// Blocking interface to a bucket-and-key object store.
///
/// Implementations report "not found" as a value rather than an error so
/// that callers can branch on it; every other failure is a [`StoreError`].
#[cfg_attr(test, mockall::automock)]
pub trait ObjectStore {
    /// Check whether `bucket` exists and is accessible.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be queried.
    fn head_bucket(&self, bucket: &str) -> Result<BucketStatus, StoreError>;

    /// Create `bucket`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BucketAlreadyExists`] when the bucket appeared
    /// concurrently, or another error when creation fails.
    fn create_bucket(&self, bucket: &str) -> Result<(), StoreError>;

    /// Fetch metadata for `key` in `bucket`.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than a missing object.
    fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectLookup, StoreError>;

    /// Store `body` under `key` in `bucket`.
    ///
    /// # Errors
    ///
    /// Returns an error when the upload fails.
    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        options: &PutOptions,
    ) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zip_archive_options_use_authenticated_read() {
        let options = PutOptions::zip_archive();
        assert_eq!(options.content_type, "application/zip");
        assert_eq!(options.access.to_string(), "authenticated-read");
    }

    #[test]
    fn access_policy_serialises_as_canned_acl() {
        let json = serde_json::to_string(&AccessPolicy::AuthenticatedRead).expect("serialise");
        assert_eq!(json, "\"authenticated-read\"");
    }
}
