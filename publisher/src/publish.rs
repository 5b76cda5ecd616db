//! Content-addressed, idempotent publishing.
//!
//! An archive is stored under a key derived from its SHA-256 fingerprint, so
//! a key that already exists with a matching tag already holds these exact
//! bytes and the upload is skipped. A key that exists with a different tag is
//! never overwritten: the mismatch is logged and reported to the caller.

use crate::artefact::{Archive, ArtefactName, Fingerprint, KeyPolicy, ObjectKey};
use crate::error::Result;
use crate::store::{ObjectLookup, ObjectStore, PutOptions};
use log::{debug, info, warn};
use std::fmt;

/// Where a published archive lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublishResult {
    /// Bucket holding the archive.
    pub bucket: String,
    /// Content-addressed key of the archive.
    pub key: ObjectKey,
}

impl fmt::Display for PublishResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// What [`publish_artefact`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The archive was uploaded.
    Uploaded,
    /// An identical archive was already stored; nothing was sent.
    Unchanged,
    /// An object with this key exists but its tag differs from the
    /// fingerprint. The object was left untouched.
    Mismatched {
        /// The tag reported by the store.
        remote_tag: String,
    },
}

impl fmt::Display for PublishOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uploaded => f.write_str("uploaded"),
            Self::Unchanged => f.write_str("unchanged"),
            Self::Mismatched { .. } => f.write_str("fingerprint mismatch"),
        }
    }
}

/// A [`PublishResult`] together with the [`PublishOutcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    /// Where the archive lives.
    pub location: PublishResult,
    /// Whether bytes were sent.
    pub outcome: PublishOutcome,
    /// Fingerprint of the archive.
    pub fingerprint: Fingerprint,
}

/// Publish `archive` for `name` into `bucket` under its content-addressed
/// key.
///
/// Publishing is idempotent: calling it again with the same archive sends
/// nothing and returns the same location.
///
/// # Errors
///
/// Returns [`PublishError::Store`](crate::error::PublishError::Store) when
/// the existence check or the upload fails.
pub fn publish_artefact(
    store: &dyn ObjectStore,
    bucket: &str,
    name: &ArtefactName,
    archive: &Archive,
    keys: &KeyPolicy,
) -> Result<Published> {
    let fingerprint = archive.fingerprint();
    debug!("fingerprint of {name}: {fingerprint}");
    let key = keys.object_key(name, &fingerprint);

    let outcome = match store.head_object(bucket, key.as_str())? {
        ObjectLookup::NotFound => {
            info!("uploading {name} to {bucket}/{key}");
            store.put_object(
                bucket,
                key.as_str(),
                archive.bytes(),
                &PutOptions::zip_archive(),
            )?;
            PublishOutcome::Uploaded
        }
        ObjectLookup::Found(meta) if fingerprint.matches_tag(&meta.etag) => {
            info!("{bucket}/{key} already holds this archive, skipping upload");
            PublishOutcome::Unchanged
        }
        ObjectLookup::Found(meta) => {
            warn!(
                "{bucket}/{key} exists with tag {} which does not match fingerprint {fingerprint}; \
                 leaving it untouched",
                meta.etag
            );
            PublishOutcome::Mismatched {
                remote_tag: meta.etag,
            }
        }
    };

    Ok(Published {
        location: PublishResult {
            bucket: bucket.to_owned(),
            key,
        },
        outcome,
        fingerprint,
    })
}

#[cfg(test)]
#[path = "publish_tests.rs"]
mod tests;
