//! Filesystem-backed object store.
//!
//! Each bucket is a directory beneath the store root and each object is a
//! file inside it. Metadata lives in a JSON record under
//! `<bucket>/.stowage/<key>.json`. Writes go through a temporary file in the
//! destination directory and are renamed into place, so readers never see a
//! partial object and concurrent writers of the same key leave one complete
//! copy behind.

use super::{
    AccessPolicy, BucketStatus, ObjectLookup, ObjectMetadata, ObjectStore, PutOptions, StoreError,
};
use crate::artefact::Fingerprint;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use tempfile::NamedTempFile;

/// Directory inside each bucket holding object metadata.
const METADATA_DIR: &str = ".stowage";

/// Content type recorded for objects found without metadata.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Metadata record stored beside each object.
#[derive(Debug, Serialize, Deserialize)]
struct ObjectRecord {
    etag: String,
    content_type: String,
    access: AccessPolicy,
    size: u64,
}

/// Object store keeping buckets as directories under a root.
///
/// # Examples
///
/// ```no_run
/// use stowage_publisher::store::{FsObjectStore, ObjectStore, BucketStatus};
///
/// let store = FsObjectStore::new(".stowage-store");
/// if store.head_bucket("artefacts")? == BucketStatus::NotFound {
///     store.create_bucket("artefacts")?;
/// }
/// # Ok::<(), stowage_publisher::store::StoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: Utf8PathBuf,
}

impl FsObjectStore {
    /// Create a store rooted at `root`. The directory is created lazily.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory holding all buckets.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Path of the file holding `key` in `bucket`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the bucket name or key cannot be
    /// mapped onto the filesystem.
    pub fn object_path(&self, bucket: &str, key: &str) -> Result<Utf8PathBuf, StoreError> {
        let segments = key_segments("object_path", key)?;
        Ok(join_all(self.bucket_dir("object_path", bucket)?, &segments))
    }

    fn bucket_dir(&self, operation: &'static str, bucket: &str) -> Result<Utf8PathBuf, StoreError> {
        if bucket.is_empty()
            || bucket.starts_with('.')
            || bucket.contains(['/', '\\'])
            || bucket.chars().any(char::is_whitespace)
        {
            return Err(StoreError::backend(
                operation,
                "InvalidBucketName",
                format!("bucket name \"{bucket}\" is not usable as a directory"),
            ));
        }
        Ok(self.root.join(bucket))
    }

    fn record_path(&self, bucket_dir: &Utf8Path, key: &str) -> Result<Utf8PathBuf, StoreError> {
        let segments = key_segments("record_path", key)?;
        let mut path = join_all(bucket_dir.join(METADATA_DIR), &segments);
        let file_name = format!("{}.json", path.file_name().unwrap_or(key));
        path.set_file_name(file_name);
        Ok(path)
    }

    fn existing_bucket(
        &self,
        operation: &'static str,
        bucket: &str,
    ) -> Result<Utf8PathBuf, StoreError> {
        let dir = self.bucket_dir(operation, bucket)?;
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(StoreError::backend(
                operation,
                "NoSuchBucket",
                format!("bucket {bucket} does not exist"),
            ))
        }
    }
}

/// Split a key into path segments, refusing anything that would escape the
/// bucket or collide with the metadata directory.
fn key_segments<'k>(operation: &'static str, key: &'k str) -> Result<Vec<&'k str>, StoreError> {
    let segments: Vec<&str> = key.split('/').collect();
    let invalid = segments
        .iter()
        .any(|s| s.is_empty() || *s == "." || *s == ".." || s.contains('\\'))
        || segments.first() == Some(&METADATA_DIR);
    if invalid {
        return Err(StoreError::backend(
            operation,
            "InvalidKey",
            format!("key \"{key}\" cannot be stored"),
        ));
    }
    Ok(segments)
}

fn join_all(base: Utf8PathBuf, segments: &[&str]) -> Utf8PathBuf {
    segments.iter().fold(base, |path, segment| path.join(segment))
}

/// Write `contents` to `path` atomically via a sibling temporary file.
fn write_atomically(
    operation: &'static str,
    path: &Utf8Path,
    contents: &[u8],
) -> Result<(), StoreError> {
    let parent = path.parent().unwrap_or(Utf8Path::new("."));
    fs::create_dir_all(parent).map_err(|err| StoreError::io(operation, parent, err))?;
    let mut temp =
        NamedTempFile::new_in(parent).map_err(|err| StoreError::io(operation, parent, err))?;
    temp.write_all(contents)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|err| StoreError::io(operation, path, err))?;
    temp.persist(path)
        .map_err(|err| StoreError::io(operation, path, err.error))?;
    Ok(())
}

fn quoted_etag(body: &[u8]) -> String {
    format!("\"{}\"", Fingerprint::of(body))
}

impl ObjectStore for FsObjectStore {
    fn head_bucket(&self, bucket: &str) -> Result<BucketStatus, StoreError> {
        let dir = self.bucket_dir("head_bucket", bucket)?;
        match fs::read_dir(&dir) {
            Ok(_) => Ok(BucketStatus::Exists),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BucketStatus::NotFound),
            Err(err) if err.kind() == ErrorKind::PermissionDenied => {
                Ok(BucketStatus::AccessDenied)
            }
            Err(err) if err.kind() == ErrorKind::NotADirectory => Err(StoreError::backend(
                "head_bucket",
                "InvalidBucketName",
                format!("{dir} exists but is not a directory"),
            )),
            Err(err) => Err(StoreError::io("head_bucket", dir, err)),
        }
    }

    fn create_bucket(&self, bucket: &str) -> Result<(), StoreError> {
        let dir = self.bucket_dir("create_bucket", bucket)?;
        fs::create_dir_all(&self.root)
            .map_err(|err| StoreError::io("create_bucket", self.root.clone(), err))?;
        match fs::create_dir(&dir) {
            Ok(()) => {
                debug!("created bucket directory {dir}");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                Err(StoreError::BucketAlreadyExists {
                    bucket: bucket.to_owned(),
                })
            }
            Err(err) => Err(StoreError::io("create_bucket", dir, err)),
        }
    }

    fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectLookup, StoreError> {
        let dir = self.existing_bucket("head_object", bucket)?;
        let object = join_all(dir.clone(), &key_segments("head_object", key)?);
        match fs::metadata(&object) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Ok(ObjectLookup::NotFound),
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(ObjectLookup::NotFound),
            Err(err) => return Err(StoreError::io("head_object", object, err)),
        }

        let record_path = self.record_path(&dir, key)?;
        let metadata = match fs::read(&record_path) {
            Ok(raw) => {
                let record: ObjectRecord =
                    serde_json::from_slice(&raw).map_err(|source| StoreError::Metadata {
                        path: record_path.clone(),
                        source,
                    })?;
                ObjectMetadata {
                    etag: record.etag,
                    content_type: record.content_type,
                    size: record.size,
                }
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                let body =
                    fs::read(&object).map_err(|err| StoreError::io("head_object", &object, err))?;
                ObjectMetadata {
                    etag: quoted_etag(&body),
                    content_type: FALLBACK_CONTENT_TYPE.to_owned(),
                    size: body.len() as u64,
                }
            }
            Err(err) => return Err(StoreError::io("head_object", record_path, err)),
        };
        Ok(ObjectLookup::Found(metadata))
    }

    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        options: &PutOptions,
    ) -> Result<(), StoreError> {
        let dir = self.existing_bucket("put_object", bucket)?;
        let object = join_all(dir.clone(), &key_segments("put_object", key)?);
        let record_path = self.record_path(&dir, key)?;
        let record = ObjectRecord {
            etag: quoted_etag(body),
            content_type: options.content_type.clone(),
            access: options.access,
            size: body.len() as u64,
        };
        let encoded =
            serde_json::to_vec_pretty(&record).map_err(|source| StoreError::Metadata {
                path: record_path.clone(),
                source,
            })?;

        // Metadata first: a visible object always has its record.
        write_atomically("put_object", &record_path, &encoded)?;
        write_atomically("put_object", &object, body)?;
        debug!("stored {} bytes at {object}", body.len());
        Ok(())
    }
}

#[cfg(test)]
#[path = "fs_tests.rs"]
mod tests;
