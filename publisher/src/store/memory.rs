//! In-memory object store for tests.
//!
//! Behaves like a well-mannered remote store: quoted SHA-256 entity tags,
//! per-bucket objects, and a count of uploads so that tests can assert on
//! idempotence. Bucket lookups can be forced to report a status, and stored
//! tags can be overwritten to simulate drift.

use super::{BucketStatus, ObjectLookup, ObjectMetadata, ObjectStore, PutOptions, StoreError};
use crate::artefact::Fingerprint;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

/// An object held by [`MemoryObjectStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object bytes.
    pub body: Vec<u8>,
    /// Entity tag reported by `head_object`.
    pub etag: String,
    /// Options supplied at upload.
    pub options: PutOptions,
}

/// A single-threaded in-memory [`ObjectStore`].
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    buckets: RefCell<BTreeSet<String>>,
    objects: RefCell<BTreeMap<(String, String), StoredObject>>,
    forced_status: RefCell<BTreeMap<String, BucketStatus>>,
    uploads: Cell<usize>,
    bucket_creations: Cell<usize>,
}

impl MemoryObjectStore {
    /// Create an empty store with no buckets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `bucket`.
    #[must_use]
    pub fn with_bucket(bucket: &str) -> Self {
        let store = Self::new();
        store.buckets.borrow_mut().insert(bucket.to_owned());
        store
    }

    /// Make `head_bucket` report `status` for `bucket` regardless of state.
    pub fn force_bucket_status(&self, bucket: &str, status: BucketStatus) {
        self.forced_status
            .borrow_mut()
            .insert(bucket.to_owned(), status);
    }

    /// Replace the entity tag of an existing object.
    ///
    /// # Panics
    ///
    /// Panics if the object does not exist.
    pub fn set_etag(&self, bucket: &str, key: &str, etag: &str) {
        let mut objects = self.objects.borrow_mut();
        let object = objects
            .get_mut(&(bucket.to_owned(), key.to_owned()))
            .unwrap_or_else(|| panic!("no object {bucket}/{key}"));
        etag.clone_into(&mut object.etag);
    }

    /// Look up a stored object.
    #[must_use]
    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .borrow()
            .get(&(bucket.to_owned(), key.to_owned()))
            .cloned()
    }

    /// Keys stored in `bucket`, sorted.
    #[must_use]
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.objects
            .borrow()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, key)| key.clone())
            .collect()
    }

    /// Returns true when `bucket` has been created.
    #[must_use]
    pub fn has_bucket(&self, bucket: &str) -> bool {
        self.buckets.borrow().contains(bucket)
    }

    /// Number of successful `put_object` calls.
    #[must_use]
    pub fn upload_count(&self) -> usize {
        self.uploads.get()
    }

    /// Number of successful `create_bucket` calls.
    #[must_use]
    pub fn bucket_creation_count(&self) -> usize {
        self.bucket_creations.get()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn head_bucket(&self, bucket: &str) -> Result<BucketStatus, StoreError> {
        if let Some(status) = self.forced_status.borrow().get(bucket) {
            return Ok(*status);
        }
        Ok(if self.has_bucket(bucket) {
            BucketStatus::Exists
        } else {
            BucketStatus::NotFound
        })
    }

    fn create_bucket(&self, bucket: &str) -> Result<(), StoreError> {
        if !self.buckets.borrow_mut().insert(bucket.to_owned()) {
            return Err(StoreError::BucketAlreadyExists {
                bucket: bucket.to_owned(),
            });
        }
        self.bucket_creations.set(self.bucket_creations.get() + 1);
        Ok(())
    }

    fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectLookup, StoreError> {
        if !self.has_bucket(bucket) {
            return Err(StoreError::backend(
                "head_object",
                "NoSuchBucket",
                format!("bucket {bucket} does not exist"),
            ));
        }
        Ok(match self.object(bucket, key) {
            Some(object) => ObjectLookup::Found(ObjectMetadata {
                etag: object.etag,
                content_type: object.options.content_type,
                size: object.body.len() as u64,
            }),
            None => ObjectLookup::NotFound,
        })
    }

    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        options: &PutOptions,
    ) -> Result<(), StoreError> {
        if !self.has_bucket(bucket) {
            return Err(StoreError::backend(
                "put_object",
                "NoSuchBucket",
                format!("bucket {bucket} does not exist"),
            ));
        }
        self.objects.borrow_mut().insert(
            (bucket.to_owned(), key.to_owned()),
            StoredObject {
                body: body.to_vec(),
                etag: format!("\"{}\"", Fingerprint::of(body)),
                options: options.clone(),
            },
        );
        self.uploads.set(self.uploads.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uploads_are_counted_and_tagged() {
        let store = MemoryObjectStore::with_bucket("b");
        store
            .put_object("b", "k", b"body", &PutOptions::zip_archive())
            .expect("upload");

        assert_eq!(store.upload_count(), 1);
        let ObjectLookup::Found(meta) = store.head_object("b", "k").expect("head request") else {
            panic!("object should exist");
        };
        assert!(Fingerprint::of(b"body").matches_tag(&meta.etag));
        assert_eq!(store.keys("b"), vec!["k".to_owned()]);
    }

    #[test]
    fn forced_status_overrides_state() {
        let store = MemoryObjectStore::with_bucket("b");
        store.force_bucket_status("b", BucketStatus::AccessDenied);
        assert_eq!(
            store.head_bucket("b").expect("head request"),
            BucketStatus::AccessDenied
        );
    }

    #[test]
    fn duplicate_creation_is_reported() {
        let store = MemoryObjectStore::new();
        store.create_bucket("b").expect("first creation");
        let err = store.create_bucket("b").expect_err("second creation");
        assert!(matches!(err, StoreError::BucketAlreadyExists { .. }));
        assert_eq!(store.bucket_creation_count(), 1);
    }
}
