//! Bucket provisioning.
//!
//! Publishing assumes its bucket exists. [`ensure_bucket`] checks the bucket
//! and creates it when missing, treating a concurrent creator as success.

use crate::error::{PublishError, Result};
use crate::store::{BucketStatus, ObjectStore, StoreError};
use log::{debug, error, info};

/// What [`ensure_bucket`] found or did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketProvision {
    /// The bucket was already present.
    Existing,
    /// The bucket was created by this call.
    Created,
}

/// Make sure `bucket` exists and is usable.
///
/// # Errors
///
/// Returns [`PublishError::AccessDenied`] when the bucket exists but may not
/// be used (no creation is attempted), or [`PublishError::Store`] for any
/// other store failure.
pub fn ensure_bucket(store: &dyn ObjectStore, bucket: &str) -> Result<BucketProvision> {
    match store.head_bucket(bucket)? {
        BucketStatus::Exists => {
            debug!("bucket {bucket} exists");
            Ok(BucketProvision::Existing)
        }
        BucketStatus::NotFound => create(store, bucket),
        BucketStatus::AccessDenied => {
            error!("access denied to bucket {bucket}; check credentials and bucket ownership");
            Err(PublishError::AccessDenied {
                bucket: bucket.to_owned(),
                detail: "bucket exists but is not accessible with the current credentials"
                    .to_owned(),
            })
        }
    }
}

fn create(store: &dyn ObjectStore, bucket: &str) -> Result<BucketProvision> {
    info!("bucket {bucket} not found, creating it");
    match store.create_bucket(bucket) {
        Ok(()) => Ok(BucketProvision::Created),
        Err(StoreError::BucketAlreadyExists { .. }) => {
            debug!("bucket {bucket} was created concurrently");
            Ok(BucketProvision::Existing)
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockObjectStore;
    use mockall::predicate::eq;
    use rstest::rstest;

    fn store_with_status(status: BucketStatus) -> MockObjectStore {
        let mut store = MockObjectStore::new();
        store
            .expect_head_bucket()
            .with(eq("artefacts"))
            .times(1)
            .returning(move |_| Ok(status));
        store
    }

    #[rstest]
    fn existing_bucket_is_left_alone() {
        let mut store = store_with_status(BucketStatus::Exists);
        store.expect_create_bucket().never();

        let outcome = ensure_bucket(&store, "artefacts").expect("bucket exists");
        assert_eq!(outcome, BucketProvision::Existing);
    }

    #[rstest]
    fn missing_bucket_is_created() {
        let mut store = store_with_status(BucketStatus::NotFound);
        store
            .expect_create_bucket()
            .with(eq("artefacts"))
            .times(1)
            .returning(|_| Ok(()));

        let outcome = ensure_bucket(&store, "artefacts").expect("bucket created");
        assert_eq!(outcome, BucketProvision::Created);
    }

    #[rstest]
    fn concurrent_creation_counts_as_success() {
        let mut store = store_with_status(BucketStatus::NotFound);
        store.expect_create_bucket().times(1).returning(|bucket| {
            Err(StoreError::BucketAlreadyExists {
                bucket: bucket.to_owned(),
            })
        });

        let outcome = ensure_bucket(&store, "artefacts").expect("race tolerated");
        assert_eq!(outcome, BucketProvision::Existing);
    }

    #[rstest]
    fn access_denied_fails_without_creating() {
        let mut store = store_with_status(BucketStatus::AccessDenied);
        store.expect_create_bucket().never();

        let err = ensure_bucket(&store, "artefacts").expect_err("access denied");
        assert!(matches!(err, PublishError::AccessDenied { ref bucket, .. } if bucket == "artefacts"));
    }

    #[rstest]
    fn lookup_failures_propagate_unchanged() {
        let mut store = MockObjectStore::new();
        store
            .expect_head_bucket()
            .returning(|_| Err(StoreError::backend("head_bucket", "InternalError", "boom")));
        store.expect_create_bucket().never();

        let err = ensure_bucket(&store, "artefacts").expect_err("lookup failed");
        assert!(matches!(
            err,
            PublishError::Store(StoreError::Backend { ref code, .. }) if code == "InternalError"
        ));
    }

    #[rstest]
    fn creation_failures_propagate() {
        let mut store = store_with_status(BucketStatus::NotFound);
        store
            .expect_create_bucket()
            .returning(|_| Err(StoreError::backend("create_bucket", "InvalidBucketName", "bad")));

        let err = ensure_bucket(&store, "artefacts").expect_err("creation failed");
        assert!(matches!(err, PublishError::Store(_)));
    }
}
