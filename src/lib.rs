//! Deterministic ZIP packaging and content-addressed artefact publishing.
//!
//! `stowage` turns a directory into a reproducible ZIP archive and publishes
//! it to an object store under a key derived from the archive's SHA-256
//! fingerprint. Publishing the same tree twice uploads once.
//!
//! The work is split across two crates re-exported here:
//!
//! - [`stowage_common`] resolves include/exclude patterns and walks file
//!   sets.
//! - [`stowage_publisher`] builds archives, provisions buckets and publishes
//!   them through the [`ObjectStore`] seam.
//!
//! # Examples
//!
//! ```no_run
//! use stowage::{ArtefactName, FsObjectStore, KeyPolicy, PackageSpec, package_and_publish};
//!
//! let store = FsObjectStore::new(".stowage-store");
//! let name = ArtefactName::try_from("things").unwrap();
//! let spec = PackageSpec::new(name, "lambda/things")
//!     .with_exclude(vec!["*.pyc".to_owned()]);
//! let published = package_and_publish(&store, "deploy-bucket", &spec, &KeyPolicy::default())
//!     .unwrap();
//! println!("{} ({})", published.location, published.outcome);
//! ```

pub use stowage_common::{
    BUILTIN_EXCLUDES, DEFAULT_EXCLUDE, DEFAULT_INCLUDE, FileEntry, FileSet, FileSetIter,
    GlobMatcher, PatternError, PatternInput, ScanError, resolve_patterns, scan,
};
pub use stowage_publisher::artefact::{
    Archive, ArchiveEntry, ArchiveError, ArtefactName, DEFAULT_KEY_PREFIX, Fingerprint, KeyPolicy,
    ObjectKey, build_archive, read_entries,
};
pub use stowage_publisher::config::{Deployment, StowageConfig};
pub use stowage_publisher::store::{
    AccessPolicy, BucketStatus, FsObjectStore, ObjectLookup, ObjectMetadata, ObjectStore,
    PutOptions, StoreError,
};
pub use stowage_publisher::{
    BucketProvision, PackageSpec, PipelineError, PublishError, PublishOutcome, PublishResult,
    Published, Stage, build_artefact, ensure_bucket, package_and_publish, publish_all,
    publish_artefact,
};
