//! Stowage publisher library.
//!
//! Packages a directory tree into a deterministic ZIP archive and publishes
//! it under a content-addressed key, uploading only when the store does not
//! already hold the same bytes. It backs the `stowage` CLI binary and can be
//! used programmatically with any [`store::ObjectStore`].
//!
//! # Modules
//!
//! - [`artefact`] - Names, fingerprints, object keys, and archive building
//! - [`cli`] - Command-line argument definitions
//! - [`commands`] - Subcommand implementations
//! - [`config`] - TOML deployment configuration
//! - [`dirs`] - Directory resolution abstraction for `~` expansion
//! - [`error`] - Publish and pipeline error types
//! - [`output`] - CLI output formatting
//! - [`package`] - Package specifications
//! - [`pipeline`] - Provision, scan, build, publish orchestration
//! - [`provision`] - Bucket provisioning
//! - [`publish`] - Content-addressed, idempotent publishing
//! - [`store`] - Object store abstraction and implementations

pub mod artefact;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dirs;
pub mod error;
pub mod output;
pub mod package;
pub mod pipeline;
pub mod provision;
pub mod publish;
pub mod store;

pub use error::{PipelineError, PublishError, Stage};
pub use package::PackageSpec;
pub use pipeline::{build_artefact, package_and_publish, publish_all};
pub use provision::{BucketProvision, ensure_bucket};
pub use publish::{PublishOutcome, PublishResult, Published, publish_artefact};
