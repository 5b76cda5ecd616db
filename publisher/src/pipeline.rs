//! Package-and-publish orchestration.
//!
//! Ties the stages together in order: provision the bucket, scan the file
//! set, build the archive, publish it. Failures are tagged with the stage
//! and artefact so the caller can report exactly what went wrong.

use crate::artefact::{Archive, KeyPolicy, build_archive};
use crate::config::Deployment;
use crate::error::{PipelineError, Result, Stage};
use crate::package::PackageSpec;
use crate::provision::ensure_bucket;
use crate::publish::{Published, publish_artefact};
use crate::store::ObjectStore;
use camino::Utf8PathBuf;
use log::info;
use stowage_common::{FileEntry, FileSet};

/// Files selected for one package, relative to an absolute root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Absolute root directory.
    pub root: Utf8PathBuf,
    /// Selected files in traversal order.
    pub files: Vec<FileEntry>,
}

/// Resolve the spec's patterns and walk its root.
///
/// # Errors
///
/// Returns [`PublishError::Pattern`](crate::error::PublishError::Pattern)
/// for invalid globs and
/// [`PublishError::Scan`](crate::error::PublishError::Scan) when the root is
/// missing or unreadable.
pub fn select_files(spec: &PackageSpec) -> Result<Selection> {
    let matcher = spec.matcher()?;
    let file_set = FileSet::new(spec.root(), matcher)?;
    info!("{}: base directory {}", spec.name(), file_set.root());
    let files = file_set.iter().collect::<std::result::Result<Vec<_>, _>>()?;
    info!("{}: selected {} files", spec.name(), files.len());
    Ok(Selection {
        root: file_set.root().to_owned(),
        files,
    })
}

/// Scan and package `spec` into an in-memory archive.
///
/// # Errors
///
/// Returns any error from [`select_files`], or
/// [`PublishError::Archive`](crate::error::PublishError::Archive) when no
/// files were selected or the archive cannot be encoded.
pub fn build_artefact(spec: &PackageSpec) -> Result<Archive> {
    let selection = select_files(spec)?;
    Ok(build_archive(&selection.root, &selection.files)?)
}

/// Provision `bucket`, package `spec`, and publish it.
///
/// # Errors
///
/// Returns a [`PipelineError`] naming the artefact and the stage that failed.
pub fn package_and_publish(
    store: &dyn ObjectStore,
    bucket: &str,
    spec: &PackageSpec,
    keys: &KeyPolicy,
) -> std::result::Result<Published, PipelineError> {
    let name = spec.name().as_str();
    ensure_bucket(store, bucket).map_err(|err| PipelineError::new(name, Stage::Provision, err))?;
    let archive = build_package(spec)?;
    publish_artefact(store, bucket, spec.name(), &archive, keys)
        .map_err(|err| PipelineError::new(name, Stage::Publish, err))
}

/// Like [`build_artefact`], but tags failures with the artefact and stage.
///
/// # Errors
///
/// Returns a [`PipelineError`] at [`Stage::Scan`] or [`Stage::Build`].
pub fn build_package(spec: &PackageSpec) -> std::result::Result<Archive, PipelineError> {
    let name = spec.name().as_str();
    let selection =
        select_files(spec).map_err(|err| PipelineError::new(name, Stage::Scan, err))?;
    build_archive(&selection.root, &selection.files)
        .map_err(|err| PipelineError::new(name, Stage::Build, err))
}

/// Publish every artefact of `deployment` in order, stopping at the first
/// failure.
///
/// `on_published` sees each result as soon as it is available. Artefacts
/// published before a failure stay published; nothing is rolled back.
///
/// # Errors
///
/// Returns the first [`PipelineError`] encountered.
pub fn publish_all(
    store: &dyn ObjectStore,
    deployment: &Deployment,
    mut on_published: impl FnMut(&Published),
) -> std::result::Result<Vec<Published>, PipelineError> {
    deployment
        .packages
        .iter()
        .map(|spec| -> std::result::Result<Published, PipelineError> {
            let published =
                package_and_publish(store, &deployment.bucket, spec, &deployment.keys)?;
            on_published(&published);
            Ok(published)
        })
        .collect()
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
