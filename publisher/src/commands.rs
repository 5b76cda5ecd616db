//! Subcommand implementations for the `stowage` binary.
//!
//! Each command takes its parsed arguments, a [`BaseDirs`] for `~`
//! expansion, and the writers to report on, so the whole command can run in
//! tests against temporary directories.

use crate::artefact::KeyPolicy;
use crate::cli::{BuildArgs, PublishArgs};
use crate::config::{ConfigError, StowageConfig, select_packages};
use crate::dirs::BaseDirs;
use crate::error::PipelineError;
use crate::output::{build_report, publish_line, success_message, write_stderr_line};
use crate::pipeline::{build_package, publish_all};
use crate::publish::Published;
use crate::store::FsObjectStore;
use camino::Utf8PathBuf;
use log::{info, warn};
use std::io::Write;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An artefact failed to package or publish.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// A built archive could not be written.
    #[error("failed to write {path}")]
    WriteArchive {
        /// Destination path.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Results could not be written to the output stream.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Writers and flags shared by the commands.
pub struct CommandContext<'a> {
    /// Source of the home directory.
    pub dirs: &'a dyn BaseDirs,
    /// Receives one result line per artefact.
    pub stdout: &'a mut dyn Write,
    /// Receives progress messages.
    pub stderr: &'a mut dyn Write,
    /// Suppress progress messages.
    pub quiet: bool,
}

/// Publish the selected artefacts into a filesystem object store.
///
/// # Errors
///
/// Returns [`CommandError::Config`] for configuration problems,
/// [`CommandError::Pipeline`] for the first artefact that fails, and
/// [`CommandError::WriteFailed`] when results cannot be written.
pub fn run_publish(
    args: &PublishArgs,
    context: &mut CommandContext<'_>,
) -> Result<Vec<Published>, CommandError> {
    let config = StowageConfig::load(&args.common.config)?;
    let deployment = config
        .deployment(context.dirs, args.bucket.as_deref())?
        .select(&args.common.artefact)?;
    if deployment.packages.is_empty() {
        warn!("no artefacts configured in {}", args.common.config);
        return Ok(Vec::new());
    }

    info!("publishing to bucket {} in {}", deployment.bucket, args.store_root);
    let store = FsObjectStore::new(args.store_root.clone());
    let mut write_error = None;
    let published = publish_all(&store, &deployment, |result| {
        if let Err(source) = writeln!(context.stdout, "{}", publish_line(result)) {
            write_error.get_or_insert(source);
        }
    })?;
    if let Some(source) = write_error {
        return Err(CommandError::WriteFailed { source });
    }

    if !context.quiet {
        write_stderr_line(
            context.stderr,
            success_message(published.len(), &deployment.bucket),
        );
    }
    Ok(published)
}

/// Build the selected archives into `args.output_dir`.
///
/// Archives are named by their object key, so the directory can later be
/// synchronised to a bucket verbatim.
///
/// # Errors
///
/// Returns [`CommandError::Config`] for configuration problems,
/// [`CommandError::Pipeline`] when an artefact fails to build, and the write
/// errors when archives or results cannot be written.
pub fn run_build(
    args: &BuildArgs,
    context: &mut CommandContext<'_>,
) -> Result<Vec<Utf8PathBuf>, CommandError> {
    let config = StowageConfig::load(&args.common.config)?;
    let keys = args
        .key_prefix
        .as_deref()
        .map_or_else(|| config.key_policy(), KeyPolicy::with_prefix);
    let packages = select_packages(config.package_specs(context.dirs)?, &args.common.artefact)?;

    std::fs::create_dir_all(&args.output_dir).map_err(|source| CommandError::WriteArchive {
        path: args.output_dir.clone(),
        source,
    })?;

    let mut written = Vec::with_capacity(packages.len());
    for spec in &packages {
        let archive = build_package(spec)?;
        let key = keys.object_key(spec.name(), &archive.fingerprint());
        let path = args.output_dir.join(key.as_str());
        std::fs::write(&path, archive.bytes()).map_err(|source| CommandError::WriteArchive {
            path: path.clone(),
            source,
        })?;
        writeln!(context.stdout, "{}", build_report(&path, &archive))
            .map_err(|source| CommandError::WriteFailed { source })?;
        written.push(path);
    }

    if !context.quiet {
        write_stderr_line(
            context.stderr,
            format!("Built {} archive(s) in {}", written.len(), args.output_dir),
        );
    }
    Ok(written)
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
