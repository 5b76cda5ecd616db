//! CLI argument definitions for the `stowage` binary.
//!
//! Kept apart from the entrypoint so the argument surface can be tested
//! without running any commands.

use crate::config::DEFAULT_CONFIG_FILE;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Store root used by `publish` when none is given.
pub const DEFAULT_STORE_ROOT: &str = ".stowage-store";

/// Package directories into deterministic ZIP archives and publish them.
#[derive(Parser, Debug)]
#[command(name = "stowage")]
#[command(version, about)]
#[command(long_about = concat!(
    "Package directories into deterministic ZIP archives and publish them.\n\n",
    "Each configured artefact is scanned with its include and exclude patterns, ",
    "zipped with normalised permissions and a fixed timestamp, and stored under ",
    "a key containing the SHA-256 of the archive. Publishing the same tree twice ",
    "uploads nothing the second time.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Publish every artefact in stowage.toml:\n",
    "    $ stowage publish\n\n",
    "  Publish one artefact into another bucket:\n",
    "    $ stowage publish -a things --bucket staging-artefacts\n\n",
    "  Build archives locally without publishing:\n",
    "    $ stowage build --output-dir dist\n",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Provision the bucket and publish artefacts.
    Publish(PublishArgs),

    /// Build archives into a local directory.
    Build(BuildArgs),
}

/// Options shared by every subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CommonArgs {
    /// Configuration file.
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config: Utf8PathBuf,

    /// Only process the named artefact (can be repeated).
    #[arg(short, long, value_name = "NAME")]
    pub artefact: Vec<String>,
}

impl Default for CommonArgs {
    fn default() -> Self {
        Self {
            config: Utf8PathBuf::from(DEFAULT_CONFIG_FILE),
            artefact: Vec::new(),
        }
    }
}

/// Arguments for the publish command.
#[derive(Parser, Debug, Clone)]
pub struct PublishArgs {
    /// Configuration and artefact selection.
    #[command(flatten)]
    pub common: CommonArgs,

    /// Directory holding the filesystem object store.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_STORE_ROOT)]
    pub store_root: Utf8PathBuf,

    /// Override the bucket named in the configuration.
    #[arg(short, long, value_name = "NAME")]
    pub bucket: Option<String>,
}

impl Default for PublishArgs {
    fn default() -> Self {
        Self {
            common: CommonArgs::default(),
            store_root: Utf8PathBuf::from(DEFAULT_STORE_ROOT),
            bucket: None,
        }
    }
}

/// Arguments for the build command.
#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    /// Configuration and artefact selection.
    #[command(flatten)]
    pub common: CommonArgs,

    /// Directory receiving the archives.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Utf8PathBuf,

    /// Key prefix for archive file names [default: from configuration].
    #[arg(long, value_name = "PREFIX")]
    pub key_prefix: Option<String>,
}

impl Cli {
    /// The most verbose log level requested.
    #[must_use]
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Error;
        }
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
