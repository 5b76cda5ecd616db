//! `stowage` CLI entrypoint.
//!
//! Packages configured directories into deterministic ZIP archives and
//! publishes them to a content-addressed object store, or builds the
//! archives locally.

use clap::Parser;
use std::io::Write;
use stowage_publisher::cli::{Cli, Command};
use stowage_publisher::commands::{CommandContext, CommandError, run_build, run_publish};
use stowage_publisher::dirs::{BaseDirs, SystemBaseDirs};
use stowage_publisher::output::write_stderr_line;

/// Stand-in used when the platform reports no home directory.
struct NoHome;

impl BaseDirs for NoHome {
    fn home_dir(&self) -> Option<std::path::PathBuf> {
        None
    }
}

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<(), CommandError> {
    let system_dirs = SystemBaseDirs::new();
    let dirs: &dyn BaseDirs = match &system_dirs {
        Some(dirs) => dirs,
        None => &NoHome,
    };
    let mut context = CommandContext {
        dirs,
        stdout,
        stderr,
        quiet: cli.quiet,
    };

    match &cli.command {
        Command::Publish(args) => run_publish(args, &mut context).map(drop),
        Command::Build(args) => run_build(args, &mut context).map(drop),
    }
}

fn exit_code_for_run_result(result: Result<(), CommandError>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                write_stderr_line(stderr, format!("  caused by: {cause}"));
                source = cause.source();
            }
            1
        }
    }
}
