//! Tests for CLI parsing and default behaviours.

use super::*;
use rstest::rstest;

#[test]
fn publish_parses_defaults() {
    let cli = Cli::parse_from(["stowage", "publish"]);
    let Command::Publish(args) = cli.command else {
        panic!("expected Publish command");
    };
    assert_eq!(args.common.config, Utf8PathBuf::from("stowage.toml"));
    assert!(args.common.artefact.is_empty());
    assert_eq!(args.store_root, Utf8PathBuf::from(".stowage-store"));
    assert!(args.bucket.is_none());
    assert_eq!(cli.verbosity, 0);
    assert!(!cli.quiet);
}

#[test]
fn publish_parses_overrides() {
    let cli = Cli::parse_from([
        "stowage",
        "publish",
        "--config",
        "deploy/stowage.toml",
        "--store-root",
        "/srv/store",
        "--bucket",
        "staging",
        "-a",
        "things",
        "-a",
        "worker",
    ]);
    let Command::Publish(args) = cli.command else {
        panic!("expected Publish command");
    };
    assert_eq!(args.common.config, Utf8PathBuf::from("deploy/stowage.toml"));
    assert_eq!(args.store_root, Utf8PathBuf::from("/srv/store"));
    assert_eq!(args.bucket.as_deref(), Some("staging"));
    assert_eq!(args.common.artefact, vec!["things", "worker"]);
}

#[test]
fn build_requires_output_dir() {
    let result = Cli::try_parse_from(["stowage", "build"]);
    assert!(result.is_err());
}

#[test]
fn build_parses_output_dir_and_prefix() {
    let cli = Cli::parse_from([
        "stowage",
        "build",
        "--output-dir",
        "dist",
        "--key-prefix",
        "fn",
    ]);
    let Command::Build(args) = cli.command else {
        panic!("expected Build command");
    };
    assert_eq!(args.output_dir, Utf8PathBuf::from("dist"));
    assert_eq!(args.key_prefix.as_deref(), Some("fn"));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["stowage"]).is_err());
}

#[test]
fn quiet_conflicts_with_verbose() {
    assert!(Cli::try_parse_from(["stowage", "publish", "-q", "-v"]).is_err());
}

#[rstest]
#[case::default(&["stowage", "publish"], log::LevelFilter::Warn)]
#[case::verbose(&["stowage", "publish", "-v"], log::LevelFilter::Info)]
#[case::very_verbose(&["stowage", "-vv", "publish"], log::LevelFilter::Debug)]
#[case::quiet(&["stowage", "publish", "--quiet"], log::LevelFilter::Error)]
fn log_level_follows_flags(#[case] argv: &[&str], #[case] expected: log::LevelFilter) {
    let cli = Cli::parse_from(argv);
    assert_eq!(cli.log_level(), expected);
}

#[test]
fn default_publish_args_match_parser_defaults() {
    let parsed = match Cli::parse_from(["stowage", "publish"]).command {
        Command::Publish(args) => args,
        Command::Build(_) => panic!("expected Publish command"),
    };
    let defaults = PublishArgs::default();
    assert_eq!(parsed.common.config, defaults.common.config);
    assert_eq!(parsed.store_root, defaults.store_root);
}
