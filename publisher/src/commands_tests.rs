//! Unit tests for the CLI commands.

use super::*;
use crate::cli::CommonArgs;
use crate::dirs::MockBaseDirs;
use crate::publish::PublishOutcome;
use rstest::{fixture, rstest};
use std::fs;
use tempfile::TempDir;

struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    fn config(&self) -> Utf8PathBuf {
        self.root.join("stowage.toml")
    }

    fn publish_args(&self) -> PublishArgs {
        PublishArgs {
            common: CommonArgs {
                config: self.config(),
                artefact: Vec::new(),
            },
            store_root: self.root.join("store"),
            bucket: None,
        }
    }
}

#[fixture]
fn workspace() -> Workspace {
    let dir = TempDir::new().expect("temp dir creation succeeds");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp dir");
    for file in ["things/handler.py", "things/handler.pyc", "worker/main.js"] {
        let path = root.join(file);
        fs::create_dir_all(path.parent().expect("has parent")).expect("mkdir");
        fs::write(&path, file).expect("write");
    }
    let config = format!(
        concat!(
            "bucket = \"artefacts\"\n",
            "[[artefact]]\nname = \"things\"\npath = \"{root}/things\"\nexclude = \"*.pyc\"\n",
            "[[artefact]]\nname = \"worker\"\npath = \"{root}/worker\"\n",
        ),
        root = root
    );
    fs::write(root.join("stowage.toml"), config).expect("write config");
    Workspace { _dir: dir, root }
}

fn no_home() -> MockBaseDirs {
    let mut dirs = MockBaseDirs::new();
    dirs.expect_home_dir().never();
    dirs
}

struct Captured {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl Captured {
    fn new() -> Self {
        Self {
            stdout: Vec::new(),
            stderr: Vec::new(),
        }
    }

    fn stdout(&self) -> String {
        String::from_utf8(self.stdout.clone()).expect("utf8 stdout")
    }

    fn stderr(&self) -> String {
        String::from_utf8(self.stderr.clone()).expect("utf8 stderr")
    }
}

fn publish(
    args: &PublishArgs,
    captured: &mut Captured,
    quiet: bool,
) -> Result<Vec<Published>, CommandError> {
    let dirs = no_home();
    let mut context = CommandContext {
        dirs: &dirs,
        stdout: &mut captured.stdout,
        stderr: &mut captured.stderr,
        quiet,
    };
    run_publish(args, &mut context)
}

#[rstest]
fn publish_reports_each_artefact(workspace: Workspace) {
    let mut captured = Captured::new();
    let published = publish(&workspace.publish_args(), &mut captured, false).expect("publish");

    assert_eq!(published.len(), 2);
    let stdout = captured.stdout();
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("artefacts/lambda-things-"));
    assert!(lines[0].ends_with(".zip (uploaded)"));
    assert!(lines[1].starts_with("artefacts/lambda-worker-"));
    assert!(captured.stderr().contains("Published 2 artefacts to artefacts"));
}

#[rstest]
fn second_publish_is_unchanged(workspace: Workspace) {
    let args = workspace.publish_args();
    publish(&args, &mut Captured::new(), true).expect("first publish");

    let mut captured = Captured::new();
    let published = publish(&args, &mut captured, true).expect("second publish");

    assert!(
        published
            .iter()
            .all(|p| p.outcome == PublishOutcome::Unchanged)
    );
    assert!(captured.stdout().lines().all(|line| line.ends_with("(unchanged)")));
    assert!(captured.stderr().is_empty());
}

#[rstest]
fn artefact_filter_limits_publishing(workspace: Workspace) {
    let mut args = workspace.publish_args();
    args.common.artefact = vec!["worker".to_owned()];
    args.bucket = Some("staging".to_owned());

    let published = publish(&args, &mut Captured::new(), true).expect("publish");
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].location.bucket, "staging");
    assert!(workspace.root.join("store/staging").is_dir());
}

#[rstest]
fn unknown_artefact_is_a_config_error(workspace: Workspace) {
    let mut args = workspace.publish_args();
    args.common.artefact = vec!["ghost".to_owned()];

    let err = publish(&args, &mut Captured::new(), true).expect_err("unknown artefact");
    assert!(matches!(
        err,
        CommandError::Config(ConfigError::UnknownArtefact { .. })
    ));
}

#[rstest]
fn build_writes_archives_named_by_key(workspace: Workspace) {
    let output_dir = workspace.root.join("dist");
    let args = BuildArgs {
        common: CommonArgs {
            config: workspace.config(),
            artefact: vec!["things".to_owned()],
        },
        output_dir: output_dir.clone(),
        key_prefix: Some("fn".to_owned()),
    };
    let dirs = no_home();
    let mut captured = Captured::new();
    let mut context = CommandContext {
        dirs: &dirs,
        stdout: &mut captured.stdout,
        stderr: &mut captured.stderr,
        quiet: false,
    };

    let written = run_build(&args, &mut context).expect("build");

    assert_eq!(written.len(), 1);
    let file_name = written[0].file_name().expect("file name");
    assert!(file_name.starts_with("fn-things-"));
    assert!(written[0].starts_with(&output_dir));
    let entries = crate::artefact::read_entries(&fs::read(&written[0]).expect("archive"))
        .expect("readable");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "handler.py");
    assert!(captured.stdout().contains("sha256: "));
    assert!(captured.stderr().contains("Built 1 archive(s)"));
}
