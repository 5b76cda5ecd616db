//! Output formatting for the `stowage` CLI.
//!
//! Results go to an injected writer so tests can capture them. Write
//! failures on diagnostic streams are ignored.

use crate::artefact::Archive;
use crate::publish::Published;
use camino::Utf8Path;
use std::io::Write;

/// One line per published artefact: `bucket/key (outcome)`.
///
/// # Example
///
/// ```
/// use stowage_publisher::artefact::{ArtefactName, Fingerprint, KeyPolicy};
/// use stowage_publisher::output::publish_line;
/// use stowage_publisher::publish::{PublishOutcome, PublishResult, Published};
///
/// let fingerprint = Fingerprint::of(b"");
/// let name = ArtefactName::try_from("things").unwrap();
/// let published = Published {
///     location: PublishResult {
///         bucket: "artefacts".to_owned(),
///         key: KeyPolicy::default().object_key(&name, &fingerprint),
///     },
///     outcome: PublishOutcome::Unchanged,
///     fingerprint,
/// };
/// assert!(publish_line(&published).ends_with(".zip (unchanged)"));
/// ```
#[must_use]
pub fn publish_line(published: &Published) -> String {
    format!("{} ({})", published.location, published.outcome)
}

/// Summary of a locally built archive.
#[must_use]
pub fn build_report(path: &Utf8Path, archive: &Archive) -> String {
    let mut report = format!(
        "{path}\n  sha256: {}\n  entries: {}",
        archive.fingerprint(),
        archive.entries().len()
    );
    for entry in archive.entries() {
        report.push_str(&format!("\n    {:o} {}", entry.mode, entry.name));
    }
    report
}

/// Format a closing summary.
#[must_use]
pub fn success_message(count: usize, bucket: &str) -> String {
    let plural = if count == 1 { "artefact" } else { "artefacts" };
    format!("Published {count} {plural} to {bucket}")
}

/// Write `message` and a newline, ignoring failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}
