//! Deterministic ZIP archive construction.
//!
//! Building happens in two phases. Every selected file is first staged in
//! memory together with its host permission bits; the staged set is then
//! normalised (see [`super::permissions`]) and only afterwards encoded. Each
//! entry is deflate-compressed with a fixed timestamp, so the same tree
//! always produces byte-identical archives and therefore the same
//! fingerprint.

use super::archive_error::ArchiveError;
use super::fingerprint::Fingerprint;
use super::permissions::{fix_up, host_mode, permission_bits};
use camino::Utf8Path;
use log::{debug, info};
use std::fs;
use std::io::{Cursor, Write};
use stowage_common::FileEntry;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

/// One file stored in an [`Archive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Root-relative name with `/` separators.
    pub name: String,
    /// Normalised permission bits, `0o755` or `0o644`.
    pub mode: u32,
}

/// Immutable ZIP archive bytes plus the entries they contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    bytes: Vec<u8>,
    entries: Vec<ArchiveEntry>,
}

impl Archive {
    /// The encoded archive.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Entries in the order they were written.
    #[must_use]
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// SHA-256 fingerprint of the encoded bytes.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.bytes)
    }

    /// Consume the archive and return the encoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// A file read from disk but not yet normalised or encoded.
struct StagedFile {
    name: String,
    mode: u32,
    contents: Vec<u8>,
}

/// Package `entries` found under `root` into a ZIP archive.
///
/// Entries are written in the order given; callers pass the sorted output of
/// a file set scan.
///
/// # Errors
///
/// Returns [`ArchiveError::EmptyArchive`] when `entries` is empty,
/// [`ArchiveError::Read`] naming the file when a source cannot be read, and
/// [`ArchiveError::Zip`] if encoding fails.
pub fn build_archive(root: &Utf8Path, entries: &[FileEntry]) -> Result<Archive, ArchiveError> {
    if entries.is_empty() {
        return Err(ArchiveError::EmptyArchive);
    }

    info!("building archive of {} files from {root}", entries.len());
    let staged = entries
        .iter()
        .map(|entry| stage(root, entry))
        .collect::<Result<Vec<_>, _>>()?;
    let normalised = staged
        .into_iter()
        .map(|file| StagedFile {
            mode: fix_up(&file.name, file.mode),
            ..file
        })
        .collect::<Vec<_>>();

    encode(normalised)
}

fn stage(root: &Utf8Path, entry: &FileEntry) -> Result<StagedFile, ArchiveError> {
    let path = entry.full_path(root);
    let read_error = |source| ArchiveError::Read {
        path: path.clone(),
        source,
    };
    let metadata = fs::metadata(&path).map_err(read_error)?;
    let contents = fs::read(&path).map_err(read_error)?;
    Ok(StagedFile {
        name: entry.as_str().to_owned(),
        mode: host_mode(&metadata),
        contents,
    })
}

fn encode(files: Vec<StagedFile>) -> Result<Archive, ArchiveError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let mut entries = Vec::with_capacity(files.len());

    for file in files {
        debug!("adding {} ({:o})", file.name, file.mode);
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default())
            .unix_permissions(file.mode);
        writer.start_file(file.name.as_str(), options)?;
        writer.write_all(&file.contents)?;
        entries.push(ArchiveEntry {
            name: file.name,
            mode: file.mode,
        });
    }

    let bytes = writer.finish()?.into_inner();
    Ok(Archive { bytes, entries })
}

/// List the entries of encoded archive `bytes` with their permission bits.
///
/// # Errors
///
/// Returns [`ArchiveError::Zip`] when `bytes` is not a readable ZIP archive.
pub fn read_entries(bytes: &[u8]) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    (0..archive.len())
        .map(|index| -> Result<ArchiveEntry, ArchiveError> {
            let file = archive.by_index(index)?;
            Ok(ArchiveEntry {
                name: file.name().to_owned(),
                mode: file.unix_mode().map_or(0, permission_bits),
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
