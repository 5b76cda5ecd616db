//! Permission normalisation for archive entries.
//!
//! Archives only ever carry two modes: `0o755` for anything the owner can
//! execute and `0o644` for everything else. Collapsing host modes this way
//! keeps the archive independent of umask and checkout quirks while making
//! sure executables still run once extracted.

use log::debug;

/// The rwxrwxrwx bits of a Unix mode.
pub const PERMISSION_BITS: u32 = 0o777;

/// Mode stored for owner-executable files.
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Mode stored for all other files.
pub const REGULAR_MODE: u32 = 0o644;

const OWNER_EXECUTE: u32 = 0o100;

/// Collapse a host mode to [`EXECUTABLE_MODE`] or [`REGULAR_MODE`].
///
/// # Examples
///
/// ```
/// use stowage_publisher::artefact::permissions::normalise_mode;
///
/// assert_eq!(normalise_mode(0o700), 0o755);
/// assert_eq!(normalise_mode(0o600), 0o644);
/// assert_eq!(normalise_mode(0o100_664), 0o644);
/// ```
#[must_use]
pub fn normalise_mode(mode: u32) -> u32 {
    if mode & OWNER_EXECUTE == 0 {
        REGULAR_MODE
    } else {
        EXECUTABLE_MODE
    }
}

/// Normalise `mode` for the entry `name`, logging when the bits change.
pub(crate) fn fix_up(name: &str, mode: u32) -> u32 {
    let fixed = normalise_mode(mode);
    let current = permission_bits(mode);
    if current != fixed {
        debug!("fixing permissions of {name}: {current:o} -> {fixed:o}");
    }
    fixed
}

/// Strip file-type and special bits, keeping only `rwxrwxrwx`.
///
/// ZIP readers report the whole stored mode, including the regular-file
/// type bits, so entries are compared after masking.
///
/// ```
/// use stowage_publisher::artefact::permissions::permission_bits;
///
/// assert_eq!(permission_bits(0o100_755), 0o755);
/// ```
#[must_use]
pub fn permission_bits(mode: u32) -> u32 {
    mode & PERMISSION_BITS
}

/// The permission bits a file has on this host.
#[cfg(unix)]
pub(crate) fn host_mode(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode()
}

/// The permission bits a file has on this host.
#[cfg(not(unix))]
pub(crate) fn host_mode(metadata: &std::fs::Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        REGULAR_MODE
    }
}
