//! Content fingerprint newtype.
//!
//! A fingerprint is the lowercase hex SHA-256 digest of an archive's bytes.
//! It doubles as the version component of remote object keys, and is
//! compared against the tag a store reports for an existing object.

use sha2::{Digest, Sha256};
use std::fmt;

/// A hex-encoded SHA-256 digest of archive content.
///
/// # Examples
///
/// ```
/// use stowage_publisher::artefact::fingerprint::Fingerprint;
///
/// let fingerprint = Fingerprint::of(b"hello");
/// assert_eq!(fingerprint.as_str().len(), 64);
/// assert!(fingerprint.matches_tag(&format!("\"{fingerprint}\"")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of `bytes`.
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(bytes)))
    }

    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Compare against a store-reported entity tag.
    ///
    /// Stores usually quote the tag (`"\"ab12...\""`); surrounding quotes
    /// and a weak-validator `W/` prefix are ignored, as is letter case.
    #[must_use]
    pub fn matches_tag(&self, tag: &str) -> bool {
        strip_tag(tag).eq_ignore_ascii_case(&self.0)
    }
}

/// Remove quoting and weak markers from an entity tag.
fn strip_tag(tag: &str) -> &str {
    let tag = tag.trim();
    let tag = tag.strip_prefix("W/").unwrap_or(tag);
    tag.trim_matches('"')
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
