//! Remote object key policy.
//!
//! Keys take the form `<prefix>-<name>-<fingerprint>.zip`. The fingerprint
//! makes every key content-addressed: a key names exactly one archive, so an
//! object stored under it never needs replacing.

use super::fingerprint::Fingerprint;
use super::name::ArtefactName;
use std::fmt;

/// The prefix used when a deployment does not configure one.
pub const DEFAULT_KEY_PREFIX: &str = "lambda";

/// The fixed file extension for archive objects.
const ARCHIVE_EXTENSION: &str = ".zip";

/// Builds object keys for a deployment.
///
/// # Examples
///
/// ```
/// use stowage_publisher::artefact::fingerprint::Fingerprint;
/// use stowage_publisher::artefact::name::ArtefactName;
/// use stowage_publisher::artefact::naming::KeyPolicy;
///
/// let name: ArtefactName = "things".try_into().unwrap();
/// let fingerprint = Fingerprint::of(b"");
/// let key = KeyPolicy::default().object_key(&name, &fingerprint);
/// assert!(key.as_str().starts_with("lambda-things-e3b0c442"));
/// assert!(key.as_str().ends_with(".zip"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPolicy {
    prefix: String,
}

impl KeyPolicy {
    /// Create a policy with a custom key prefix.
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The prefix placed before the artefact name.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Derive the key for `name` at `fingerprint`.
    #[must_use]
    pub fn object_key(&self, name: &ArtefactName, fingerprint: &Fingerprint) -> ObjectKey {
        ObjectKey(format!(
            "{}-{name}-{fingerprint}{ARCHIVE_EXTENSION}",
            self.prefix
        ))
    }
}

impl Default for KeyPolicy {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }
}

/// A content-addressed remote object key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Return the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
