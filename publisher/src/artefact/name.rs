//! Artefact name newtype.
//!
//! Names are embedded verbatim in remote object keys, so they must be
//! non-empty and free of path separators, whitespace and control characters.

use super::error::{ArtefactError, Result};
use std::fmt;

/// A validated artefact name such as `"things"` or `"api-handler"`.
///
/// # Examples
///
/// ```
/// use stowage_publisher::artefact::name::ArtefactName;
///
/// let name: ArtefactName = "api-handler".try_into().unwrap();
/// assert_eq!(name.as_str(), "api-handler");
/// assert!(ArtefactName::try_from("nested/name").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtefactName(String);

impl ArtefactName {
    /// Return the name as a string slice.
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

impl TryFrom<&str> for ArtefactName {
    type Error = ArtefactError;

    fn try_from(value: &str) -> Result<Self> {
        validate_name(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for ArtefactName {
    type Error = ArtefactError;

    fn try_from(value: String) -> Result<Self> {
        validate_name(&value)?;
        Ok(Self(value))
    }
}

impl AsRef<str> for ArtefactName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtefactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn validate_name(value: &str) -> Result<()> {
    let invalid = |reason: &str| ArtefactError::InvalidName {
        value: value.to_owned(),
        reason: reason.to_owned(),
    };

    if value.is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if value.contains(['/', '\\']) {
        return Err(invalid("name must not contain path separators"));
    }
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(invalid("name must not contain whitespace or control characters"));
    }
    Ok(())
}
