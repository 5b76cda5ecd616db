//! Include/exclude pattern input from user configuration.
//!
//! Configuration may give a pattern field as a bare string or as a list of
//! strings. [`PatternInput`] captures whatever shape arrived and
//! [`resolve_patterns`] normalises it into a plain `Vec<String>` before any
//! other stage sees it. Empty or false-like values (`""`, `[]`, `false`, `0`,
//! `{}`) mean "not set" and fall back to the default.

use crate::error::PatternError;
use serde::Deserialize;
use serde::de::IgnoredAny;
use std::collections::BTreeMap;
use std::num::FpCategory;

/// Default include patterns: every file under the root.
pub const DEFAULT_INCLUDE: &[&str] = &["**"];

/// Default exclude patterns: nothing.
pub const DEFAULT_EXCLUDE: &[&str] = &[];

/// Raw pattern configuration as written by the user.
///
/// # Examples
///
/// ```
/// use stowage_common::patterns::{PatternInput, resolve_patterns};
///
/// let input = PatternInput::from("src/**");
/// let patterns = resolve_patterns(Some(input), "include", &["**"]).unwrap();
/// assert_eq!(patterns, vec!["src/**".to_owned()]);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PatternInput {
    /// A single pattern string.
    Single(String),
    /// A list of values, each expected to be a pattern string.
    List(Vec<PatternItem>),
    /// A boolean.
    Flag(bool),
    /// An integer.
    Integer(i64),
    /// A floating-point number.
    Float(f64),
    /// A table of arbitrary values.
    Table(BTreeMap<String, IgnoredAny>),
    /// Any other kind of value.
    Other(IgnoredAny),
}

impl PatternInput {
    /// Returns true for values that count as "not set": empty strings, lists
    /// and tables, `false` and zero.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        match self {
            Self::Single(pattern) => pattern.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Flag(flag) => !flag,
            Self::Integer(value) => *value == 0,
            Self::Float(value) => value.classify() == FpCategory::Zero,
            Self::Table(entries) => entries.is_empty(),
            Self::Other(_) => false,
        }
    }
}

/// One element of a [`PatternInput::List`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PatternItem {
    /// A pattern string.
    Text(String),
    /// A value that is not a string.
    Other(IgnoredAny),
}

impl From<&str> for PatternInput {
    fn from(value: &str) -> Self {
        Self::Single(value.to_owned())
    }
}

impl From<String> for PatternInput {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for PatternInput {
    fn from(values: Vec<String>) -> Self {
        Self::List(values.into_iter().map(PatternItem::Text).collect())
    }
}

impl From<Vec<&str>> for PatternInput {
    fn from(values: Vec<&str>) -> Self {
        Self::List(
            values
                .into_iter()
                .map(|value| PatternItem::Text(value.to_owned()))
                .collect(),
        )
    }
}

/// Validate pattern input and normalise it into an ordered list.
///
/// Absent input and any [unset](PatternInput::is_unset) value yield
/// `default`. A single string becomes a one-element list, and a list of
/// strings is returned in its original order.
///
/// # Errors
///
/// Returns [`PatternError::InvalidConfiguration`] naming `field` when a set
/// value is not a string or a list made only of strings.
pub fn resolve_patterns(
    input: Option<PatternInput>,
    field: &str,
    default: &[&str],
) -> Result<Vec<String>, PatternError> {
    let invalid = || PatternError::InvalidConfiguration {
        field: field.to_owned(),
    };

    match input {
        None => Ok(owned(default)),
        Some(input) if input.is_unset() => Ok(owned(default)),
        Some(PatternInput::Single(pattern)) => Ok(vec![pattern]),
        Some(PatternInput::List(items)) => items
            .into_iter()
            .map(|item| match item {
                PatternItem::Text(pattern) => Ok(pattern),
                PatternItem::Other(_) => Err(invalid()),
            })
            .collect(),
        Some(_) => Err(invalid()),
    }
}

fn owned(patterns: &[&str]) -> Vec<String> {
    patterns.iter().map(|p| (*p).to_owned()).collect()
}
