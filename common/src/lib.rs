//! Shared file selection for stowage: pattern input validation, glob
//! matching, and lazy file set scanning.

pub mod error;
pub mod fileset;
pub mod matcher;
pub mod patterns;

pub use error::{PatternError, ScanError};
pub use fileset::{FileEntry, FileSet, FileSetIter, scan};
pub use matcher::{BUILTIN_EXCLUDES, GlobMatcher, matches, normalise_pattern};
pub use patterns::{DEFAULT_EXCLUDE, DEFAULT_INCLUDE, PatternInput, PatternItem, resolve_patterns};
