//! Directory resolution abstraction for platform-specific paths.
//!
//! Wraps `directories-next` behind a trait so that home-directory expansion
//! in configuration can be tested without touching the real environment.

use std::path::PathBuf;

/// Source of well-known user directories.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// The current user's home directory, if one can be determined.
    fn home_dir(&self) -> Option<PathBuf>;
}

/// [`BaseDirs`] backed by the operating system.
///
/// # Examples
///
/// ```no_run
/// use stowage_publisher::dirs::{BaseDirs, SystemBaseDirs};
///
/// let dirs = SystemBaseDirs::new().expect("home directory available");
/// println!("{:?}", dirs.home_dir());
/// ```
#[derive(Debug, Clone)]
pub struct SystemBaseDirs {
    inner: directories_next::BaseDirs,
}

impl SystemBaseDirs {
    /// Resolve the system directories.
    ///
    /// Returns `None` when no home directory can be found for the current
    /// user.
    #[must_use]
    pub fn new() -> Option<Self> {
        directories_next::BaseDirs::new().map(|inner| Self { inner })
    }
}

impl BaseDirs for SystemBaseDirs {
    fn home_dir(&self) -> Option<PathBuf> {
        Some(self.inner.home_dir().to_path_buf())
    }
}
