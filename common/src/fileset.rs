//! File set scanning for artefact packaging.
//!
//! A [`FileSet`] pairs a root directory with compiled include and exclude
//! patterns. Iterating it walks the tree lazily and yields every selected
//! regular file as a [`FileEntry`]: a root-relative path that always uses `/`
//! as its separator. The walk is driven by [`walkdir`] with entries sorted by
//! file name, so two scans of the same tree yield the same entries in the
//! same order. Symbolic links are not followed into directories; a link is
//! only yielded when it points at a regular file.

use crate::error::ScanError;
use crate::matcher::GlobMatcher;
use camino::{Utf8Path, Utf8PathBuf};
use log::trace;
use std::fmt;
use std::io;
use walkdir::WalkDir;

/// A root-relative file path with `/` separators.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileEntry(String);

impl FileEntry {
    /// Wrap a root-relative path that already uses `/` separators.
    #[must_use]
    pub fn new(relative: impl Into<String>) -> Self {
        Self(relative.into())
    }

    /// Return the relative path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve this entry against `root`.
    #[must_use]
    pub fn full_path(&self, root: &Utf8Path) -> Utf8PathBuf {
        self.0.split('/').fold(root.to_owned(), |path, segment| path.join(segment))
    }

    /// Consume the wrapper and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for FileEntry {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A root directory plus the patterns selecting files beneath it.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use stowage_common::fileset::FileSet;
/// use stowage_common::matcher::GlobMatcher;
///
/// let matcher = GlobMatcher::new(&["**"], &["**/*.pyc"]).unwrap();
/// let file_set = FileSet::new(Utf8Path::new("./lambda"), matcher).unwrap();
/// for entry in &file_set {
///     println!("{}", entry.unwrap());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileSet {
    root: Utf8PathBuf,
    matcher: GlobMatcher,
}

impl FileSet {
    /// Create a file set, resolving `root` to an absolute path.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::RootNotFound`] when `root` is missing or is not a
    /// directory, or [`ScanError::Io`] if it cannot be resolved.
    pub fn new(root: &Utf8Path, matcher: GlobMatcher) -> Result<Self, ScanError> {
        let absolute = root.canonicalize_utf8().map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                ScanError::RootNotFound {
                    path: root.to_owned(),
                }
            } else {
                ScanError::io(root.to_owned(), err)
            }
        })?;

        if !absolute.is_dir() {
            return Err(ScanError::RootNotFound {
                path: root.to_owned(),
            });
        }

        Ok(Self {
            root: absolute,
            matcher,
        })
    }

    /// The absolute root directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Start a fresh traversal of the tree.
    #[must_use]
    pub fn iter(&self) -> FileSetIter {
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();
        FileSetIter {
            root: self.root.clone(),
            matcher: self.matcher.clone(),
            walker,
        }
    }
}

impl IntoIterator for &FileSet {
    type Item = Result<FileEntry, ScanError>;
    type IntoIter = FileSetIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Walk `root` and lazily yield files selected by the patterns.
///
/// Convenience wrapper compiling the patterns and creating a [`FileSet`].
///
/// # Errors
///
/// Returns [`ScanError::Pattern`] for invalid patterns and
/// [`ScanError::RootNotFound`] when `root` is not a directory.
pub fn scan<S: AsRef<str>>(
    root: &Utf8Path,
    includes: &[S],
    excludes: &[S],
) -> Result<FileSetIter, ScanError> {
    let matcher = GlobMatcher::new(includes, excludes)?;
    Ok(FileSet::new(root, matcher)?.iter())
}

/// Lazy depth-first traversal over a [`FileSet`].
///
/// Errors reading one directory are yielded in place and the walk carries
/// on with the remaining entries.
pub struct FileSetIter {
    root: Utf8PathBuf,
    matcher: GlobMatcher,
    walker: walkdir::IntoIter,
}

impl FileSetIter {
    fn walk_error(&self, err: walkdir::Error) -> ScanError {
        let path = err
            .path()
            .and_then(Utf8Path::from_path)
            .map_or_else(|| self.root.clone(), Utf8Path::to_owned);
        ScanError::io(path, io::Error::from(err))
    }

    fn relative(&self, path: &Utf8Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|component| component.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Debug for FileSetIter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSetIter")
            .field("root", &self.root)
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

impl Iterator for FileSetIter {
    type Item = Result<FileEntry, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(self.walk_error(err))),
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }

            let Some(path) = Utf8Path::from_path(entry.path()) else {
                return Some(Err(ScanError::NonUtf8Path(entry.path().to_path_buf())));
            };
            let relative = self.relative(path);

            if !file_type.is_file() && !path.is_file() {
                trace!("skipping non-file entry {relative}");
                continue;
            }
            if self.matcher.is_selected(&relative) {
                return Some(Ok(FileEntry(relative)));
            }
            trace!("not selected: {relative}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::fs;
    use tempfile::TempDir;

    const ALL_FILES: &[&str] = &[
        "f1/f1.py",
        "f1/f1.pyc",
        "f1/__init__.py",
        "f1/test/__init__.py",
        "f1/test/f1.py",
        "f1/test/f1.pyc",
        "f1/test2/test.txt",
        "f2/f2.js",
    ];

    #[fixture]
    fn tree() -> TempDir {
        let dir = TempDir::new().expect("temp dir creation succeeds");
        for file in ALL_FILES {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().expect("has parent")).expect("mkdir");
            fs::write(&path, b"").expect("write");
        }
        dir
    }

    fn root_of(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp dir")
    }

    fn collect(dir: &TempDir, includes: &[&str], excludes: &[&str]) -> Vec<String> {
        scan(&root_of(dir), includes, excludes)
            .expect("scan starts")
            .map(|entry| entry.expect("entry").into_inner())
            .collect()
    }

    #[rstest]
    fn everything_is_selected_in_sorted_order(tree: TempDir) {
        let mut expected: Vec<String> = ALL_FILES.iter().map(|f| (*f).to_owned()).collect();
        expected.sort();
        assert_eq!(collect(&tree, &["**"], &[]), expected);
    }

    #[rstest]
    fn include_and_exclude_combine(tree: TempDir) {
        let files = collect(&tree, &["f1/**"], &["**/*.pyc", "test2/"]);
        assert_eq!(
            files,
            vec![
                "f1/__init__.py",
                "f1/f1.py",
                "f1/test/__init__.py",
                "f1/test/f1.py",
            ]
        );
    }

    #[rstest]
    fn exclude_wins_over_matching_include(tree: TempDir) {
        let files = collect(&tree, &["f2/f2.js"], &["f2/**"]);
        assert!(files.is_empty());
    }

    #[rstest]
    fn iteration_is_restartable(tree: TempDir) {
        let matcher = GlobMatcher::new(&["**/*.py"], &[]).expect("valid");
        let file_set = FileSet::new(&root_of(&tree), matcher).expect("root exists");
        let first: Vec<_> = file_set.iter().map(|e| e.expect("entry")).collect();
        let second: Vec<_> = file_set.iter().map(|e| e.expect("entry")).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[rstest]
    fn root_is_made_absolute(tree: TempDir) {
        let file_set =
            FileSet::new(&root_of(&tree), GlobMatcher::new(&["**"], &[]).expect("valid"))
                .expect("root exists");
        assert!(file_set.root().is_absolute());
    }

    #[rstest]
    fn missing_root_is_reported() {
        let dir = TempDir::new().expect("temp dir");
        let missing = root_of(&dir).join("absent");
        let err = FileSet::new(&missing, GlobMatcher::new(&["**"], &[]).expect("valid"))
            .expect_err("missing root");
        assert!(matches!(err, ScanError::RootNotFound { .. }));
    }

    #[rstest]
    fn file_root_is_rejected(tree: TempDir) {
        let file = root_of(&tree).join("f2/f2.js");
        let err = FileSet::new(&file, GlobMatcher::new(&["**"], &[]).expect("valid"))
            .expect_err("file root");
        assert!(matches!(err, ScanError::RootNotFound { .. }));
    }

    #[rstest]
    fn tooling_metadata_is_left_out_unless_asked_for() {
        let dir = TempDir::new().expect("temp dir");
        for file in [
            ".git/config",
            ".git/objects/ab/cd",
            ".svn/entries",
            ".DS_Store",
            "a.py~",
            "handler.py",
        ] {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().expect("has parent")).expect("mkdir");
            fs::write(&path, b"x").expect("write");
        }

        assert_eq!(collect(&dir, &["**"], &[]), vec!["handler.py"]);

        let matcher = GlobMatcher::new(&["**"], &[])
            .expect("valid")
            .without_builtin_excludes();
        let everything: Vec<String> = FileSet::new(&root_of(&dir), matcher)
            .expect("root exists")
            .iter()
            .map(|entry| entry.expect("entry").into_inner())
            .collect();
        assert_eq!(everything.len(), 6);
        assert!(everything.contains(&".git/objects/ab/cd".to_owned()));
    }

    #[cfg(unix)]
    #[rstest]
    fn symlinks_to_files_are_kept_and_directory_links_are_not_followed(tree: TempDir) {
        use std::os::unix::fs::symlink;
        symlink(tree.path().join("f2/f2.js"), tree.path().join("link.js")).expect("file link");
        symlink(tree.path().join("f1"), tree.path().join("f3")).expect("dir link");

        let files = collect(&tree, &["*.js"], &[]);
        assert_eq!(files, vec!["f2/f2.js", "link.js"]);
    }

    #[cfg(unix)]
    #[rstest]
    fn unreadable_directory_is_reported_and_the_walk_continues(tree: TempDir) {
        use std::os::unix::fs::PermissionsExt;
        let locked = tree.path().join("f1/test");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");
        if fs::read_dir(&locked).is_ok() {
            // Privileged users read through the mode bits.
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("restore");
            return;
        }

        let results: Vec<_> = scan(&root_of(&tree), &["**"], &[])
            .expect("scan starts")
            .collect();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("restore");

        assert!(results.iter().any(|r| matches!(
            r,
            Err(ScanError::Io { path, .. }) if path.ends_with("f1/test")
        )));
        let names: Vec<String> = results
            .into_iter()
            .filter_map(Result::ok)
            .map(FileEntry::into_inner)
            .collect();
        assert!(names.contains(&"f2/f2.js".to_owned()));
        assert!(!names.iter().any(|name| name.starts_with("f1/test/")));
    }

    #[rstest]
    fn full_path_joins_segments() {
        let entry = FileEntry::new("f1/test/f1.py");
        assert_eq!(
            entry.full_path(Utf8Path::new("/srv/app")),
            Utf8PathBuf::from("/srv/app/f1/test/f1.py")
        );
    }
}
