//! Read-only access to the package tree.
//!
//! All paths handed to a [`PackageStore`] are relative to its root and are
//! built from segments that already passed [`is_valid_segment`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What a directory entry is. Symlinks and special files are `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Other,
}

/// A single entry returned by [`PackageStore::list_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl StoreEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Dir,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Directory-existence and read primitives over a fixed root.
///
/// The package server never writes through this interface.
pub trait PackageStore: Send + Sync {
    /// True if `path` is an existing directory.
    fn dir_exists(&self, path: &Path) -> bool;

    /// True if `path` is an existing regular file.
    fn file_exists(&self, path: &Path) -> bool;

    /// Entries directly inside `path`, sorted by name.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<StoreEntry>>;

    /// Full contents of the file at `path`.
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// [`PackageStore`] backed by the local file system.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl PackageStore for FsStore {
    fn dir_exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(self.full(path))
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    fn file_exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(self.full(path))
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<StoreEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(self.full(path))? {
            let entry = entry?;
            // Non UTF-8 names cannot appear in a URL segment or a manifest.
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            let file_type = entry.file_type()?;
            let kind = if file_type.is_file() {
                EntryKind::File
            } else if file_type.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::Other
            };
            entries.push(StoreEntry { name, kind });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(self.full(path))
    }
}

/// Whether `segment` may be used as one component of a package path.
///
/// Rejects empty names, `.`/`..`, hidden names and anything carrying a
/// path separator, so untrusted URL segments cannot escape the tenant
/// directory. Control characters, `"` and `;` are rejected as well since
/// segments end up in the quoted attachment filename of a download.
pub fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with('.')
        && !segment
            .chars()
            .any(|c| c.is_control() || matches!(c, '/' | '\\' | '"' | ';'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        assert!(is_valid_segment("blissframework"));
        assert!(is_valid_segment("backend"));
        assert!(is_valid_segment("gpt-4o_mini"));
    }

    #[test]
    fn rejects_traversal_and_hidden_names() {
        assert!(!is_valid_segment(""));
        assert!(!is_valid_segment("."));
        assert!(!is_valid_segment(".."));
        assert!(!is_valid_segment(".git"));
        assert!(!is_valid_segment("a/b"));
        assert!(!is_valid_segment("a\\b"));
        assert!(!is_valid_segment("a\0b"));
    }

    #[test]
    fn rejects_characters_unsafe_in_a_filename_header() {
        assert!(!is_valid_segment("a\nb"));
        assert!(!is_valid_segment("a\rb"));
        assert!(!is_valid_segment("a\u{7f}b"));
        assert!(!is_valid_segment("a\"b"));
        assert!(!is_valid_segment("a;b"));
        assert!(is_valid_segment("claude-3.5"));
    }

    #[test]
    fn list_dir_sorts_and_classifies_entries() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("b.md"), "b").unwrap();
        fs::write(tmp.path().join("a.md"), "a").unwrap();
        fs::create_dir(tmp.path().join("claude")).unwrap();

        let store = FsStore::new(tmp.path());
        let entries = store.list_dir(Path::new("")).unwrap();
        assert_eq!(
            entries,
            vec![
                StoreEntry::file("a.md"),
                StoreEntry::file("b.md"),
                StoreEntry::dir("claude"),
            ]
        );
    }

    #[test]
    fn missing_paths_do_not_exist() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsStore::new(tmp.path());
        assert!(!store.dir_exists(Path::new("nope")));
        assert!(!store.file_exists(Path::new("nope/manifest.json")));
        assert!(store.list_dir(Path::new("nope")).is_err());
    }

    #[test]
    fn existence_checks_distinguish_files_from_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("scope")).unwrap();
        fs::write(tmp.path().join("scope/manifest.json"), "{}").unwrap();

        let store = FsStore::new(tmp.path());
        assert!(store.dir_exists(Path::new("scope")));
        assert!(!store.file_exists(Path::new("scope")));
        assert!(store.file_exists(Path::new("scope/manifest.json")));
        assert!(!store.dir_exists(Path::new("scope/manifest.json")));
    }
}
