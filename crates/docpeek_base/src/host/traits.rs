use std::io::Read;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::DocpeekResult;

/// Kind of a directory entry as reported by a directory listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Special files, dangling links and links to directories. Never descended into.
    Other,
}

/// A single entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl DirectoryEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/* 📖 # Why is Host a trait instead of a struct?

Resolution logic must run the same way inside an editor integration, on the
command line and in unit tests. The trait captures exactly the collaborators the
engine needs, so MockHost can drive every branch deterministically.
*/

/// The environment docpeek runs in: editor state, filesystem and user interface.
pub trait Host: std::fmt::Debug + Send + Sync + 'static {
    /// The file the user is currently working on, if any.
    fn active_file(&self) -> Option<PathBuf>;

    /// The innermost workspace folder containing `path`, if any.
    fn workspace_root_for(&self, path: &Path) -> Option<PathBuf>;

    /// Check if anything exists at the given absolute path.
    fn file_exists(&self, path: &Path) -> DocpeekResult<bool>;

    /// List the entries of a directory in the order the filesystem yields them.
    fn read_directory(&self, path: &Path) -> DocpeekResult<Vec<DirectoryEntry>>;

    /// Open a file for reading.
    fn read_file(&self, path: &Path) -> DocpeekResult<Box<dyn Read + 'static>>;

    /// Read entire file contents as a UTF-8 string.
    fn read_file_to_string(&self, path: &Path) -> DocpeekResult<String> {
        let mut reader = self.read_file(path)?;
        let mut contents = Vec::new();
        reader
            .read_to_end(&mut contents)
            .map_err(|e| Box::new(crate::DocpeekError::file_error(path, e)))?;
        String::from_utf8(contents)
            .map_err(|_e| crate::err!("File is not valid UTF-8: {}", path.display()))
    }

    /// Open a rendered preview of the file, either beside the current view or in place of it.
    fn show_preview(&self, path: &Path, to_side: bool) -> DocpeekResult<()>;

    fn show_information_message(&self, message: &str);

    fn show_warning_message(&self, message: &str);
}

/// Remove `.` and resolve `..` components without touching the filesystem.
///
/// `..` directly below the root stays at the root; leading `..` of a relative path is kept.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other),
        }
    }
    normalized
}

/// Pick the innermost folder containing `path`, the way editors map a file to its
/// workspace folder when folders are nested.
///
/// Both sides are compared in normalized form, so `/ws/../other/foo.ts` is not inside `/ws`.
pub fn innermost_folder(folders: &[PathBuf], path: &Path) -> Option<PathBuf> {
    let path = normalize_path(path);
    folders
        .iter()
        .map(|folder| normalize_path(folder))
        .filter(|folder| path.starts_with(folder))
        .max_by_key(|folder| folder.components().count())
}

/// Handle to a host implementation, enabling shared ownership.
///
/// Internally wraps `Arc<dyn Host>`; clones share the same implementation.
///
/// ```
/// use docpeek_base::{HostHandle, MockHost};
///
/// let host = HostHandle::new(MockHost::new());
/// let other = host.clone();
/// assert!(other.active_file().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct HostHandle(Arc<dyn Host>);

impl HostHandle {
    pub fn new(host: impl Host + 'static) -> Self {
        Self(Arc::new(host))
    }
}

impl std::ops::Deref for HostHandle {
    type Target = dyn Host;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}
