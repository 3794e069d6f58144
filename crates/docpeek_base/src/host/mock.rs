use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{DocpeekError, DocpeekResult};

use super::traits::{DirectoryEntry, EntryKind, Host, innermost_folder};

/* 📖 # Why does MockHost keep children in insertion order?

The resolver returns the first match in the order the host enumerates a
directory. Real filesystems do not promise any order, so tests need a host where
the order is exactly the order files were added. A HashMap keyed by directory with
a Vec of children gives that, and everything sits behind one Arc<Mutex<_>> so a
test can keep a clone for inspection after handing the mock to the engine.
*/

/// A message shown to the user through the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostMessage {
    Information(String),
    Warning(String),
}

#[derive(Debug, Default)]
struct MockState {
    files: HashMap<PathBuf, Vec<u8>>,
    directories: HashMap<PathBuf, Vec<DirectoryEntry>>,
    unreadable: HashSet<PathBuf>,
    workspace_folders: Vec<PathBuf>,
    active_file: Option<PathBuf>,
    previews: Vec<(PathBuf, bool)>,
    messages: Vec<HostMessage>,
    directory_reads: Vec<PathBuf>,
    fail_previews: bool,
}

impl MockState {
    fn ensure_directory(&mut self, path: &Path) {
        if self.directories.contains_key(path) {
            return;
        }
        self.directories.insert(path.to_path_buf(), Vec::new());
        self.link_into_parent(path, EntryKind::Directory);
    }

    fn link_into_parent(&mut self, path: &Path, kind: EntryKind) {
        let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
            return;
        };
        self.ensure_directory(parent);
        let name = name.to_string_lossy().into_owned();
        if let Some(children) = self.directories.get_mut(parent) {
            if !children.iter().any(|entry| entry.name == name) {
                children.push(DirectoryEntry { name, kind });
            }
        }
    }
}

/// In-memory host for testing.
///
/// Files and directories live in memory; previews, messages and directory reads
/// are recorded so tests can assert on every side effect.
///
/// ```
/// use std::path::Path;
/// use docpeek_base::{Host, MockHost};
///
/// let mock = MockHost::new();
/// mock.add_file("/ws/docs/foo.md", "# Foo");
/// assert!(mock.file_exists(Path::new("/ws/docs")).unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHost {
    state: Arc<Mutex<MockState>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, creating all parent directories on the way.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut state = self.state.lock();
        state.files.insert(path.to_path_buf(), content.into());
        state.link_into_parent(path, EntryKind::File);
    }

    /// Add an (empty) directory, creating all parents on the way.
    pub fn add_directory(&self, path: impl AsRef<Path>) {
        self.state.lock().ensure_directory(path.as_ref());
    }

    /// Add an entry that is neither file nor directory, such as a symbolic link.
    pub fn add_other(&self, path: impl AsRef<Path>) {
        self.state
            .lock()
            .link_into_parent(path.as_ref(), EntryKind::Other);
    }

    /// Make listing the given directory fail with a permission error.
    pub fn set_unreadable(&self, path: impl AsRef<Path>) {
        self.state
            .lock()
            .unreadable
            .insert(path.as_ref().to_path_buf());
    }

    pub fn add_workspace_folder(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.state.lock();
        state.ensure_directory(&path);
        state.workspace_folders.push(path);
    }

    pub fn set_active_file(&self, path: Option<PathBuf>) {
        self.state.lock().active_file = path;
    }

    /// Make every subsequent `show_preview` call fail.
    pub fn fail_previews(&self) {
        self.state.lock().fail_previews = true;
    }

    /// Previews opened so far, with their to-side flag.
    pub fn previews(&self) -> Vec<(PathBuf, bool)> {
        self.state.lock().previews.clone()
    }

    pub fn messages(&self) -> Vec<HostMessage> {
        self.state.lock().messages.clone()
    }

    /// Directories listed so far, in call order.
    pub fn directory_reads(&self) -> Vec<PathBuf> {
        self.state.lock().directory_reads.clone()
    }
}

impl Host for MockHost {
    fn active_file(&self) -> Option<PathBuf> {
        self.state.lock().active_file.clone()
    }

    fn workspace_root_for(&self, path: &Path) -> Option<PathBuf> {
        let state = self.state.lock();
        innermost_folder(&state.workspace_folders, path)
    }

    fn file_exists(&self, path: &Path) -> DocpeekResult<bool> {
        let state = self.state.lock();
        Ok(state.files.contains_key(path) || state.directories.contains_key(path))
    }

    fn read_directory(&self, path: &Path) -> DocpeekResult<Vec<DirectoryEntry>> {
        let mut state = self.state.lock();
        state.directory_reads.push(path.to_path_buf());
        if state.unreadable.contains(path) {
            return Err(Box::new(DocpeekError::file_error(
                path,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
            )));
        }
        state.directories.get(path).cloned().ok_or_else(|| {
            Box::new(DocpeekError::file_error(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "directory not found"),
            ))
        })
    }

    fn read_file(&self, path: &Path) -> DocpeekResult<Box<dyn Read + 'static>> {
        let state = self.state.lock();
        let content = state.files.get(path).cloned().ok_or_else(|| {
            Box::new(DocpeekError::file_error(
                path,
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path.display()),
                ),
            ))
        })?;
        Ok(Box::new(Cursor::new(content)))
    }

    fn show_preview(&self, path: &Path, to_side: bool) -> DocpeekResult<()> {
        let mut state = self.state.lock();
        if state.fail_previews {
            crate::bail!("Preview unavailable for {}", path.display());
        }
        state.previews.push((path.to_path_buf(), to_side));
        Ok(())
    }

    fn show_information_message(&self, message: &str) {
        self.state
            .lock()
            .messages
            .push(HostMessage::Information(message.to_string()));
    }

    fn show_warning_message(&self, message: &str) {
        self.state
            .lock()
            .messages
            .push(HostMessage::Warning(message.to_string()));
    }
}
