/* 📖 # How is a documentation file located?

The file name is `<base name><extension>`. The fast path checks the
documentation root itself, which is where most projects keep their pages. Only
when that misses does the resolver walk the tree: depth first, pre-order, in the
order the host lists each directory, stopping at the first file with that name.
Which of several same-named files wins therefore depends on the enumeration
order; there is no sorting.

A missing root, an unreadable directory or a vanished entry never fails the
lookup. The affected subtree simply contributes no match.
*/

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use docpeek_base::HostHandle;

use crate::config::Config;
use crate::expand::expand_documentation_root;

/// Ensure the extension starts with a dot, so `md` and `.md` search the same name.
pub fn normalize_extension(extension: &str) -> Cow<'_, str> {
    if extension.starts_with('.') {
        Cow::Borrowed(extension)
    } else {
        Cow::Owned(format!(".{}", extension))
    }
}

/// Find `<target_base_name><target_extension>` under the documentation root.
///
/// Returns `None` when nothing matches or the root does not exist.
#[instrument(skip(host), fields(root = %documentation_root.display()))]
pub fn resolve_documentation(
    host: &HostHandle,
    target_base_name: &str,
    target_extension: &str,
    documentation_root: &Path,
) -> Option<PathBuf> {
    let file_name = format!("{}{}", target_base_name, normalize_extension(target_extension));

    let direct = documentation_root.join(&file_name);
    match host.file_exists(&direct) {
        Ok(true) => {
            debug!(path = %direct.display(), "found documentation in root");
            return Some(direct);
        }
        Ok(false) => {}
        Err(e) => debug!(error = %e, "existence check failed, scanning subfolders"),
    }

    let found = find_file_recursively(host, documentation_root, &file_name);
    debug!(found = ?found, "recursive search complete");
    found
}

/// Depth-first, pre-order search for a regular file named `file_name`.
pub fn find_file_recursively(host: &HostHandle, directory: &Path, file_name: &str) -> Option<PathBuf> {
    let entries = match host.read_directory(directory) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(directory = %directory.display(), error = %e, "skipping unreadable directory");
            return None;
        }
    };

    for entry in entries {
        if entry.is_file() && entry.name == file_name {
            return Some(directory.join(&entry.name));
        }
        if entry.is_directory() {
            if let Some(found) = find_file_recursively(host, &directory.join(&entry.name), file_name) {
                return Some(found);
            }
        }
    }
    None
}

/// A source file together with the workspace it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRequest {
    pub source_file: PathBuf,
    pub workspace_root: PathBuf,
}

impl ResolutionRequest {
    /// Build the request for `source_file`, or `None` if it lies outside every workspace folder.
    pub fn for_file(host: &HostHandle, source_file: &Path) -> Option<Self> {
        let workspace_root = host.workspace_root_for(source_file)?;
        Some(Self {
            source_file: source_file.to_path_buf(),
            workspace_root,
        })
    }

    /// The source file name without its final extension.
    pub fn target_base_name(&self) -> String {
        target_base_name(&self.source_file)
    }

    pub fn documentation_root(&self, config: &Config) -> PathBuf {
        expand_documentation_root(&config.documentation_folder, &self.workspace_root)
    }
}

/// The file name without its final extension: `foo.test.ts` becomes `foo.test`.
pub fn target_base_name(source_file: &Path) -> String {
    source_file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Resolve the documentation file for an arbitrary source file.
#[instrument(skip(host, config), fields(source = %source_file.display()))]
pub fn resolve_documentation_for_file(
    host: &HostHandle,
    config: &Config,
    source_file: &Path,
) -> Option<PathBuf> {
    let Some(request) = ResolutionRequest::for_file(host, source_file) else {
        debug!("file is not inside a workspace folder");
        return None;
    };
    let documentation_root = request.documentation_root(config);
    resolve_documentation(
        host,
        &request.target_base_name(),
        &config.documentation_extension,
        &documentation_root,
    )
}
