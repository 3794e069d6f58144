use std::path::{Path, PathBuf};

use relative_path::RelativePath;

/// Token in the documentation folder setting that stands for the workspace root.
pub const WORKSPACE_FOLDER_PLACEHOLDER: &str = "${workspaceFolder}";

/// Turn the configured documentation folder into an absolute directory.
///
/// - a specifier containing `${workspaceFolder}` has its first occurrence replaced
///   with the workspace root
/// - an absolute specifier is returned unchanged
/// - anything else is taken relative to the workspace root
///
/// The result is not checked for existence.
pub fn expand_documentation_root(specifier: &str, workspace_root: &Path) -> PathBuf {
    if specifier.contains(WORKSPACE_FOLDER_PLACEHOLDER) {
        let root = workspace_root.to_string_lossy();
        return PathBuf::from(specifier.replacen(WORKSPACE_FOLDER_PLACEHOLDER, &root, 1));
    }
    let path = Path::new(specifier);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    RelativePath::new(specifier).to_path(workspace_root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_substituted() {
        let root = expand_documentation_root("${workspaceFolder}/wiki", Path::new("/ws"));
        assert_eq!(root, PathBuf::from("/ws/wiki"));
    }

    #[test]
    fn test_placeholder_alone() {
        let root = expand_documentation_root("${workspaceFolder}", Path::new("/ws"));
        assert_eq!(root, PathBuf::from("/ws"));
    }

    #[test]
    fn test_placeholder_is_substituted_once() {
        let root = expand_documentation_root(
            "${workspaceFolder}/docs/${workspaceFolder}",
            Path::new("/ws"),
        );
        assert_eq!(root, PathBuf::from("/ws/docs/${workspaceFolder}"));
    }

    #[test]
    fn test_placeholder_in_the_middle() {
        let root = expand_documentation_root("/mnt/${workspaceFolder}/docs", Path::new("ws"));
        assert_eq!(root, PathBuf::from("/mnt/ws/docs"));
    }

    #[test]
    fn test_absolute_specifier_is_unchanged() {
        let root = expand_documentation_root("/srv/handbook", Path::new("/ws"));
        assert_eq!(root, PathBuf::from("/srv/handbook"));
    }

    #[test]
    fn test_relative_specifier_is_joined() {
        assert_eq!(
            expand_documentation_root("docs", Path::new("/ws")),
            PathBuf::from("/ws/docs")
        );
        assert_eq!(
            expand_documentation_root("docs/api", Path::new("/ws")),
            PathBuf::from("/ws/docs/api")
        );
    }

    #[test]
    fn test_relative_specifier_matches_plain_join() {
        for specifier in ["docs", "documentation/en", "a/b/c"] {
            assert_eq!(
                expand_documentation_root(specifier, Path::new("/home/user/project")),
                Path::new("/home/user/project").join(specifier)
            );
        }
    }
}
