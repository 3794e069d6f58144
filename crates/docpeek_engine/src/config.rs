use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, instrument};

use docpeek_base::{DocpeekResult, HostHandle, ResultExt, err};

pub const DEFAULT_DOCUMENTATION_FOLDER: &str = "docs";
pub const DEFAULT_DOCUMENTATION_EXTENSION: &str = ".md";

/// Settings of the `docsPreview` namespace.
///
/// ```toml
/// [docsPreview]
/// documentationFolder = "${workspaceFolder}/wiki"
/// documentationExtension = "md"
/// openPreviewToSide = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Documentation root: relative to the workspace, absolute, or containing `${workspaceFolder}`.
    #[serde(alias = "docsFolder")]
    pub documentation_folder: String,
    /// Extension of documentation files, leading dot optional.
    #[serde(alias = "docsExtension")]
    pub documentation_extension: String,
    /// Open the preview beside the current view instead of replacing it.
    #[serde(alias = "openToSide")]
    pub open_preview_to_side: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            documentation_folder: DEFAULT_DOCUMENTATION_FOLDER.to_string(),
            documentation_extension: DEFAULT_DOCUMENTATION_EXTENSION.to_string(),
            open_preview_to_side: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(rename = "docsPreview", default)]
    docs_preview: Config,
}

/// Per-invocation values that take precedence over the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub documentation_folder: Option<String>,
    pub documentation_extension: Option<String>,
    pub open_preview_to_side: Option<bool>,
}

impl ConfigOverrides {
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(folder) = &self.documentation_folder {
            config.documentation_folder = folder.clone();
        }
        if let Some(extension) = &self.documentation_extension {
            config.documentation_extension = extension.clone();
        }
        if let Some(to_side) = self.open_preview_to_side {
            config.open_preview_to_side = to_side;
        }
        config
    }
}

/* 📖 # Why is configuration re-read on every invocation?

Users edit their settings while the tool is in use. Reading the file each time a
command runs means a changed documentation folder takes effect on the next
invocation, with no cache to invalidate.
*/

/// Where the configuration comes from: an optional file plus overrides.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub config_path: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

impl Settings {
    pub fn new(config_path: Option<PathBuf>, overrides: ConfigOverrides) -> Self {
        Self {
            config_path,
            overrides,
        }
    }

    /// Read the current configuration.
    pub fn read(&self, host: &HostHandle) -> DocpeekResult<Config> {
        let config = match &self.config_path {
            Some(path) => load_config(host, path)?,
            None => Config::default(),
        };
        Ok(self.overrides.apply(config))
    }
}

/// Load the `[docsPreview]` table from a TOML file.
///
/// A missing file yields the defaults; a present but malformed file is an error.
#[instrument(skip(host), fields(path = %path.display()))]
pub fn load_config(host: &HostHandle, path: &Path) -> DocpeekResult<Config> {
    if !host.file_exists(path)? {
        debug!("no configuration file, using defaults");
        return Ok(Config::default());
    }
    let text = host
        .read_file_to_string(path)
        .with_context(|| format!("Failed to read configuration {}", path.display()))?;
    let file: ConfigFile = toml::from_str(&text)
        .map_err(|e| err!("Failed to parse configuration {}: {}", path.display(), e))?;
    debug!(config = ?file.docs_preview, "loaded configuration");
    Ok(file.docs_preview)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docpeek_base::MockHost;

    fn host_with_config(content: &str) -> HostHandle {
        let mock = MockHost::new();
        mock.add_file("/ws/docpeek.toml", content);
        HostHandle::new(mock)
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.documentation_folder, "docs");
        assert_eq!(config.documentation_extension, ".md");
        assert!(config.open_preview_to_side);
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let host = HostHandle::new(MockHost::new());
        let config = load_config(&host, Path::new("/ws/docpeek.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_config_full() {
        let host = host_with_config(
            r#"
[docsPreview]
documentationFolder = "${workspaceFolder}/wiki"
documentationExtension = "txt"
openPreviewToSide = false
"#,
        );
        let config = load_config(&host, Path::new("/ws/docpeek.toml")).unwrap();
        assert_eq!(
            config,
            Config {
                documentation_folder: "${workspaceFolder}/wiki".to_string(),
                documentation_extension: "txt".to_string(),
                open_preview_to_side: false,
            }
        );
    }

    #[test]
    fn test_load_config_partial_keeps_defaults() {
        let host = host_with_config("[docsPreview]\ndocumentationFolder = \"manual\"\n");
        let config = load_config(&host, Path::new("/ws/docpeek.toml")).unwrap();
        assert_eq!(config.documentation_folder, "manual");
        assert_eq!(config.documentation_extension, ".md");
        assert!(config.open_preview_to_side);
    }

    #[test]
    fn test_load_config_legacy_keys() {
        let host = host_with_config(
            "[docsPreview]\ndocsFolder = \"notes\"\ndocsExtension = \"rst\"\nopenToSide = false\n",
        );
        let config = load_config(&host, Path::new("/ws/docpeek.toml")).unwrap();
        assert_eq!(config.documentation_folder, "notes");
        assert_eq!(config.documentation_extension, "rst");
        assert!(!config.open_preview_to_side);
    }

    #[test]
    fn test_load_config_without_namespace_table() {
        let host = host_with_config("[other]\nkey = 1\n");
        let config = load_config(&host, Path::new("/ws/docpeek.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let host = host_with_config("[docsPreview\n");
        let error = load_config(&host, Path::new("/ws/docpeek.toml")).unwrap_err();
        assert!(
            error
                .to_string()
                .starts_with("Failed to parse configuration /ws/docpeek.toml")
        );
    }

    #[test]
    fn test_load_config_wrong_type() {
        let host = host_with_config("[docsPreview]\nopenPreviewToSide = \"yes\"\n");
        assert!(load_config(&host, Path::new("/ws/docpeek.toml")).is_err());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let overrides = ConfigOverrides {
            documentation_folder: Some("/abs/docs".to_string()),
            documentation_extension: None,
            open_preview_to_side: Some(false),
        };
        let config = overrides.apply(Config::default());
        assert_eq!(config.documentation_folder, "/abs/docs");
        assert_eq!(config.documentation_extension, ".md");
        assert!(!config.open_preview_to_side);
    }

    #[test]
    fn test_settings_read_is_fresh_each_time() {
        let mock = MockHost::new();
        mock.add_file("/ws/docpeek.toml", "[docsPreview]\ndocumentationFolder = \"a\"\n");
        let host = HostHandle::new(mock.clone());
        let settings = Settings::new(
            Some(PathBuf::from("/ws/docpeek.toml")),
            ConfigOverrides::default(),
        );

        assert_eq!(settings.read(&host).unwrap().documentation_folder, "a");
        mock.add_file("/ws/docpeek.toml", "[docsPreview]\ndocumentationFolder = \"b\"\n");
        assert_eq!(settings.read(&host).unwrap().documentation_folder, "b");
    }

    #[test]
    fn test_settings_without_file() {
        let host = HostHandle::new(MockHost::new());
        let settings = Settings::default();
        assert_eq!(settings.read(&host).unwrap(), Config::default());
    }
}
