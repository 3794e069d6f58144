use std::path::PathBuf;

use tracing::{debug, info, instrument, warn};

use docpeek_base::{DocpeekResult, HostHandle, ResultExt};

use crate::config::{Config, Settings};
use crate::resolver::{ResolutionRequest, resolve_documentation, target_base_name};

pub const NO_ACTIVE_FILE_MESSAGE: &str = "No active editor.";

/// What a single invocation of the open command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Nothing was open; the user was told so.
    NoActiveFile,
    /// The documentation file was opened in a preview.
    Opened { path: PathBuf, to_side: bool },
    /// No documentation file matched; the user was warned.
    NotFound { base_name: String },
}

/// Warning shown when no documentation file matches.
///
/// Folder and extension are quoted as configured, before expansion or normalization.
pub fn not_found_message(base_name: &str, config: &Config) -> String {
    format!(
        "No docs found for \"{}\" in \"{}\" (including subfolders) with extension \"{}\".",
        base_name, config.documentation_folder, config.documentation_extension
    )
}

/// Open the documentation that belongs to the host's active file.
///
/// Absence of an active file or of documentation is reported to the user and
/// returned as an outcome. Only configuration and preview failures are errors.
#[instrument(skip(host, settings))]
pub fn open_docs_for_current_file(
    host: &HostHandle,
    settings: &Settings,
) -> DocpeekResult<CommandOutcome> {
    let Some(active_file) = host.active_file() else {
        host.show_information_message(NO_ACTIVE_FILE_MESSAGE);
        return Ok(CommandOutcome::NoActiveFile);
    };
    debug!(active_file = %active_file.display(), "opening documentation");

    let config = settings.read(host)?;
    let base_name = target_base_name(&active_file);

    let resolved = match ResolutionRequest::for_file(host, &active_file) {
        Some(request) => resolve_documentation(
            host,
            &base_name,
            &config.documentation_extension,
            &request.documentation_root(&config),
        ),
        None => {
            debug!("active file is not inside a workspace folder");
            None
        }
    };

    match resolved {
        Some(path) => {
            let to_side = config.open_preview_to_side;
            host.show_preview(&path, to_side)
                .with_context(|| format!("Failed to open preview of {}", path.display()))?;
            info!(path = %path.display(), to_side, "opened documentation preview");
            Ok(CommandOutcome::Opened { path, to_side })
        }
        None => {
            let message = not_found_message(&base_name, &config);
            warn!("{}", message);
            host.show_warning_message(&message);
            Ok(CommandOutcome::NotFound { base_name })
        }
    }
}
