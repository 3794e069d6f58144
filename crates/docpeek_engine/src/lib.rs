pub mod command;
pub mod config;
pub mod expand;
pub mod extension;
pub mod resolver;

pub use command::{CommandOutcome, not_found_message, open_docs_for_current_file};
pub use config::{Config, ConfigOverrides, Settings, load_config};
pub use expand::{WORKSPACE_FOLDER_PLACEHOLDER, expand_documentation_root};
pub use extension::{CommandRegistry, Extension, OPEN_FOR_CURRENT_FILE};
pub use resolver::{
    ResolutionRequest, find_file_recursively, normalize_extension, resolve_documentation,
    resolve_documentation_for_file, target_base_name,
};
