/* 📖 # How does the command line stand in for an editor?

An editor knows which file is active and which workspace folders are open. On the
command line both are arguments:

    docpeek --workspace ~/project open src/widget.ts
    docpeek resolve src/widget.ts --json

Without `--workspace` the current directory is the only workspace folder. The
configuration file defaults to `docpeek.toml` in the current directory and is
optional; an explicitly given `--config` must exist.

Exit codes:
- 0: documentation opened (open) or found (resolve)
- 1: no documentation found, no active file, or an error
*/

use std::env;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::debug;

use docpeek_base::tracing::init_tracing;
use docpeek_base::{DocpeekError, DocpeekResult, HostHandle, RealHost, err, normalize_path};
use docpeek_engine::{
    CommandOutcome, ConfigOverrides, Extension, OPEN_FOR_CURRENT_FILE, Settings,
    not_found_message, resolve_documentation_for_file, target_base_name,
};

const DEFAULT_CONFIG_FILE: &str = "docpeek.toml";

#[derive(Debug, Parser)]
#[command(
    name = "docpeek",
    version,
    about = "Open the documentation page that belongs to a source file"
)]
struct Cli {
    /// Workspace folder; may be repeated. Defaults to the current directory.
    #[arg(short, long = "workspace", global = true)]
    workspaces: Vec<PathBuf>,

    /// Configuration file with a [docsPreview] table.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Documentation folder: relative, absolute, or containing ${workspaceFolder}.
    #[arg(long, global = true)]
    docs_folder: Option<String>,

    /// Documentation file extension, leading dot optional.
    #[arg(long, global = true)]
    extension: Option<String>,

    /// Open the preview beside the editor (true) or in place (false).
    #[arg(long, global = true)]
    open_to_side: Option<bool>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open the documentation for FILE in a preview.
    Open {
        /// The active source file. Without it there is nothing to open.
        file: Option<PathBuf>,
    },
    /// Print the documentation path for FILE without opening it.
    Resolve {
        file: PathBuf,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            documentation_folder: self.docs_folder.clone(),
            documentation_extension: self.extension.clone(),
            open_preview_to_side: self.open_to_side,
        }
    }
}

/// Absolute form of a command-line path with `.` and `..` resolved.
fn absolute(path: &Path) -> DocpeekResult<PathBuf> {
    let absolute =
        std::path::absolute(path).map_err(|e| Box::new(DocpeekError::file_error(path, e)))?;
    Ok(normalize_path(&absolute))
}

fn workspace_folders(cli: &Cli, current_dir: &Path) -> DocpeekResult<Vec<PathBuf>> {
    if cli.workspaces.is_empty() {
        return Ok(vec![current_dir.to_path_buf()]);
    }
    cli.workspaces.iter().map(|folder| absolute(folder)).collect()
}

fn settings(cli: &Cli, current_dir: &Path) -> DocpeekResult<Settings> {
    let config_path = match &cli.config {
        Some(path) => {
            let path = absolute(path)?;
            if !path.is_file() {
                return Err(err!("Configuration file not found: {}", path.display()));
            }
            path
        }
        None => current_dir.join(DEFAULT_CONFIG_FILE),
    };
    Ok(Settings::new(Some(config_path), cli.overrides()))
}

fn run(cli: Cli) -> DocpeekResult<i32> {
    let current_dir =
        env::current_dir().map_err(|e| Box::new(DocpeekError::file_error(".", e)))?;
    let folders = workspace_folders(&cli, &current_dir)?;
    let settings = settings(&cli, &current_dir)?;
    debug!(workspace_folders = ?folders, settings = ?settings, "starting");

    match &cli.command {
        Command::Open { file } => {
            let active_file = file.as_deref().map(absolute).transpose()?;
            let host = HostHandle::new(RealHost::new(folders, active_file));
            let extension = Extension::activate(host, settings)?;
            let outcome = extension.execute_command(OPEN_FOR_CURRENT_FILE);
            extension.deactivate();
            Ok(match outcome? {
                CommandOutcome::Opened { .. } => 0,
                CommandOutcome::NoActiveFile | CommandOutcome::NotFound { .. } => 1,
            })
        }
        Command::Resolve { file, json } => {
            let source = absolute(file)?;
            let host = HostHandle::new(RealHost::new(folders, None));
            let config = settings.read(&host)?;
            let found = resolve_documentation_for_file(&host, &config, &source);
            if *json {
                println!("{}", resolution_json(&source, found.as_deref()));
            } else if let Some(path) = &found {
                println!("{}", path.display());
            } else {
                eprintln!("{}", not_found_message(&target_base_name(&source), &config));
            }
            Ok(if found.is_some() { 0 } else { 1 })
        }
    }
}

fn resolution_json(source: &Path, documentation: Option<&Path>) -> serde_json::Value {
    serde_json::json!({
        "source": source.to_string_lossy(),
        "documentation": documentation.map(|path| path.to_string_lossy()),
    })
}

fn main() {
    if let Err(e) = init_tracing() {
        eprintln!("Warning: {}", e);
    }

    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            debug!("{:?}", e);
            1
        }
    };
    process::exit(code);
}
