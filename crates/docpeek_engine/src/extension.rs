/* 📖 # Why an explicit Extension value instead of global registration?

Editors register commands in a process-wide registry when an extension activates.
Here activation returns a value that owns its registry, and deactivation consumes
it. Nothing global is touched, so tests can activate as many independent
instances as they like.
*/

use std::collections::BTreeMap;

use tracing::{debug, info};

use docpeek_base::{DocpeekResult, HostHandle, err};

use crate::command::{CommandOutcome, open_docs_for_current_file};
use crate::config::Settings;

/// Command id of the "open documentation for the current file" action.
pub const OPEN_FOR_CURRENT_FILE: &str = "docsPreview.openForCurrentFile";

pub type CommandHandler = fn(&HostHandle, &Settings) -> DocpeekResult<CommandOutcome>;

/// Commands registered by an activated extension, keyed by id.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandHandler>,
}

impl CommandRegistry {
    pub fn register(&mut self, id: impl Into<String>, handler: CommandHandler) -> DocpeekResult<()> {
        let id = id.into();
        if self.commands.contains_key(&id) {
            return Err(err!("Command '{}' is already registered", id));
        }
        debug!(command = %id, "registered command");
        self.commands.insert(id, handler);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<CommandHandler> {
        self.commands.get(id).copied()
    }

    /// Registered command ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop every registration.
    pub fn dispose(&mut self) {
        self.commands.clear();
    }
}

/// An activated docpeek instance bound to a host.
#[derive(Debug)]
pub struct Extension {
    host: HostHandle,
    settings: Settings,
    registry: CommandRegistry,
}

impl Extension {
    pub fn activate(host: HostHandle, settings: Settings) -> DocpeekResult<Self> {
        let mut registry = CommandRegistry::default();
        registry.register(OPEN_FOR_CURRENT_FILE, open_docs_for_current_file)?;
        info!(commands = registry.len(), "extension activated");
        Ok(Self {
            host,
            settings,
            registry,
        })
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn execute_command(&self, id: &str) -> DocpeekResult<CommandOutcome> {
        let handler = self
            .registry
            .get(id)
            .ok_or_else(|| err!("Unknown command '{}'", id))?;
        debug!(command = id, "executing command");
        handler(&self.host, &self.settings)
    }

    pub fn deactivate(mut self) {
        self.registry.dispose();
        info!("extension deactivated");
    }
}
