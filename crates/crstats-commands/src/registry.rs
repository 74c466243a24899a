//! Command descriptors and the name-to-command registry.

use crate::context::CommandContext;
use async_trait::async_trait;
use crstats_common::Result;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The behaviour behind a command.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Runs the command. `tokens` holds the whitespace separated words of the
    /// message after the prefix, starting with the command name itself.
    async fn execute(&self, ctx: &CommandContext<'_>, tokens: &[String]) -> Result<()>;
}

/// A registered command.
#[derive(Clone)]
pub struct Command {
    /// Canonical name.
    pub name: String,
    /// Usage text shown by `help <command>`.
    pub help: String,
    /// Only the owner may run this command.
    pub owner_only: bool,
    /// Callers must hold one of the bits in `required_perms`.
    pub requires_perms: bool,
    /// Permission bits accepted for this command.
    pub required_perms: u64,
    handler: Arc<dyn CommandHandler>,
}

impl Command {
    /// Creates a command with no help text.
    pub fn new(
        name: impl Into<String>,
        required_perms: u64,
        requires_perms: bool,
        handler: impl CommandHandler + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            help: String::new(),
            owner_only: false,
            requires_perms,
            required_perms,
            handler: Arc::new(handler),
        }
    }

    /// Sets the usage text.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Restricts the command to the owner.
    #[must_use]
    pub const fn owner_only(mut self) -> Self {
        self.owner_only = true;
        self
    }

    /// The handler that runs this command.
    pub fn handler(&self) -> &dyn CommandHandler {
        self.handler.as_ref()
    }

    /// Whether a caller holding `user_perms` may run the command.
    ///
    /// The owner may run everything. Everyone else may run commands that require
    /// neither ownership nor permissions, and permission-gated commands when they
    /// hold at least one of the required bits.
    pub const fn is_authorized(&self, user_perms: u64, is_owner: bool) -> bool {
        let has_perms = user_perms & self.required_perms != 0;
        (!self.owner_only && !self.requires_perms) || (self.requires_perms && has_perms) || is_owner
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("owner_only", &self.owner_only)
            .field("requires_perms", &self.requires_perms)
            .field("required_perms", &format_args!("{:#x}", self.required_perms))
            .finish_non_exhaustive()
    }
}

/// Registry mapping lowercase names to commands.
///
/// Aliases point at the same [`Command`] as the canonical entry, so the stored
/// `name` always reflects the canonical name rather than the key it was found under.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<Command>>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command under its lowercased name, replacing any previous entry.
    pub fn register(&mut self, command: Command) -> Arc<Command> {
        let command = Arc::new(command);
        self.commands
            .insert(command.name.to_lowercase(), Arc::clone(&command));
        command
    }

    /// Makes `command` reachable under `name` as well.
    pub fn alias(&mut self, command: &Arc<Command>, name: &str) {
        self.commands.insert(name.to_lowercase(), Arc::clone(command));
    }

    /// Case-insensitive lookup, aliases included.
    pub fn lookup(&self, name: &str) -> Option<&Arc<Command>> {
        self.commands.get(&name.to_lowercase())
    }

    /// Lookup that only succeeds when the command's canonical name matches the key,
    /// so alias entries are not returned.
    pub fn resolve(&self, name: &str) -> Option<&Arc<Command>> {
        let key = name.to_lowercase();
        self.commands
            .get(&key)
            .filter(|command| command.name.to_lowercase() == key)
    }

    /// Distinct commands sorted by canonical name.
    pub fn commands(&self) -> Vec<&Arc<Command>> {
        let mut commands: Vec<&Arc<Command>> = Vec::new();
        for command in self.commands.values() {
            if !commands.iter().any(|c| Arc::ptr_eq(c, command)) {
                commands.push(command);
            }
        }
        commands.sort_by(|a, b| a.name.cmp(&b.name));
        commands
    }

    /// Number of lookup keys, aliases included.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
