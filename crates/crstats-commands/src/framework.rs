//! Command set registration.

use crate::deck::DeckCommand;
use crate::help::HelpCommand;
use crate::info::InfoCommand;
use crate::registry::CommandRegistry;
use crate::stats::StatsCommand;
use crstats_api::StatsApi;
use std::sync::Arc;

/// Builds the registry holding every built-in command.
pub fn default_registry(api: Arc<dyn StatsApi>) -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(HelpCommand::command());
    registry.register(InfoCommand::command());
    registry.register(DeckCommand::command(Arc::clone(&api)));
    registry.register(StatsCommand::command(api));
    registry
}
