//! `help [command]`: command listing and per-command usage.

use crate::context::CommandContext;
use crate::registry::{Command, CommandHandler};
use async_trait::async_trait;
use crstats_common::{Embed, Result, COLOR_SUCCESS};

/// Usage text for `help help`.
pub const HELP_HELP: &str = "help [command]\nExample: help deck";

/// Lists commands, or explains one of them.
pub struct HelpCommand;

impl HelpCommand {
    /// The registrable command.
    pub fn command() -> Command {
        Command::new("help", 0, false, Self).with_help(HELP_HELP)
    }
}

fn command_embed(command: &Command, footer: &str) -> Embed {
    Embed::new(COLOR_SUCCESS)
        .field(command.name.as_str(), command.help.as_str(), false)
        .footer(footer)
}

fn listing_embed(ctx: &CommandContext<'_>) -> Embed {
    let is_owner = ctx.invoked_by_owner();
    let names: Vec<String> = ctx
        .registry
        .commands()
        .into_iter()
        .filter(|command| is_owner || !command.owner_only)
        .map(|command| format!("`{}`", command.name))
        .collect();

    Embed::new(COLOR_SUCCESS).field(
        format!("{} Stats Bot Help", ctx.config.game),
        format!(
            "{}\n\nUse `{}help [command]` for detailed info about a command.",
            names.join(", "),
            ctx.config.prefix
        ),
        false,
    )
}

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn execute(&self, ctx: &CommandContext<'_>, tokens: &[String]) -> Result<()> {
        ctx.typing().await;

        if let [_, name] = tokens {
            if let Some(command) = ctx.registry.lookup(name) {
                return ctx.reply(command_embed(command, ctx.replies.footer())).await;
            }
        }

        ctx.reply(listing_embed(ctx)).await
    }
}
