//! `info`: the bot card.

use crate::context::CommandContext;
use crate::registry::{Command, CommandHandler};
use async_trait::async_trait;
use chrono::Utc;
use crstats_common::{
    code_block, format_duration, format_timestamp, snowflake_created_at, Embed, Result,
    COLOR_SUCCESS,
};

/// Usage text for `help info`.
pub const INFO_HELP: &str = "info\nShows who runs the bot and where its data comes from.";

const CREATOR: &str = "Zile42O#0420";

/// Shows information about the bot.
pub struct InfoCommand;

impl InfoCommand {
    /// The registrable command.
    pub fn command() -> Command {
        Command::new("info", 0, false, Self).with_help(INFO_HELP)
    }
}

#[async_trait]
impl CommandHandler for InfoCommand {
    async fn execute(&self, ctx: &CommandContext<'_>, _tokens: &[String]) -> Result<()> {
        ctx.typing().await;

        let bot = ctx.session.current_user();
        let created = format_timestamp(snowflake_created_at(bot.id.0));
        let uptime = format_duration(Utc::now() - ctx.started_at);

        let embed = Embed::new(COLOR_SUCCESS)
            .title(format!("{} Player Stats - Bot", ctx.config.game))
            .field(
                "API",
                code_block("Custom API from Offical Clash Royale Developer"),
                true,
            )
            .field("API Access", code_block(&format!("Contact -> {CREATOR}")), true)
            .field("Bot Name:", code_block(&bot.name), true)
            .field("Creator:", code_block(CREATOR), true)
            .field("Creation Date:", code_block(&created), true)
            .field("Global Prefix:", code_block(&ctx.config.prefix), true)
            .field("Programming Language:", code_block("Rust"), true)
            .field("Library:", code_block("Serenity"), true)
            .field(
                "Guilds (Servers):",
                code_block(&ctx.guilds.count().to_string()),
                true,
            )
            .field("Uptime:", code_block(&uptime), true)
            .field(
                "42O's discord:",
                "discord.gg/42o or discord.420-clan.com",
                false,
            );

        ctx.reply(embed).await
    }
}
