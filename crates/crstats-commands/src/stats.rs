//! `stats <name>[,trophies]`: one player's summary.

use crate::context::CommandContext;
use crate::player_lookup::fetch_player_document;
use crate::registry::{Command, CommandHandler};
use async_trait::async_trait;
use crstats_api::{PlayerStats, StatsApi};
use crstats_common::{Embed, Result, COLOR_SUCCESS};
use std::sync::Arc;

/// Usage text for `help stats`.
pub const STATS_HELP: &str = "stats player[,trophies]\nExample: stats SomePlayer";

/// Replies with the nine-field summary of a player.
pub struct StatsCommand {
    api: Arc<dyn StatsApi>,
}

impl StatsCommand {
    /// Creates the handler over a statistics service.
    pub fn new(api: Arc<dyn StatsApi>) -> Self {
        Self { api }
    }

    /// The registrable command.
    pub fn command(api: Arc<dyn StatsApi>) -> Command {
        Command::new("stats", 0, false, Self::new(api)).with_help(STATS_HELP)
    }
}

#[async_trait]
impl CommandHandler for StatsCommand {
    async fn execute(&self, ctx: &CommandContext<'_>, tokens: &[String]) -> Result<()> {
        let Some(document) = fetch_player_document(ctx, self.api.as_ref(), tokens).await? else {
            return Ok(());
        };

        let stats = PlayerStats::from_json(&document);
        ctx.reply(
            Embed::new(COLOR_SUCCESS)
                .description(stats.render())
                .footer(ctx.replies.footer()),
        )
        .await
    }
}
