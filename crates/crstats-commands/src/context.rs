//! Per-invocation context handed to command handlers.

use crate::guilds::GuildTracker;
use crate::registry::CommandRegistry;
use crate::replies::Replies;
use chrono::{DateTime, Utc};
use crstats_common::{ChatSession, Embed, IncomingMessage, Result};
use crstats_config::Config;
use tracing::warn;

/// Everything a handler may touch while running a command.
pub struct CommandContext<'a> {
    /// The messaging session to reply through.
    pub session: &'a dyn ChatSession,
    /// The message that invoked the command.
    pub message: &'a IncomingMessage,
    /// Process configuration.
    pub config: &'a Config,
    /// All registered commands.
    pub registry: &'a CommandRegistry,
    /// Standard reply templates.
    pub replies: &'a Replies,
    /// Guild membership counter.
    pub guilds: &'a GuildTracker,
    /// When the bot started.
    pub started_at: DateTime<Utc>,
}

impl CommandContext<'_> {
    /// Sends an embed to the invoking channel.
    pub async fn reply(&self, embed: Embed) -> Result<()> {
        self.session.send_embed(self.message.channel, embed).await
    }

    /// Shows the typing indicator in the invoking channel. Failures are only logged.
    pub async fn typing(&self) {
        if let Err(e) = self.session.start_typing(self.message.channel).await {
            warn!("Failed to show typing indicator in {}: {}", self.message.channel, e);
        }
    }

    /// Whether the invoking user is the configured owner.
    pub fn invoked_by_owner(&self) -> bool {
        self.config.is_owner(self.message.author)
    }
}
