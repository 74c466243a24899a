//! The messaging-session capability consumed by the command layer.

use crate::{BotUser, ChannelId, Embed, GuildInfo, Result, UserId};
use async_trait::async_trait;

/// Operations the dispatcher and command handlers need from the messaging platform.
///
/// Connection management, gateway events and platform rate limiting stay inside the
/// messaging library; implementations only translate these calls.
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// Sends a rich reply to a channel.
    async fn send_embed(&self, channel: ChannelId, embed: Embed) -> Result<()>;

    /// Shows the typing indicator in a channel.
    async fn start_typing(&self, channel: ChannelId) -> Result<()>;

    /// Resolves the guild a channel belongs to.
    async fn resolve_guild(&self, channel: ChannelId) -> Result<GuildInfo>;

    /// Returns the permission bitmask a user holds in a channel.
    async fn channel_permissions(&self, user: UserId, channel: ChannelId) -> Result<u64>;

    /// Replaces the bot's presence status text.
    async fn set_status(&self, status: &str) -> Result<()>;

    /// Returns the account the bot is logged in as.
    fn current_user(&self) -> BotUser;
}
