//! [`ChatSession`] over a serenity gateway context.
//!
//! Lookups try the cache first and fall back to the REST API when the cache
//! has not seen the channel, guild or member yet.

use async_trait::async_trait;
use crstats_common::{
    truncate_string, BotUser, ChannelId, ChatSession, CrStatsError, Embed, GuildId, GuildInfo,
    IncomingMessage, Result, UserId,
};
use poise::serenity_prelude as serenity;
use tracing::debug;

const EMBED_TITLE_LIMIT: usize = 256;
const EMBED_DESCRIPTION_LIMIT: usize = 4096;
const EMBED_FIELD_NAME_LIMIT: usize = 256;
const EMBED_FIELD_VALUE_LIMIT: usize = 1024;
const EMBED_FOOTER_LIMIT: usize = 2048;
const EMBED_FIELD_COUNT_LIMIT: usize = 25;

/// Discord rejects empty field names and values.
const BLANK: &str = "\u{200b}";

/// A [`ChatSession`] bound to one gateway event's context.
pub struct SerenitySession<'a> {
    ctx: &'a serenity::Context,
}

impl<'a> SerenitySession<'a> {
    /// Wraps the context of the event being handled.
    pub const fn new(ctx: &'a serenity::Context) -> Self {
        Self { ctx }
    }

    async fn guild_of(&self, channel: serenity::ChannelId) -> Result<serenity::GuildId> {
        #[allow(deprecated)]
        let cached = self.ctx.cache.channel(channel).map(|c| c.guild_id);
        if let Some(guild_id) = cached {
            return Ok(guild_id);
        }

        debug!("Channel {} not cached, fetching", channel);
        match channel
            .to_channel(&self.ctx.http)
            .await
            .map_err(|e| discord_error("Getting channel details", e))?
        {
            serenity::Channel::Guild(channel) => Ok(channel.guild_id),
            _ => Err(CrStatsError::discord(format!(
                "channel {channel} is not in a guild"
            ))),
        }
    }
}

#[async_trait]
impl ChatSession for SerenitySession<'_> {
    async fn send_embed(&self, channel: ChannelId, embed: Embed) -> Result<()> {
        let message = serenity::CreateMessage::new().embed(to_create_embed(&embed));
        serenity::ChannelId::new(channel.0)
            .send_message(&self.ctx.http, message)
            .await
            .map_err(|e| discord_error("Sending embed", e))?;
        Ok(())
    }

    async fn start_typing(&self, channel: ChannelId) -> Result<()> {
        serenity::ChannelId::new(channel.0)
            .broadcast_typing(&self.ctx.http)
            .await
            .map_err(|e| discord_error("Broadcasting typing", e))
    }

    async fn resolve_guild(&self, channel: ChannelId) -> Result<GuildInfo> {
        let guild_id = self.guild_of(serenity::ChannelId::new(channel.0)).await?;

        let cached = self.ctx.cache.guild(guild_id).map(|g| g.name.clone());
        let name = match cached {
            Some(name) => name,
            None => {
                guild_id
                    .to_partial_guild(&self.ctx.http)
                    .await
                    .map_err(|e| discord_error("Getting guild details", e))?
                    .name
            }
        };

        Ok(GuildInfo {
            id: GuildId(guild_id.get()),
            name,
        })
    }

    async fn channel_permissions(&self, user: UserId, channel: ChannelId) -> Result<u64> {
        let channel_id = serenity::ChannelId::new(channel.0);
        let user_id = serenity::UserId::new(user.0);

        #[allow(deprecated)]
        let cached_channel = self
            .ctx
            .cache
            .channel(channel_id)
            .map(|c| serenity::GuildChannel::clone(&c));
        if let Some(guild_channel) = cached_channel {
            if let Ok(perms) = guild_channel.permissions_for_user(&self.ctx.cache, user_id) {
                return Ok(perms.bits());
            }
        }

        debug!("Permissions of {} in {} not cached, fetching", user, channel);
        let guild_channel = match channel_id
            .to_channel(&self.ctx.http)
            .await
            .map_err(|e| discord_error("Getting channel details", e))?
        {
            serenity::Channel::Guild(channel) => channel,
            _ => {
                return Err(CrStatsError::permission(format!(
                    "channel {channel} is not in a guild"
                )))
            }
        };
        let guild = guild_channel
            .guild_id
            .to_partial_guild(&self.ctx.http)
            .await
            .map_err(|e| discord_error("Getting guild details", e))?;
        let member = guild
            .id
            .member(&self.ctx.http, user_id)
            .await
            .map_err(|e| discord_error("Getting member details", e))?;

        Ok(guild.user_permissions_in(&guild_channel, &member).bits())
    }

    async fn set_status(&self, status: &str) -> Result<()> {
        self.ctx
            .set_activity(Some(serenity::ActivityData::playing(status)));
        Ok(())
    }

    fn current_user(&self) -> BotUser {
        let user = self.ctx.cache.current_user();
        BotUser {
            id: UserId(user.id.get()),
            name: user.name.clone(),
        }
    }
}

fn discord_error(action: &str, err: serenity::Error) -> CrStatsError {
    CrStatsError::discord_with_source(format!("{action} failed"), err)
}

/// Converts a gateway message into the platform-neutral model.
pub fn incoming_message(message: &serenity::Message) -> IncomingMessage {
    let incoming = IncomingMessage::new(
        UserId(message.author.id.get()),
        ChannelId(message.channel_id.get()),
        message.content.clone(),
    )
    .with_author_name(message.author.name.clone());

    if message.author.bot {
        incoming.from_bot()
    } else {
        incoming
    }
}

fn non_blank(text: &str, limit: usize) -> String {
    if text.trim().is_empty() {
        BLANK.to_string()
    } else {
        truncate_string(text, limit)
    }
}

/// Builds the serenity embed for a reply, clamping every part to Discord's limits.
pub fn to_create_embed(embed: &Embed) -> serenity::CreateEmbed {
    let mut create = serenity::CreateEmbed::new().colour(embed.color);

    if let Some(title) = &embed.title {
        create = create.title(truncate_string(title, EMBED_TITLE_LIMIT));
    }
    if let Some(description) = &embed.description {
        create = create.description(truncate_string(description, EMBED_DESCRIPTION_LIMIT));
    }

    create = create.fields(embed.fields.iter().take(EMBED_FIELD_COUNT_LIMIT).map(|f| {
        (
            non_blank(&f.name, EMBED_FIELD_NAME_LIMIT),
            non_blank(&f.value, EMBED_FIELD_VALUE_LIMIT),
            f.inline,
        )
    }));

    if let Some(footer) = &embed.footer {
        create = create.footer(serenity::CreateEmbedFooter::new(truncate_string(
            footer,
            EMBED_FOOTER_LIMIT,
        )));
    }

    create
}
