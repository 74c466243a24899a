//! Test utilities and shared test helpers.
//!
//! Provides a recording [`ChatSession`] fake plus a few fixtures, so that the
//! dispatcher and command handlers can be exercised without a gateway connection.

use crate::{BotUser, ChannelId, ChatSession, CrStatsError, Embed, GuildInfo, Result, UserId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, Once};

static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

/// A reply the bot put on the wire during a test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    /// Channel the reply went to.
    pub channel: ChannelId,
    /// The reply itself.
    pub embed: Embed,
}

/// A [`ChatSession`] that records every outbound call.
#[derive(Debug)]
pub struct RecordingSession {
    sent: Mutex<Vec<Sent>>,
    statuses: Mutex<Vec<String>>,
    typing: Mutex<Vec<ChannelId>>,
    guilds: HashMap<ChannelId, GuildInfo>,
    default_permissions: Option<u64>,
    user: BotUser,
}

impl RecordingSession {
    /// Creates a session in which the fixture channel belongs to the fixture guild and
    /// every user holds all permissions.
    pub fn new() -> Self {
        let mut guilds = HashMap::new();
        guilds.insert(
            discord_fixtures::test_channel_id(),
            GuildInfo {
                id: discord_fixtures::test_guild_id(),
                name: "Test Guild".to_string(),
            },
        );

        Self {
            sent: Mutex::new(Vec::new()),
            statuses: Mutex::new(Vec::new()),
            typing: Mutex::new(Vec::new()),
            guilds,
            default_permissions: Some(u64::MAX),
            user: BotUser {
                id: discord_fixtures::test_bot_id(),
                name: "StatsBot".to_string(),
            },
        }
    }

    /// Sets the bitmask every user resolves to; `None` makes lookups fail.
    #[must_use]
    pub const fn with_default_permissions(mut self, bits: Option<u64>) -> Self {
        self.default_permissions = bits;
        self
    }

    /// Removes every channel-to-guild mapping so guild resolution fails.
    #[must_use]
    pub fn without_guilds(mut self) -> Self {
        self.guilds.clear();
        self
    }

    /// Everything sent so far.
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().expect("sent lock poisoned").clone()
    }

    /// Every embed sent so far.
    pub fn embeds(&self) -> Vec<Embed> {
        self.sent().into_iter().map(|sent| sent.embed).collect()
    }

    /// Every status text set so far.
    pub fn statuses(&self) -> Vec<String> {
        self.statuses.lock().expect("status lock poisoned").clone()
    }

    /// Channels the typing indicator was shown in.
    pub fn typing(&self) -> Vec<ChannelId> {
        self.typing.lock().expect("typing lock poisoned").clone()
    }
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatSession for RecordingSession {
    async fn send_embed(&self, channel: ChannelId, embed: Embed) -> Result<()> {
        self.sent
            .lock()
            .expect("sent lock poisoned")
            .push(Sent { channel, embed });
        Ok(())
    }

    async fn start_typing(&self, channel: ChannelId) -> Result<()> {
        self.typing.lock().expect("typing lock poisoned").push(channel);
        Ok(())
    }

    async fn resolve_guild(&self, channel: ChannelId) -> Result<GuildInfo> {
        self.guilds
            .get(&channel)
            .cloned()
            .ok_or_else(|| CrStatsError::discord(format!("channel {channel} is not in a guild")))
    }

    async fn channel_permissions(&self, user: UserId, _channel: ChannelId) -> Result<u64> {
        self.default_permissions
            .ok_or_else(|| CrStatsError::permission(format!("no permissions for {user}")))
    }

    async fn set_status(&self, status: &str) -> Result<()> {
        self.statuses
            .lock()
            .expect("status lock poisoned")
            .push(status.to_string());
        Ok(())
    }

    fn current_user(&self) -> BotUser {
        self.user.clone()
    }
}

/// Discord-related test fixtures.
pub mod discord_fixtures {
    use crate::{ChannelId, GuildId, IncomingMessage, UserId};

    /// Create a test channel ID.
    pub const fn test_channel_id() -> ChannelId {
        ChannelId(123_456_789_012_345_678)
    }

    /// Create a test guild ID.
    pub const fn test_guild_id() -> GuildId {
        GuildId(222_222_222_222_222_222)
    }

    /// Create a test user ID.
    pub const fn test_user_id() -> UserId {
        UserId(987_654_321_098_765_432)
    }

    /// Create the test owner ID.
    pub const fn test_owner_id() -> UserId {
        UserId(111_111_111_111_111_111)
    }

    /// Create the ID the test bot account is logged in as.
    pub const fn test_bot_id() -> UserId {
        UserId(175_928_847_299_117_063)
    }

    /// A message from the test user in the test channel.
    pub fn message(content: &str) -> IncomingMessage {
        message_from(test_user_id(), content)
    }

    /// A message from `author` in the test channel.
    pub fn message_from(author: UserId, content: &str) -> IncomingMessage {
        IncomingMessage::new(author, test_channel_id(), content)
            .with_author_name("tester")
    }
}

/// Remote statistics API response fixtures.
pub mod api_fixtures {
    /// A single-player statistics document.
    pub const fn player_stats_json() -> &'static str {
        r##"{"name":"Alice","tag":"#AAA","arena":"Arena 10","trophies":5000,"best_trophies":5200,"challenge_maxwins":12,"wins":300,"exp_level":13,"clan":"ClanX"}"##
    }

    /// A deck document with the given players, each holding exactly eight cards.
    pub fn deck_json(players: &[&str]) -> String {
        let entries: Vec<String> = players
            .iter()
            .map(|name| {
                let cards: Vec<String> = (1..=8)
                    .map(|c| format!(r#"{{"card":"{name} Card {c}"}}"#))
                    .collect();
                format!(r#"{{"name":"{name}","deck":[{}]}}"#, cards.join(","))
            })
            .collect();
        format!("[{}]", entries.join(","))
    }
}
