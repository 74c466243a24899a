//! Common type definitions and newtype wrappers for domain modeling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A Discord channel ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A Discord user ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A Discord guild (server) ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuildId(pub u64);

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A text message received from the messaging platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Author of the message.
    pub author: UserId,
    /// Display name of the author, used for logging only.
    pub author_name: String,
    /// Whether the author is a bot account.
    pub author_is_bot: bool,
    /// Channel the message was posted in.
    pub channel: ChannelId,
    /// Raw message text.
    pub content: String,
}

impl IncomingMessage {
    /// Creates a message from a human author.
    pub fn new(author: UserId, channel: ChannelId, content: impl Into<String>) -> Self {
        Self {
            author,
            author_name: String::new(),
            author_is_bot: false,
            channel,
            content: content.into(),
        }
    }

    /// Marks the author as a bot account.
    #[must_use]
    pub const fn from_bot(mut self) -> Self {
        self.author_is_bot = true;
        self
    }

    /// Sets the author's display name.
    #[must_use]
    pub fn with_author_name(mut self, name: impl Into<String>) -> Self {
        self.author_name = name.into();
        self
    }
}

/// Minimal guild details resolved through the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildInfo {
    /// Guild ID.
    pub id: GuildId,
    /// Guild name.
    pub name: String,
}

/// The account the bot is logged in as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotUser {
    /// Bot user ID.
    pub id: UserId,
    /// Bot username.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_parses_snowflake() {
        let id: UserId = " 987654321098765432 ".parse().unwrap();
        assert_eq!(id, UserId(987_654_321_098_765_432));
        assert!("not-a-number".parse::<UserId>().is_err());
    }

    #[test]
    fn test_incoming_message_builders() {
        let msg = IncomingMessage::new(UserId(1), ChannelId(2), "!help")
            .with_author_name("alice")
            .from_bot();

        assert_eq!(msg.channel, ChannelId(2));
        assert_eq!(msg.author_name, "alice");
        assert!(msg.author_is_bot);
        assert_eq!(msg.content, "!help");
    }
}
