//! Configuration schema definitions using serde.

use crstats_common::UserId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure, stored as `config.json`.
///
/// The five top-level scalar fields keep the names the bot has always used on
/// disk; the nested sections are optional and fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Game label shown in the presence status and help title.
    pub game: String,
    /// Global command prefix.
    pub prefix: String,
    /// Discord bot token.
    pub token: String,
    /// User ID of the bot owner; empty when nobody owns the bot.
    pub owner_id: String,
    /// Number of runtime worker threads; `0` keeps the runtime default.
    pub maxproc: usize,
    /// Remote statistics API settings.
    pub api: ApiConfig,
    /// Command dispatch settings.
    pub commands: CommandsConfig,
}

/// Remote statistics API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Endpoint queried with `name` and optional `trophies` parameters.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

/// Command dispatch configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// Seconds a user must wait between accepted commands.
    pub cooldown_seconds: u64,
    /// Command invoked after the unknown-command reply. Disabled when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_command: Option<String>,
}

impl Config {
    /// The configured owner, if any.
    pub fn owner(&self) -> Option<UserId> {
        if self.owner_id.trim().is_empty() {
            return None;
        }
        self.owner_id.parse().ok()
    }

    /// Whether `user` is the configured owner.
    pub fn is_owner(&self, user: UserId) -> bool {
        self.owner() == Some(user)
    }

    /// Presence status text for the given guild count.
    pub fn status_line(&self, guilds: usize) -> String {
        format!("{} | {}help | Servers: {}", self.game, self.prefix, guilds)
    }
}

impl ApiConfig {
    /// Request timeout as a [`Duration`].
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl CommandsConfig {
    /// Cooldown window as a [`Duration`].
    pub const fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_seconds)
    }
}
