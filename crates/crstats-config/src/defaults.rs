//! Default values for every configuration section.

use crate::schema::{ApiConfig, CommandsConfig, Config};

/// Endpoint of the statistics API the bot was written against.
pub const DEFAULT_API_URL: &str = "https://420-clan.com/zile42o/v2/clashroyale_api.php";

/// Default cooldown between accepted commands, in seconds.
pub const DEFAULT_COOLDOWN_SECONDS: u64 = 3;

/// Longest cooldown a configuration may ask for, one day.
pub const MAX_COOLDOWN_SECONDS: u64 = 86_400;

/// Default statistics API request timeout, in seconds.
pub const DEFAULT_API_TIMEOUT_SECONDS: u64 = 10;

impl Default for Config {
    fn default() -> Self {
        Self {
            game: "Clash Royale".to_string(),
            prefix: "!".to_string(),
            token: String::new(),
            owner_id: String::new(),
            maxproc: 0,
            api: ApiConfig::default(),
            commands: CommandsConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: DEFAULT_API_TIMEOUT_SECONDS,
        }
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            cooldown_seconds: DEFAULT_COOLDOWN_SECONDS,
            fallback_command: None,
        }
    }
}
