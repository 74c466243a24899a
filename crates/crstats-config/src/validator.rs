//! Runtime validation of a loaded configuration.

use crate::defaults::MAX_COOLDOWN_SECONDS;
use crate::schema::Config;
use crstats_common::{CrStatsError, Result};

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, reporting the first offending field.
    pub fn validate(config: &Config) -> Result<()> {
        if config.token.trim().is_empty() {
            return Err(CrStatsError::validation_field(
                "Discord token cannot be empty",
                "token",
            ));
        }

        if config.prefix.is_empty() {
            return Err(CrStatsError::validation_field(
                "Command prefix cannot be empty",
                "prefix",
            ));
        }

        if config.prefix.chars().any(char::is_whitespace) {
            return Err(CrStatsError::validation_field(
                "Command prefix cannot contain whitespace",
                "prefix",
            ));
        }

        if !config.owner_id.trim().is_empty() && config.owner().is_none() {
            return Err(CrStatsError::validation_field(
                format!("Owner id '{}' is not a numeric user id", config.owner_id),
                "owner_id",
            ));
        }

        if let Err(e) = url::Url::parse(&config.api.base_url) {
            return Err(CrStatsError::validation_field(
                format!("API base url '{}' is invalid: {e}", config.api.base_url),
                "api.base_url",
            ));
        }

        if config.api.timeout_seconds == 0 {
            return Err(CrStatsError::validation_field(
                "API timeout must be at least one second",
                "api.timeout_seconds",
            ));
        }

        if config.commands.cooldown_seconds > MAX_COOLDOWN_SECONDS {
            return Err(CrStatsError::validation_field(
                format!("Command cooldown cannot exceed {MAX_COOLDOWN_SECONDS} seconds"),
                "commands.cooldown_seconds",
            ));
        }

        Ok(())
    }
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate(self)
    }
}
