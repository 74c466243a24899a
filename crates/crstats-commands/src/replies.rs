//! Standardized reply embeds shared by the dispatcher and the handlers.

use chrono::{DateTime, Utc};
use crstats_common::{format_timestamp, Embed, COLOR_ERROR, COLOR_WARNING};

/// Reply templates carrying the process footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replies {
    footer: String,
}

impl Replies {
    /// Builds the templates for a process started at `booted_at`.
    pub fn new(booted_at: DateTime<Utc>) -> Self {
        Self {
            footer: format!(
                "Version {}\nLast Bot reboot: {}",
                env!("CARGO_PKG_VERSION"),
                format_timestamp(booted_at)
            ),
        }
    }

    /// The footer appended to error replies.
    pub fn footer(&self) -> &str {
        &self.footer
    }

    fn warning(&self, description: &str) -> Embed {
        Embed::new(COLOR_WARNING)
            .description(description)
            .footer(self.footer.as_str())
    }

    fn error(&self, description: &str) -> Embed {
        Embed::new(COLOR_ERROR)
            .description(description)
            .footer(self.footer.as_str())
    }

    /// The user issued a command before their window expired.
    pub fn cooldown(&self, wait_seconds: i64) -> Embed {
        self.warning("You calling commands so fast, please slow down!").field(
            "Required wait time:",
            format!("{wait_seconds} seconds"),
            false,
        )
    }

    /// No command matched the first word.
    pub fn unknown_command(&self, prefix: &str) -> Embed {
        self.warning("Unknown command.")
            .field("Check commands:", format!("{prefix}help"), false)
    }

    /// The caller's permissions could not be resolved.
    pub fn permission_lookup_failed(&self) -> Embed {
        self.warning("Can't parse permissions!")
    }

    /// The caller may not run the command.
    pub fn missing_permissions(&self) -> Embed {
        self.warning("You don't have permissions for this command!")
            .field("Required roles:", "👑Ownership", false)
    }

    /// A player command was issued without a name.
    pub fn missing_player_name(&self) -> Embed {
        self.error("You need to input a player name!")
    }

    /// The statistics service could not be reached.
    pub fn api_unreachable(&self) -> Embed {
        self.error("Can't get player from API!")
    }

    /// The service response held no usable player.
    pub fn player_not_found(&self) -> Embed {
        self.error("Sorry, can't find that player!")
    }
}
