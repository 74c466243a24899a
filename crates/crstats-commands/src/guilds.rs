//! Guild membership counter and presence status updates.

use crstats_common::{ChatSession, GuildId, GuildInfo};
use crstats_config::Config;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{error, info, warn};

/// Counts the guilds the bot currently belongs to.
#[derive(Debug, Default)]
pub struct GuildTracker {
    count: AtomicUsize,
}

impl GuildTracker {
    /// Creates a tracker with a zero count.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current number of guilds.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Records a guild becoming available to the bot and refreshes the status line.
    ///
    /// Unavailable guilds are logged and leave the count unchanged.
    pub async fn guild_joined(
        &self,
        session: &dyn ChatSession,
        config: &Config,
        guild: &GuildInfo,
        unavailable: bool,
    ) -> usize {
        if unavailable {
            error!("Unavailable to join guild {}", guild.id);
            return self.count();
        }

        let count = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        info!("Joined server id: {} name: {}", guild.id, guild.name);
        refresh_status(session, config, count).await;
        count
    }

    /// Records the bot leaving a guild and refreshes the status line.
    ///
    /// A guild that merely went unavailable (an outage) is logged and keeps its slot.
    pub async fn guild_left(
        &self,
        session: &dyn ChatSession,
        config: &Config,
        guild: GuildId,
        name: Option<&str>,
        unavailable: bool,
    ) -> usize {
        if unavailable {
            match name {
                Some(name) => error!("Unavailable guild id: {} name: {}", guild, name),
                None => error!("Unavailable guild id: {}", guild),
            }
            return self.count();
        }

        let previous = self
            .count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| Some(n.saturating_sub(1)))
            .unwrap_or_default();
        let count = previous.saturating_sub(1);

        refresh_status(session, config, count).await;
        info!(
            "Left guild id: {} name: {}",
            guild,
            name.unwrap_or("<unknown>")
        );
        count
    }
}

async fn refresh_status(session: &dyn ChatSession, config: &Config, count: usize) {
    if let Err(e) = session.set_status(&config.status_line(count)).await {
        warn!("Can't set bot game status: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crstats_common::test_utils::{discord_fixtures, RecordingSession};

    fn guild(id: u64) -> GuildInfo {
        GuildInfo {
            id: GuildId(id),
            name: format!("Guild {id}"),
        }
    }

    #[tokio::test]
    async fn test_join_increments_and_sets_status() {
        let session = RecordingSession::new();
        let config = Config::default();
        let tracker = GuildTracker::new();

        assert_eq!(tracker.guild_joined(&session, &config, &guild(1), false).await, 1);
        assert_eq!(tracker.guild_joined(&session, &config, &guild(2), false).await, 2);

        assert_eq!(
            session.statuses(),
            vec![
                "Clash Royale | !help | Servers: 1".to_string(),
                "Clash Royale | !help | Servers: 2".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_unavailable_events_leave_count_unchanged() {
        let session = RecordingSession::new();
        let config = Config::default();
        let tracker = GuildTracker::new();
        tracker.guild_joined(&session, &config, &guild(1), false).await;

        tracker.guild_joined(&session, &config, &guild(2), true).await;
        tracker
            .guild_left(&session, &config, GuildId(1), Some("Guild 1"), true)
            .await;

        assert_eq!(tracker.count(), 1);
        assert_eq!(session.statuses().len(), 1);
    }

    #[tokio::test]
    async fn test_leave_decrements_and_saturates() {
        let session = RecordingSession::new();
        let config = Config::default();
        let tracker = GuildTracker::new();
        tracker.guild_joined(&session, &config, &guild(1), false).await;

        let guild_id = discord_fixtures::test_guild_id();
        assert_eq!(tracker.guild_left(&session, &config, guild_id, None, false).await, 0);
        assert_eq!(tracker.guild_left(&session, &config, guild_id, None, false).await, 0);
        assert_eq!(
            session.statuses().last().map(String::as_str),
            Some("Clash Royale | !help | Servers: 0")
        );
    }
}
