//! Inbound message dispatch.
//!
//! Every message walks the same linear path: author and prefix-repetition
//! filters, guild resolution, prefix stripping, tokenizing, the per-user
//! cooldown, command resolution, authorization and finally the handler. Each
//! step that stops early reports why through [`DispatchOutcome`].

use crate::context::CommandContext;
use crate::cooldown::CooldownTable;
use crate::guilds::GuildTracker;
use crate::registry::{Command, CommandRegistry};
use crate::replies::Replies;
use chrono::{DateTime, Utc};
use crstats_common::{ChannelId, ChatSession, Embed, GuildInfo, IncomingMessage};
use crstats_config::Config;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Why a message was dropped without a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Sent by a bot account.
    BotAuthor,
    /// The prefix occurs more than once in the text.
    RepeatedPrefix,
    /// The channel does not resolve to a guild.
    NoGuild,
    /// The text does not start with a prefix.
    NoPrefix,
    /// Nothing but whitespace after the prefix.
    Empty,
}

/// What happened to an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Dropped silently.
    Ignored(IgnoreReason),
    /// The author is on cooldown; a warning was sent.
    RateLimited,
    /// No command by that name; an unknown-command reply was sent.
    UnknownCommand,
    /// The author's permissions could not be resolved.
    PermissionLookupFailed,
    /// The author may not run the command.
    Denied,
    /// The named command's handler ran.
    Executed(String),
}

/// Owns the command state and routes inbound messages to handlers.
pub struct Dispatcher {
    config: Arc<Config>,
    registry: CommandRegistry,
    cooldowns: CooldownTable,
    replies: Replies,
    guilds: Arc<GuildTracker>,
    started_at: DateTime<Utc>,
}

impl Dispatcher {
    /// Creates a dispatcher for a process started at `started_at`.
    pub fn new(
        config: Arc<Config>,
        registry: CommandRegistry,
        guilds: Arc<GuildTracker>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let cooldowns = CooldownTable::new(config.commands.cooldown());
        Self {
            config,
            registry,
            cooldowns,
            replies: Replies::new(started_at),
            guilds,
            started_at,
        }
    }

    /// Process configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Guild counter shared with the event handler.
    pub fn guilds(&self) -> &GuildTracker {
        &self.guilds
    }

    /// Handles a message received now.
    pub async fn handle_message(
        &self,
        session: &dyn ChatSession,
        message: &IncomingMessage,
    ) -> DispatchOutcome {
        self.dispatch_at(session, message, Utc::now()).await
    }

    /// Handles a message as if received at `now`.
    pub async fn dispatch_at(
        &self,
        session: &dyn ChatSession,
        message: &IncomingMessage,
        now: DateTime<Utc>,
    ) -> DispatchOutcome {
        let prefix = self.config.prefix.as_str();

        if message.author_is_bot {
            return DispatchOutcome::Ignored(IgnoreReason::BotAuthor);
        }
        if message.content.matches(prefix).count() > 1 {
            return DispatchOutcome::Ignored(IgnoreReason::RepeatedPrefix);
        }

        let guild = match session.resolve_guild(message.channel).await {
            Ok(guild) => guild,
            Err(e) => {
                debug!("Ignoring message in channel {}: {}", message.channel, e);
                return DispatchOutcome::Ignored(IgnoreReason::NoGuild);
            }
        };

        let rest = if let Some(rest) = message.content.strip_prefix(prefix) {
            rest
        } else {
            let active = self.active_prefix(session, message.channel).await;
            match active.and_then(|p| message.content.strip_prefix(p)) {
                Some(rest) => rest,
                None => return DispatchOutcome::Ignored(IgnoreReason::NoPrefix),
            }
        };

        let tokens: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
        if tokens.is_empty() {
            return DispatchOutcome::Ignored(IgnoreReason::Empty);
        }

        if let Err(e) = self.cooldowns.check(message.author, now) {
            debug!("{}", e);
            let wait = self.cooldowns.window().num_seconds();
            self.send(session, message.channel, self.replies.cooldown(wait))
                .await;
            return DispatchOutcome::RateLimited;
        }

        debug!(
            "Author ID: {}, Author Username: {}, Guild ID: {}, Server: {}, Command: {}",
            message.author, message.author_name, guild.id, guild.name, message.content
        );

        // Whitespace between the prefix and the name never matches a command.
        let command = if rest.starts_with(char::is_whitespace) {
            None
        } else {
            self.registry.resolve(&tokens[0])
        };

        match command {
            Some(command) => self.authorize_and_run(session, message, &guild, command, &tokens).await,
            None => {
                self.send(
                    session,
                    message.channel,
                    self.replies.unknown_command(prefix),
                )
                .await;
                self.run_fallback(session, message, &tokens).await;
                DispatchOutcome::UnknownCommand
            }
        }
    }

    /// Resolves the prefix that applies in a channel. The global prefix applies
    /// everywhere, but only in channels whose guild can be resolved. Unprefixed
    /// text never gets a reply, so a failed lookup is only logged.
    async fn active_prefix(&self, session: &dyn ChatSession, channel: ChannelId) -> Option<&str> {
        match session.resolve_guild(channel).await {
            Ok(_) => Some(self.config.prefix.as_str()),
            Err(e) => {
                error!("Getting guild details for channel {} failed: {}", channel, e);
                None
            }
        }
    }

    async fn authorize_and_run(
        &self,
        session: &dyn ChatSession,
        message: &IncomingMessage,
        guild: &GuildInfo,
        command: &Command,
        tokens: &[String],
    ) -> DispatchOutcome {
        let perms = match session
            .channel_permissions(message.author, message.channel)
            .await
        {
            Ok(perms) => perms,
            Err(e) => {
                error!("Getting permission details err: {}", e);
                self.send(
                    session,
                    message.channel,
                    self.replies.permission_lookup_failed(),
                )
                .await;
                return DispatchOutcome::PermissionLookupFailed;
            }
        };

        if !command.is_authorized(perms, self.config.is_owner(message.author)) {
            debug!(
                "User {} denied '{}' in guild {}",
                message.author, command.name, guild.id
            );
            self.send(session, message.channel, self.replies.missing_permissions())
                .await;
            return DispatchOutcome::Denied;
        }

        self.run(session, message, command, tokens).await;
        DispatchOutcome::Executed(command.name.clone())
    }

    async fn run_fallback(&self, session: &dyn ChatSession, message: &IncomingMessage, tokens: &[String]) {
        let Some(name) = self.config.commands.fallback_command.as_deref() else {
            return;
        };
        match self.registry.lookup(name) {
            Some(command) => self.run(session, message, command, tokens).await,
            None => warn!("Fallback command '{}' is not registered", name),
        }
    }

    async fn run(
        &self,
        session: &dyn ChatSession,
        message: &IncomingMessage,
        command: &Command,
        tokens: &[String],
    ) {
        let ctx = CommandContext {
            session,
            message,
            config: &self.config,
            registry: &self.registry,
            replies: &self.replies,
            guilds: &self.guilds,
            started_at: self.started_at,
        };

        if let Err(e) = command.handler().execute(&ctx, tokens).await {
            error!("Command '{}' failed: {}", command.name, e);
        }
    }

    async fn send(&self, session: &dyn ChatSession, channel: ChannelId, embed: Embed) {
        if let Err(e) = session.send_embed(channel, embed).await {
            error!("Failed to send message to channel {}: {}", channel, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CommandHandler;
    use async_trait::async_trait;
    use crstats_common::test_utils::{discord_fixtures, RecordingSession};
    use crstats_common::{BotUser, Result, UserId};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CommandHandler for Counting {
        async fn execute(&self, _ctx: &CommandContext<'_>, _tokens: &[String]) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Resolves the guild once, then fails every later lookup.
    struct FlakyGuilds {
        inner: RecordingSession,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl ChatSession for FlakyGuilds {
        async fn send_embed(&self, channel: ChannelId, embed: Embed) -> Result<()> {
            self.inner.send_embed(channel, embed).await
        }

        async fn start_typing(&self, channel: ChannelId) -> Result<()> {
            self.inner.start_typing(channel).await
        }

        async fn resolve_guild(&self, channel: ChannelId) -> Result<GuildInfo> {
            if self.lookups.fetch_add(1, Ordering::SeqCst) == 0 {
                self.inner.resolve_guild(channel).await
            } else {
                Err(crstats_common::CrStatsError::discord("guild went away"))
            }
        }

        async fn channel_permissions(&self, user: UserId, channel: ChannelId) -> Result<u64> {
            self.inner.channel_permissions(user, channel).await
        }

        async fn set_status(&self, status: &str) -> Result<()> {
            self.inner.set_status(status).await
        }

        fn current_user(&self) -> BotUser {
            self.inner.current_user()
        }
    }

    fn dispatcher_with(config: Config, commands: Vec<Command>) -> Dispatcher {
        let mut registry = CommandRegistry::new();
        for command in commands {
            registry.register(command);
        }
        Dispatcher::new(
            Arc::new(config),
            registry,
            Arc::new(GuildTracker::new()),
            Utc::now(),
        )
    }

    fn ping(calls: &Arc<AtomicUsize>) -> Command {
        Command::new(
            "ping",
            0,
            false,
            Counting {
                calls: Arc::clone(calls),
            },
        )
    }

    #[tokio::test]
    async fn test_repeated_prefix_is_ignored() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher_with(Config::default(), vec![ping(&calls)]);
        let session = RecordingSession::new();

        let outcome = dispatcher
            .handle_message(&session, &discord_fixtures::message("!ping !"))
            .await;

        assert_eq!(outcome, DispatchOutcome::Ignored(IgnoreReason::RepeatedPrefix));
        assert!(session.sent().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unresolvable_guild_is_ignored() {
        let dispatcher = dispatcher_with(Config::default(), vec![]);
        let session = RecordingSession::new().without_guilds();

        let outcome = dispatcher
            .handle_message(&session, &discord_fixtures::message("!ping"))
            .await;

        assert_eq!(outcome, DispatchOutcome::Ignored(IgnoreReason::NoGuild));
        assert!(session.sent().is_empty());
    }

    #[tokio::test]
    async fn test_bare_prefix_is_ignored() {
        let dispatcher = dispatcher_with(Config::default(), vec![]);
        let session = RecordingSession::new();

        let outcome = dispatcher
            .handle_message(&session, &discord_fixtures::message("!   "))
            .await;

        assert_eq!(outcome, DispatchOutcome::Ignored(IgnoreReason::Empty));
        assert!(session.sent().is_empty());
    }

    #[tokio::test]
    async fn test_command_name_is_case_insensitive() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher_with(Config::default(), vec![ping(&calls)]);
        let session = RecordingSession::new();

        let outcome = dispatcher
            .handle_message(&session, &discord_fixtures::message("!PiNg"))
            .await;

        assert_eq!(outcome, DispatchOutcome::Executed("ping".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_space_after_prefix_is_unknown() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher_with(Config::default(), vec![ping(&calls)]);
        let session = RecordingSession::new();

        let outcome = dispatcher
            .handle_message(&session, &discord_fixtures::message("! ping"))
            .await;

        assert_eq!(outcome, DispatchOutcome::UnknownCommand);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_alias_keys_are_not_dispatched() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = CommandRegistry::new();
        let command = registry.register(ping(&calls));
        registry.alias(&command, "p");
        let dispatcher = Dispatcher::new(
            Arc::new(Config::default()),
            registry,
            Arc::new(GuildTracker::new()),
            Utc::now(),
        );
        let session = RecordingSession::new();

        let outcome = dispatcher
            .handle_message(&session, &discord_fixtures::message("!p"))
            .await;

        assert_eq!(outcome, DispatchOutcome::UnknownCommand);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_permission_gate_and_owner_bypass() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gated = Command::new(
            "purge",
            0x2000,
            true,
            Counting {
                calls: Arc::clone(&calls),
            },
        );
        let config = Config {
            owner_id: discord_fixtures::test_owner_id().to_string(),
            ..Config::default()
        };
        let dispatcher = dispatcher_with(config, vec![gated]);
        let session = RecordingSession::new().with_default_permissions(Some(0x400));

        let denied = dispatcher
            .handle_message(&session, &discord_fixtures::message("!purge"))
            .await;
        assert_eq!(denied, DispatchOutcome::Denied);
        assert_eq!(
            session.embeds()[0].description.as_deref(),
            Some("You don't have permissions for this command!")
        );

        let owner_message =
            discord_fixtures::message_from(discord_fixtures::test_owner_id(), "!purge");
        let allowed = dispatcher.handle_message(&session, &owner_message).await;
        assert_eq!(allowed, DispatchOutcome::Executed("purge".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_owner_only_command() {
        let calls = Arc::new(AtomicUsize::new(0));
        let config = Config {
            owner_id: discord_fixtures::test_owner_id().to_string(),
            ..Config::default()
        };
        let dispatcher = dispatcher_with(config, vec![ping(&calls).owner_only()]);
        let session = RecordingSession::new();

        let user = dispatcher
            .handle_message(&session, &discord_fixtures::message("!ping"))
            .await;
        assert_eq!(user, DispatchOutcome::Denied);

        let owner = discord_fixtures::message_from(discord_fixtures::test_owner_id(), "!ping");
        assert_eq!(
            dispatcher.handle_message(&session, &owner).await,
            DispatchOutcome::Executed("ping".to_string())
        );
    }

    #[tokio::test]
    async fn test_permission_lookup_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher_with(Config::default(), vec![ping(&calls)]);
        let session = RecordingSession::new().with_default_permissions(None);

        let outcome = dispatcher
            .handle_message(&session, &discord_fixtures::message("!ping"))
            .await;

        assert_eq!(outcome, DispatchOutcome::PermissionLookupFailed);
        assert_eq!(
            session.embeds()[0].description.as_deref(),
            Some("Can't parse permissions!")
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_command_also_starts_cooldown() {
        let dispatcher = dispatcher_with(Config::default(), vec![]);
        let session = RecordingSession::new();
        let now = Utc::now();

        let first = dispatcher
            .dispatch_at(&session, &discord_fixtures::message("!nope"), now)
            .await;
        let second = dispatcher
            .dispatch_at(&session, &discord_fixtures::message("!nope"), now)
            .await;

        assert_eq!(first, DispatchOutcome::UnknownCommand);
        assert_eq!(second, DispatchOutcome::RateLimited);
        assert_eq!(
            dispatcher.cooldowns.expires_at(discord_fixtures::test_user_id()),
            Some(now + chrono::Duration::seconds(3))
        );
    }

    #[tokio::test]
    async fn test_fallback_command_runs_after_unknown_reply() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut config = Config::default();
        config.commands.fallback_command = Some("ping".to_string());
        let dispatcher = dispatcher_with(config, vec![ping(&calls)]);
        let session = RecordingSession::new();

        let outcome = dispatcher
            .handle_message(&session, &discord_fixtures::message("!nope"))
            .await;

        assert_eq!(outcome, DispatchOutcome::UnknownCommand);
        assert_eq!(session.embeds().len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_fallback_command_is_harmless() {
        let mut config = Config::default();
        config.commands.fallback_command = Some("bigmoji".to_string());
        let dispatcher = dispatcher_with(config, vec![]);
        let session = RecordingSession::new();

        let outcome = dispatcher
            .handle_message(&session, &discord_fixtures::message_from(UserId(5), "!nope"))
            .await;

        assert_eq!(outcome, DispatchOutcome::UnknownCommand);
        assert_eq!(session.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_guild_lookup_failure_on_unprefixed_text_is_silent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher_with(Config::default(), vec![ping(&calls)]);
        let session = FlakyGuilds {
            inner: RecordingSession::new(),
            lookups: AtomicUsize::new(0),
        };

        let outcome = dispatcher
            .handle_message(&session, &discord_fixtures::message("?ping"))
            .await;

        assert_eq!(outcome, DispatchOutcome::Ignored(IgnoreReason::NoPrefix));
        assert_eq!(session.lookups.load(Ordering::SeqCst), 2);
        assert!(session.inner.sent().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unprefixed_text_gets_no_reply() {
        let dispatcher = dispatcher_with(Config::default(), vec![]);
        let session = RecordingSession::new();

        for text in ["hello", "?ping", "stats Alice"] {
            let outcome = dispatcher
                .handle_message(&session, &discord_fixtures::message(text))
                .await;
            assert_eq!(outcome, DispatchOutcome::Ignored(IgnoreReason::NoPrefix));
        }
        assert!(session.sent().is_empty());
    }
}
