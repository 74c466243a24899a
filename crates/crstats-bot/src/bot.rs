//! Core bot logic using the Poise framework.
//!
//! Poise only provides the event loop here: no framework commands are
//! registered, every message goes through the [`Dispatcher`] instead.

use crate::error::BotResult;
use crate::session::{incoming_message, SerenitySession};
use chrono::Utc;
use crstats_api::HttpStatsApi;
use crstats_commands::{default_registry, Dispatcher, GuildTracker};
use crstats_common::{GuildId, GuildInfo};
use crstats_config::Config;
use poise::serenity_prelude::{self as serenity, GatewayIntents};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Shared application state accessible in the event handler.
pub struct Data {
    /// Routes inbound messages and owns the command state.
    pub dispatcher: Arc<Dispatcher>,
}

impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Data")
            .field("dispatcher", &"<Dispatcher>")
            .finish()
    }
}

/// Application error type for the framework.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Gateway intents the bot subscribes to.
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
}

/// Builds the multi-threaded runtime, sized by `maxproc` when non-zero.
pub fn build_runtime(maxproc: usize) -> std::io::Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if maxproc > 0 {
        builder.worker_threads(maxproc);
    }
    builder.build()
}

/// Main bot structure.
pub struct StatsBot {
    config: Arc<Config>,
    dispatcher: Arc<Dispatcher>,
}

impl StatsBot {
    /// Wires the statistics client, command registry and dispatcher.
    pub fn new(config: Config) -> BotResult<Self> {
        let config = Arc::new(config);
        let api = HttpStatsApi::new(&config.api)?;
        info!("Statistics API at {}", api.base_url());

        let registry = default_registry(Arc::new(api));
        info!("{} commands registered", registry.commands().len());

        let dispatcher = Dispatcher::new(
            Arc::clone(&config),
            registry,
            Arc::new(GuildTracker::new()),
            Utc::now(),
        );

        Ok(Self {
            config,
            dispatcher: Arc::new(dispatcher),
        })
    }

    /// Connects to the gateway and runs until a shutdown signal arrives.
    pub async fn start(&self) -> BotResult<()> {
        let dispatcher = Arc::clone(&self.dispatcher);

        let framework = poise::Framework::builder()
            .options(poise::FrameworkOptions {
                commands: vec![],
                on_error: |error| Box::pin(on_error(error)),
                event_handler: |ctx, event, framework, data| {
                    Box::pin(event_handler(ctx, event, framework, data))
                },
                prefix_options: poise::PrefixFrameworkOptions {
                    prefix: None,
                    ..Default::default()
                },
                ..Default::default()
            })
            .setup(move |_ctx, ready, _framework| {
                Box::pin(async move {
                    info!("Bot connected as: {}", ready.user.name);
                    Ok(Data { dispatcher })
                })
            })
            .build();

        let mut client = serenity::ClientBuilder::new(&self.config.token, intents())
            .framework(framework)
            .await
            .inspect_err(|e| error!("Failed to create Discord client: {:?}", e))?;

        info!("Discord client created");

        let shard_manager = client.shard_manager.clone();
        tokio::spawn(async move {
            if let Err(e) = shutdown_signal().await {
                error!("Failed to listen for shutdown signal: {:?}", e);
                return;
            }

            info!("Received shutdown signal, starting graceful shutdown");
            shard_manager.shutdown_all().await;
            info!("Discord client shutdown complete");
        });

        info!("Bot is now running. Press CTRL-C to exit.");
        if let Err(why) = client.start().await {
            error!("Client error: {:?}", why);
            return Err(why.into());
        }

        info!("Bot has shut down");
        Ok(())
    }
}

/// Resolves on SIGINT, or SIGTERM on unix.
async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result,
            _ = terminate.recv() => Ok(()),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}

/// Global error handler for the framework
async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            error!(
                "Error in event handler for {:?}: {:?}",
                event.snake_case_name(),
                error
            );
        }
        error => {
            error!("Other error: {:?}", error);
        }
    }
}

/// Whether a guild create event is a guild the bot has not counted yet.
///
/// Reconnects replay the create event for cached guilds with `is_new` set to
/// `false`; without a cache the flag is absent and every event counts.
const fn is_new_guild(is_new: Option<bool>) -> bool {
    !matches!(is_new, Some(false))
}

/// Central event handler for Discord events
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    let session = SerenitySession::new(ctx);
    let dispatcher = &data.dispatcher;

    match event {
        serenity::FullEvent::Message { new_message } => {
            let message = incoming_message(new_message);
            let outcome = dispatcher.handle_message(&session, &message).await;
            debug!("Message {} handled: {:?}", new_message.id, outcome);
        }
        serenity::FullEvent::GuildCreate { guild, is_new } => {
            if !is_new_guild(*is_new) {
                debug!("Guild {} replayed from cache, count unchanged", guild.id);
                return Ok(());
            }
            let info = GuildInfo {
                id: GuildId(guild.id.get()),
                name: guild.name.clone(),
            };
            dispatcher
                .guilds()
                .guild_joined(&session, dispatcher.config(), &info, false)
                .await;
        }
        serenity::FullEvent::GuildDelete { incomplete, full } => {
            let name = full.as_ref().map(|g| g.name.as_str());
            dispatcher
                .guilds()
                .guild_left(
                    &session,
                    dispatcher.config(),
                    GuildId(incomplete.id.get()),
                    name,
                    incomplete.unavailable,
                )
                .await;
        }
        serenity::FullEvent::Ready { data_about_bot } => {
            info!(
                "Bot ready as {} (ID: {}) in {} guilds",
                data_about_bot.user.name,
                data_about_bot.user.id,
                data_about_bot.guilds.len()
            );
        }
        _ => {}
    }
    Ok(())
}
