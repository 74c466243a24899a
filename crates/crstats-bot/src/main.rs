//! Main entry point for the stats bot.

use anyhow::{Context, Result};
use clap::Parser;
use crstats_bot::{build_runtime, Args, BotResult, StatsBot};
use crstats_common::logging::init_logging;
use crstats_config::Config;
use tracing::{error, info};

fn main() -> Result<()> {
    let args = Args::parse();

    // Keeps the error log writer alive until exit
    let _guard = init_logging(&args.logging_config())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    info!("Starting Clash Royale stats bot");

    let config = args.load_config()?;

    let runtime = build_runtime(config.maxproc).context("Failed to build async runtime")?;
    runtime.block_on(run(config))?;

    Ok(())
}

async fn run(config: Config) -> BotResult<()> {
    let bot = StatsBot::new(config).inspect_err(|e| error!("Failed to create bot: {}", e))?;
    bot.start().await
}
