//! Main entry point for Vouch Bot.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use vouch_bot::VouchBot;
use vouch_common::init_logging;
use vouch_config::{Config, ConfigLoader};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level, overrides the configured one
    #[arg(short, long)]
    log_level: Option<String>,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args).context("Failed to load configuration")?;

    let _log_guard = init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {e}"))?;

    info!("Starting Vouch Bot v{}", env!("CARGO_PKG_VERSION"));

    let bot = VouchBot::new(config);
    if let Err(e) = bot.start().await {
        error!("Bot stopped with an error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
