mod catalog;
mod config;
mod dispatcher;
mod platform;
mod random;
mod reply;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::dispatcher::Dispatcher;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,jokebot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    if let Some(username) = &config.telegram.bot_username {
        info!("  Bot: @{}", username);
    }
    info!("  Help url: {}", config.keyboard.help_url);

    let dispatcher = Arc::new(Dispatcher::new(config.keyboard.help_url.clone()));
    info!("  Commands: {}", dispatcher.catalog().commands().len());

    let bot = teloxide::Bot::new(&config.telegram.bot_token);

    info!("Bot is starting...");
    platform::telegram::run(bot, dispatcher).await?;

    Ok(())
}
