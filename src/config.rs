use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Overrides `[telegram] bot_token` when set and non-empty.
pub const TOKEN_ENV_VAR: &str = "TELEGRAM_BOT_TOKEN";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub keyboard: KeyboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    /// Only used for the startup log line
    #[serde(default)]
    pub bot_username: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KeyboardConfig {
    /// External link carried by the inline "Help" button
    #[serde(default = "default_help_url")]
    pub help_url: String,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            help_url: default_help_url(),
        }
    }
}

fn default_help_url() -> String {
    "https://core.telegram.org/bots/features#commands".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content, std::env::var(TOKEN_ENV_VAR).ok())
    }

    fn parse(content: &str, token_override: Option<String>) -> Result<Self> {
        let mut config: Config =
            toml::from_str(content).context("Failed to parse config file")?;

        if let Some(token) = token_override.filter(|t| !t.trim().is_empty()) {
            config.telegram.bot_token = token;
        }

        if config.telegram.bot_token.trim().is_empty() {
            bail!(
                "Telegram bot token is missing: set [telegram] bot_token or {}",
                TOKEN_ENV_VAR
            );
        }

        Ok(config)
    }
}
