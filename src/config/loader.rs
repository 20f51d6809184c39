//! Configuration loader

use config::{Config, Environment, File};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use super::types::{AppConfig, TelegramConfig};
use crate::common::errors::{BotError, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Plain bot variables (`ORDER_SIZE`, `ORDER_PRICE`, `CLOB_*`, ...)
/// 2. Environment variables (prefixed with POLYMARKET_)
/// 3. Environment variables (prefixed with APP__)
/// 4. Configuration file (TOML format)
/// 5. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    load_config_with(config_path, |name| std::env::var(name).ok())
}

/// [`load_config`] with the plain bot variables read through `lookup`
pub fn load_config_with<F>(config_path: Option<&str>, lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    builder = builder.add_source(
        Environment::with_prefix("POLYMARKET")
            .keep_prefix(true)
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| BotError::Configuration(e.to_string()))?;

    let mut config: AppConfig = config
        .try_deserialize()
        .map_err(|e| BotError::Configuration(e.to_string()))?;

    apply_plain_env(&mut config, lookup)?;
    Ok(config)
}

/// Load configuration from the bot's plain environment variables only
///
/// Reads `ORDER_SIZE`, `ORDER_PRICE`, `MONITOR_INTERVAL`, `TELEGRAM_BOT_TOKEN`,
/// `TELEGRAM_CHAT_ID`, `CLOB_API_KEY`, `CLOB_SECRET`, `CLOB_PASS_PHRASE`,
/// `ORDER_RELAY_URL` and `LEADERBOARD_SOURCE_URL`.
pub fn load_from_env() -> Result<AppConfig> {
    dotenvy::dotenv().ok();
    from_lookup(|name| std::env::var(name).ok())
}

/// Build a config from any variable lookup
pub fn from_lookup<F>(lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = AppConfig::default();
    apply_plain_env(&mut config, lookup)?;
    Ok(config)
}

/// Overwrite the fields whose plain variable is set; unset ones are left alone
pub fn apply_plain_env<F>(config: &mut AppConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(size) = var("ORDER_SIZE") {
        config.trading.order_size = parse_decimal("ORDER_SIZE", &size)?;
    }
    if let Some(price) = var("ORDER_PRICE") {
        config.trading.price_ceiling = parse_decimal("ORDER_PRICE", &price)?;
    }
    if let Some(interval) = var("MONITOR_INTERVAL") {
        config.settings.interval_seconds = interval.parse().map_err(|e| {
            BotError::Configuration(format!("MONITOR_INTERVAL is not a number: {}", e))
        })?;
    }
    if let Some(level) = var("LOG_LEVEL") {
        config.settings.log_level = level;
    }

    if let Some(key) = var("CLOB_API_KEY") {
        config.polymarket.api_key = Some(key);
    }
    if let Some(secret) = var("CLOB_SECRET") {
        config.polymarket.api_secret = Some(secret);
    }
    if let Some(passphrase) = var("CLOB_PASS_PHRASE") {
        config.polymarket.api_passphrase = Some(passphrase);
    }
    if let Some(url) = var("ORDER_RELAY_URL") {
        config.polymarket.order_relay_url = Some(url);
    }
    if let Some(url) = var("LEADERBOARD_SOURCE_URL") {
        config.source.url = Some(url);
    }

    if let (Some(token), Some(chat_id)) = (var("TELEGRAM_BOT_TOKEN"), var("TELEGRAM_CHAT_ID")) {
        let api_url = config.telegram.as_ref().map(|t| t.api_url.clone());
        let mut telegram = TelegramConfig::new(token, chat_id);
        if let Some(api_url) = api_url {
            telegram.api_url = api_url;
        }
        config.telegram = Some(telegram);
    }

    Ok(())
}

fn parse_decimal(name: &str, value: &str) -> Result<Decimal> {
    Decimal::from_str(value)
        .map_err(|e| BotError::Configuration(format!("{} is not a decimal: {}", name, e)))
}
