//! Configuration types

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::common::errors::{BotError, Result};
use crate::common::types::{OrderType, TimeInForce};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Polymarket-specific configuration
    #[serde(default)]
    pub polymarket: PolymarketConfig,
    /// Telegram notifications (optional; log-only when absent)
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
    /// Order parameters
    #[serde(default)]
    pub trading: TradingConfig,
    /// Where leaderboard snapshots are fetched from
    #[serde(default)]
    pub source: SourceConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

impl AppConfig {
    /// Relay credentials, present only when key, secret and passphrase are all set
    pub fn credentials(&self) -> Option<ApiCredentials> {
        let p = &self.polymarket;
        match (&p.api_key, &p.api_secret, &p.api_passphrase) {
            (Some(key), Some(secret), Some(passphrase))
                if !key.is_empty() && !secret.is_empty() && !passphrase.is_empty() =>
            {
                Some(ApiCredentials::new(
                    key.clone(),
                    secret.clone(),
                    passphrase.clone(),
                ))
            }
            _ => None,
        }
    }

    /// Reject values the bot cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.trading.order_size <= Decimal::ZERO {
            return Err(BotError::Configuration(format!(
                "order_size must be positive, got {}",
                self.trading.order_size
            )));
        }

        let ceiling = self.trading.price_ceiling;
        if ceiling <= Decimal::ZERO || ceiling > Decimal::ONE {
            return Err(BotError::Configuration(format!(
                "price_ceiling must be in (0, 1], got {}",
                ceiling
            )));
        }

        if self.settings.interval_seconds == 0 {
            return Err(BotError::Configuration(
                "interval_seconds must be greater than zero".to_string(),
            ));
        }

        if self.settings.max_validation_failures == 0 {
            return Err(BotError::Configuration(
                "max_validation_failures must be greater than zero".to_string(),
            ));
        }

        url::Url::parse(&self.polymarket.rest_url)?;
        url::Url::parse(&self.polymarket.gamma_url)?;
        if let Some(relay) = &self.polymarket.order_relay_url {
            url::Url::parse(relay)?;
        }
        if let Some(source) = &self.source.url {
            url::Url::parse(source)?;
        }
        if let Some(telegram) = &self.telegram {
            url::Url::parse(&telegram.api_url)?;
        }

        Ok(())
    }
}

/// Polymarket platform configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolymarketConfig {
    /// API key for relay authentication
    #[serde(default)]
    pub api_key: Option<String>,
    /// API secret for signing requests
    #[serde(default)]
    pub api_secret: Option<String>,
    /// API passphrase
    #[serde(default)]
    pub api_passphrase: Option<String>,
    /// Base URL for the CLOB REST API
    #[serde(default = "default_polymarket_rest_url")]
    pub rest_url: String,
    /// Gamma API URL for event lookup
    #[serde(default = "default_polymarket_gamma_url")]
    pub gamma_url: String,
    /// Order relay endpoint; live trading needs it
    #[serde(default)]
    pub order_relay_url: Option<String>,
}

impl Default for PolymarketConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            api_passphrase: None,
            rest_url: default_polymarket_rest_url(),
            gamma_url: default_polymarket_gamma_url(),
            order_relay_url: None,
        }
    }
}

fn default_polymarket_rest_url() -> String {
    "https://clob.polymarket.com".to_string()
}

fn default_polymarket_gamma_url() -> String {
    "https://gamma-api.polymarket.com".to_string()
}

/// Telegram Bot API notification target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            api_url: default_telegram_api_url(),
        }
    }
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

/// Order parameters shared by every strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingConfig {
    /// Dollar amount per market buy
    #[serde(default = "default_order_size")]
    pub order_size: Decimal,
    /// Worst acceptable price; books asking at or above it are skipped
    #[serde(default = "default_price_ceiling")]
    pub price_ceiling: Decimal,
    #[serde(default = "default_order_type")]
    pub order_type: OrderType,
    #[serde(default = "default_time_in_force")]
    pub time_in_force: Option<TimeInForce>,
    /// Log orders instead of sending them
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            order_size: default_order_size(),
            price_ceiling: default_price_ceiling(),
            order_type: default_order_type(),
            time_in_force: default_time_in_force(),
            dry_run: false,
        }
    }
}

fn default_order_size() -> Decimal {
    dec!(10)
}

fn default_price_ceiling() -> Decimal {
    dec!(0.9)
}

fn default_order_type() -> OrderType {
    OrderType::Market
}

fn default_time_in_force() -> Option<TimeInForce> {
    Some(TimeInForce::Fak)
}

/// Leaderboard snapshot source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub url: Option<String>,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Seconds between polls
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Consecutive invalid version labels before a rank strategy stops
    #[serde(default = "default_max_validation_failures")]
    pub max_validation_failures: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            interval_seconds: default_interval(),
            request_timeout_seconds: default_request_timeout(),
            max_validation_failures: default_max_validation_failures(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_interval() -> u64 {
    60
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_validation_failures() -> u32 {
    5
}

/// API credentials for authenticated requests
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCredentials {
    pub api_key: String,
    pub api_secret: String,
    pub passphrase: String,
}

impl ApiCredentials {
    pub fn new(api_key: String, api_secret: String, passphrase: String) -> Self {
        Self {
            api_key,
            api_secret,
            passphrase,
        }
    }
}
