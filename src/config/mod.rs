//! Configuration loading and types

pub mod loader;
pub mod types;

pub use loader::{load_config, load_config_with, load_from_env};
pub use types::{
    ApiCredentials, AppConfig, AppSettings, PolymarketConfig, SourceConfig, TelegramConfig,
    TradingConfig,
};
