//! LeaderboardSniper Library
//!
//! Watches AI benchmark leaderboards and trades the Polymarket prediction
//! markets that settle on them.

pub mod bot;
pub mod common;
pub mod config;
pub mod leaderboard;
pub mod notify;
pub mod polymarket;
pub mod strategy;

// Re-export commonly used types
pub use bot::{Bot, RunSummary, StopReason};
pub use common::errors::{BotError, Result};
pub use common::traits::{LeaderboardSource, MarketDirectory, Notifier, OrderSink};
pub use common::types::{EventMarket, MarketEvent, OrderBook, OrderRequest, PriceLevel, Side};
pub use config::types::AppConfig;
pub use leaderboard::{Entry, HttpSnapshotSource, LeaderboardSnapshot};
pub use notify::{LogNotifier, TelegramNotifier};
pub use polymarket::{DryRunOrderSink, PolymarketRestClient, RelayOrderSink};

// Strategy types
pub use strategy::{
    BoxedStrategy, Decision, Direction, Evaluation, Strategy, StrategyDeps, StrategyId,
    TradeGate, TradeIntent, TradeRecord, TradeSettings, Trader,
};
