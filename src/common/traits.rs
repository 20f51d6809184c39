//! Collaborator traits consumed by the decision engine
//!
//! Implementations sit at the edge of the system (HTTP, Telegram, order
//! relay) and must absorb their own failures: lookups return `None`,
//! order placement returns `false`, notifications never fail.

use async_trait::async_trait;

use super::types::{MarketEvent, OrderBook, OrderRequest};
use crate::leaderboard::LeaderboardSnapshot;

/// Source of leaderboard observations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeaderboardSource: Send + Sync {
    /// Fetch the latest snapshot, `None` when the source could not be read
    async fn poll(&self) -> Option<LeaderboardSnapshot>;
}

/// Lookup of prediction-market events and order books
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDirectory: Send + Sync {
    /// Resolve an event by its human-readable slug
    async fn get_event_by_slug(&self, slug: &str) -> Option<MarketEvent>;

    /// Fetch the order book for one outcome token
    async fn get_order_book(&self, token_id: &str) -> Option<OrderBook>;
}

/// Order placement
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderSink: Send + Sync {
    /// Place an order; `true` only on confirmed placement
    async fn execute(&self, order: &OrderRequest) -> bool;
}

/// Fire-and-forget notification channel
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str);
}
