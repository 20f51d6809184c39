//! Unified market types shared by the adapters and the decision engine

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type accepted by the order sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Limit,
    Market,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderType::Limit => write!(f, "LIMIT"),
            OrderType::Market => write!(f, "MARKET"),
        }
    }
}

/// Time-in-force policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good till cancelled
    Gtc,
    /// Good till date
    Gtd,
    /// Fill or kill
    Fok,
    /// Fill and kill (partial fills allowed, rest cancelled)
    Fak,
}

impl std::fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeInForce::Gtc => write!(f, "GTC"),
            TimeInForce::Gtd => write!(f, "GTD"),
            TimeInForce::Fok => write!(f, "FOK"),
            TimeInForce::Fak => write!(f, "FAK"),
        }
    }
}

/// Order handed to the order sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// CLOB token id of the traded outcome
    pub token_id: String,
    /// Limit price, or the worst acceptable price for market orders
    pub price: Decimal,
    /// Dollar amount for market buys, share count for limit orders
    pub size: Decimal,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
}

/// A single price level in an order book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Price at this level (0.00 to 1.00 for prediction markets)
    pub price: Decimal,
    /// Total size/quantity at this price level
    pub size: Decimal,
}

impl PriceLevel {
    /// Create a new price level
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self { price, size }
    }
}

/// Order book snapshot for one outcome token
///
/// Levels are kept in the order the exchange returned them. Nothing here
/// assumes they are sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    /// Market/condition identifier
    pub market_id: String,
    /// Asset/token ID (specific to the outcome)
    pub asset_id: String,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
    /// Timestamp of this snapshot
    pub timestamp: DateTime<Utc>,
}

impl OrderBook {
    /// Lowest ask price, found by a linear scan
    pub fn lowest_ask(&self) -> Option<Decimal> {
        self.asks.iter().map(|level| level.price).min()
    }
}

/// One market inside a prediction-market event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMarket {
    pub question: String,
    /// Short outcome label inside a grouped event (e.g. "Google", "1500+")
    pub group_item_title: String,
    #[serde(default)]
    pub slug: Option<String>,
    /// Outcome labels, parallel to `clob_token_ids`
    pub outcomes: Vec<String>,
    pub clob_token_ids: Vec<String>,
}

impl EventMarket {
    /// Token id for the outcome labelled `label` (case-insensitive)
    pub fn token_for_outcome(&self, label: &str) -> Option<&str> {
        let index = self
            .outcomes
            .iter()
            .position(|o| o.eq_ignore_ascii_case(label))?;
        self.clob_token_ids.get(index).map(String::as_str)
    }
}

/// Prediction-market event looked up by slug
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEvent {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub markets: Vec<EventMarket>,
}

impl MarketEvent {
    /// Market whose group title equals `target` or whose question mentions it
    pub fn find_market(&self, target: &str) -> Option<&EventMarket> {
        self.markets
            .iter()
            .find(|m| m.group_item_title == target || m.question.contains(target))
    }

    /// Market whose group title equals `title` exactly
    pub fn find_by_title(&self, title: &str) -> Option<&EventMarket> {
        self.markets.iter().find(|m| m.group_item_title == title)
    }

    /// Group titles of all markets, for diagnostics
    pub fn titles(&self) -> Vec<&str> {
        self.markets
            .iter()
            .map(|m| m.group_item_title.as_str())
            .collect()
    }
}
