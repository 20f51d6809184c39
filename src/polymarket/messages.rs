//! Polymarket-specific message types

use serde::{Deserialize, Deserializer, Serialize};

use crate::common::types::{EventMarket, MarketEvent};

// ============================================================================
// CLOB REST Response Types
// ============================================================================

/// A price level in the book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: String,
    pub size: String,
}

/// Response from GET /book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBookResponse {
    pub market: String,
    pub asset_id: String,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub bids: Vec<BookLevel>,
    #[serde(default)]
    pub asks: Vec<BookLevel>,
}

// ============================================================================
// Order Relay Types
// ============================================================================

/// Response body of the order relay
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlacementResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default, rename = "orderID", alias = "orderId")]
    pub order_id: Option<String>,
    #[serde(default)]
    pub error_msg: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl OrderPlacementResponse {
    /// Placed unless the relay says `success: false` or reports an error message
    pub fn is_accepted(&self) -> bool {
        self.success != Some(false)
            && self
                .error_msg
                .as_deref()
                .map(str::is_empty)
                .unwrap_or(true)
    }
}

// ============================================================================
// Gamma API Response Types (Market Discovery)
// ============================================================================

/// Event from Gamma API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GammaEvent {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub markets: Option<Vec<GammaMarket>>,
}

/// Market from Gamma API
///
/// `outcomes` and `clobTokenIds` arrive either as JSON arrays or as strings
/// holding a JSON-encoded array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GammaMarket {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub group_item_title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub outcomes: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub clob_token_ids: Vec<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub closed: Option<bool>,
}

impl From<GammaMarket> for EventMarket {
    fn from(market: GammaMarket) -> Self {
        EventMarket {
            question: market.question,
            group_item_title: market.group_item_title.unwrap_or_default(),
            slug: market.slug,
            outcomes: market.outcomes,
            clob_token_ids: market.clob_token_ids,
        }
    }
}

impl From<GammaEvent> for MarketEvent {
    fn from(event: GammaEvent) -> Self {
        MarketEvent {
            id: event.id,
            slug: event.slug.unwrap_or_default(),
            title: event.title,
            markets: event
                .markets
                .unwrap_or_default()
                .into_iter()
                .map(EventMarket::from)
                .collect(),
        }
    }
}

fn string_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Encoded(String),
        Null(()),
    }

    match Raw::deserialize(deserializer)? {
        Raw::List(list) => Ok(list),
        Raw::Encoded(text) if text.trim().is_empty() => Ok(Vec::new()),
        Raw::Encoded(text) => serde_json::from_str(&text).map_err(serde::de::Error::custom),
        Raw::Null(()) => Ok(Vec::new()),
    }
}
