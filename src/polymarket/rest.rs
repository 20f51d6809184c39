//! REST API client for Polymarket CLOB and Gamma

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::messages::*;
use crate::common::errors::{BotError, Result};
use crate::common::traits::MarketDirectory;
use crate::common::types::{MarketEvent, OrderBook, PriceLevel};

/// REST API client for Polymarket CLOB and Gamma
#[derive(Debug, Clone)]
pub struct PolymarketRestClient {
    /// HTTP client
    client: Client,
    /// Base URL for the CLOB API
    base_url: String,
    /// Base URL for the Gamma API
    gamma_url: String,
}

impl PolymarketRestClient {
    /// Create a new REST client
    pub fn new(base_url: &str, gamma_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, gamma_url, Duration::from_secs(30))
    }

    /// Create a new REST client with custom timeout
    pub fn with_timeout(base_url: &str, gamma_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            gamma_url: gamma_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the order book for a token
    #[instrument(skip(self))]
    pub async fn get_order_book(&self, token_id: &str) -> Result<OrderBook> {
        let url = format!("{}/book", self.base_url);
        debug!("Fetching order book from: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("token_id", token_id)])
            .send()
            .await?;

        let response = check_status(response).await?;

        let book_response: OrderBookResponse = response.json().await?;
        convert_order_book_response(book_response)
    }

    /// Look up an event by slug on the Gamma API
    ///
    /// Gamma answers with an array; an empty array means the slug is unknown.
    #[instrument(skip(self))]
    pub async fn get_event_by_slug(&self, slug: &str) -> Result<Option<GammaEvent>> {
        let url = format!("{}/events", self.gamma_url);
        debug!("Fetching Gamma event from: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("slug", slug)])
            .send()
            .await?;

        let response = check_status(response).await?;

        let events: Vec<GammaEvent> = response.json().await?;
        Ok(events.into_iter().next())
    }
}

/// Map a non-2xx response to an error; 429 becomes [`BotError::RateLimit`]
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_seconds: Option<u64> = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok());
        let message = response.text().await.unwrap_or_default();
        warn!(?retry_after_seconds, "Rate limited by Polymarket");
        return Err(BotError::RateLimit {
            message,
            retry_after_seconds,
        });
    }

    let body = response.text().await.unwrap_or_default();
    Err(BotError::InvalidResponse(format!(
        "Server returned status {}: {}",
        status, body
    )))
}

fn parse_levels(levels: Vec<BookLevel>, side: &str) -> Result<Vec<PriceLevel>> {
    levels
        .into_iter()
        .map(|level| {
            Ok(PriceLevel {
                price: level.price.parse().map_err(|e| {
                    BotError::InvalidResponse(format!("Invalid {} price: {}", side, e))
                })?,
                size: level.size.parse().map_err(|e| {
                    BotError::InvalidResponse(format!("Invalid {} size: {}", side, e))
                })?,
            })
        })
        .collect()
}

fn convert_order_book_response(response: OrderBookResponse) -> Result<OrderBook> {
    Ok(OrderBook {
        market_id: response.market,
        asset_id: response.asset_id,
        bids: parse_levels(response.bids, "bid")?,
        asks: parse_levels(response.asks, "ask")?,
        timestamp: chrono::Utc::now(),
    })
}

#[async_trait]
impl MarketDirectory for PolymarketRestClient {
    async fn get_event_by_slug(&self, slug: &str) -> Option<MarketEvent> {
        match PolymarketRestClient::get_event_by_slug(self, slug).await {
            Ok(Some(event)) => Some(event.into()),
            Ok(None) => {
                warn!(slug, "{}", BotError::EventNotFound(slug.to_string()));
                None
            }
            Err(e) => {
                warn!(slug, error = %e, "Failed to fetch event");
                None
            }
        }
    }

    async fn get_order_book(&self, token_id: &str) -> Option<OrderBook> {
        match PolymarketRestClient::get_order_book(self, token_id).await {
            Ok(book) => Some(book),
            Err(e) => {
                warn!(token_id, error = %e, "Failed to fetch order book");
                None
            }
        }
    }
}
