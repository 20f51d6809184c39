//! Order sinks: the live order relay and a dry-run stand-in

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use super::auth::AuthHeaders;
use super::messages::OrderPlacementResponse;
use crate::common::errors::{BotError, Result};
use crate::common::traits::{Notifier, OrderSink};
use crate::common::types::OrderRequest;
use crate::config::types::ApiCredentials;

/// Places orders through the signing relay
///
/// The relay holds the wallet key and signs the CLOB order; this side only
/// authenticates the call with L2 headers.
#[derive(Clone)]
pub struct RelayOrderSink {
    client: Client,
    url: String,
    request_path: String,
    credentials: Option<ApiCredentials>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl std::fmt::Debug for RelayOrderSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayOrderSink")
            .field("url", &self.url)
            .field("authenticated", &self.credentials.is_some())
            .finish()
    }
}

impl RelayOrderSink {
    pub fn new(url: &str) -> Result<Self> {
        Self::with_timeout(url, Duration::from_secs(30))
    }

    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self> {
        let parsed = url::Url::parse(url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            url: url.to_string(),
            request_path: parsed.path().to_string(),
            credentials: None,
            notifier: None,
        })
    }

    pub fn with_credentials(mut self, credentials: ApiCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Report failed placements on this channel too
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Submit one order and return the relay's order id
    #[instrument(skip(self, order), fields(token_id = %order.token_id))]
    pub async fn submit(&self, order: &OrderRequest) -> Result<Option<String>> {
        let body = serde_json::to_string(order)?;
        debug!("Posting order to relay: {}", self.url);

        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .body(body.clone());

        if let Some(credentials) = &self.credentials {
            let headers = AuthHeaders::generate(credentials, "POST", &self.request_path, &body)?;
            request = headers.apply_to_request(request);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            if status == StatusCode::FORBIDDEN || text.contains("Cloudflare") {
                warn!("Potential Cloudflare block detected; the relay host may be blocked");
            }
            return Err(BotError::OrderRejected(format!(
                "Relay returned status {}: {}",
                status, text
            )));
        }

        let placement: OrderPlacementResponse = if text.trim().is_empty() {
            OrderPlacementResponse::default()
        } else {
            serde_json::from_str(&text)?
        };

        if !placement.is_accepted() {
            return Err(BotError::OrderRejected(
                placement.error_msg.filter(|m| !m.is_empty()).unwrap_or(text),
            ));
        }

        Ok(placement.order_id)
    }
}

#[async_trait]
impl OrderSink for RelayOrderSink {
    async fn execute(&self, order: &OrderRequest) -> bool {
        info!(
            token_id = %order.token_id,
            side = %order.side,
            price = %order.price,
            size = %order.size,
            "Placing {} order",
            order.order_type
        );

        match self.submit(order).await {
            Ok(order_id) => {
                info!(order_id = order_id.as_deref().unwrap_or("-"), "Order placed");
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to execute order");
                if let Some(notifier) = &self.notifier {
                    notifier
                        .notify(&format!("Failed to execute order: {}", e))
                        .await;
                }
                false
            }
        }
    }
}

/// Logs orders instead of placing them
#[derive(Debug, Default)]
pub struct DryRunOrderSink {
    counter: AtomicU64,
}

impl DryRunOrderSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placed(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderSink for DryRunOrderSink {
    async fn execute(&self, order: &OrderRequest) -> bool {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let order_id = format!("dry-run-{}-{}", chrono::Utc::now().timestamp_millis(), n);
        info!(
            order_id = %order_id,
            token_id = %order.token_id,
            price = %order.price,
            size = %order.size,
            "[DRY RUN] {} {} order not sent",
            order.order_type,
            order.side
        );
        true
    }
}
