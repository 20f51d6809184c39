//! Notification channels
//!
//! Notifiers never fail towards the caller: delivery errors are logged and
//! dropped.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::common::errors::{BotError, Result};
use crate::common::traits::Notifier;
use crate::config::types::TelegramConfig;

/// Writes notifications to the log
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str) {
        info!(target: "notify", "{}", message);
    }
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Sends notifications through the Telegram Bot API
#[derive(Clone)]
pub struct TelegramNotifier {
    client: Client,
    endpoint: String,
    chat_id: String,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        Self::with_timeout(config, Duration::from_secs(10))
    }

    pub fn with_timeout(config: &TelegramConfig, timeout: Duration) -> Result<Self> {
        url::Url::parse(&config.api_url)?;
        if config.bot_token.is_empty() || config.chat_id.is_empty() {
            return Err(BotError::Configuration(
                "telegram bot_token and chat_id are required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/bot{}/sendMessage",
                config.api_url.trim_end_matches('/'),
                config.bot_token
            ),
            chat_id: config.chat_id.clone(),
        })
    }

    /// Deliver one message
    #[instrument(skip(self, text))]
    pub async fn send(&self, text: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Notification(format!(
                "Telegram returned status {}: {}",
                status, body
            )));
        }

        debug!("Telegram message sent");
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) {
        info!(target: "notify", "{}", message);
        if let Err(e) = self.send(message).await {
            warn!(error = %e, "Failed to send Telegram message");
        }
    }
}
