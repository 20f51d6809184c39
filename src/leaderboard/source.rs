//! HTTP leaderboard snapshot source

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::types::LeaderboardSnapshot;
use crate::common::errors::{BotError, Result};
use crate::common::traits::LeaderboardSource;

/// Fetches snapshot JSON documents published by the scraper sidecar
#[derive(Debug, Clone)]
pub struct HttpSnapshotSource {
    client: Client,
    url: String,
}

impl HttpSnapshotSource {
    pub fn new(url: &str) -> Result<Self> {
        Self::with_timeout(url, Duration::from_secs(30))
    }

    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self> {
        url::Url::parse(url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Fetch and decode one snapshot
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<LeaderboardSnapshot> {
        debug!("Fetching leaderboard snapshot from: {}", self.url);

        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::InvalidResponse(format!(
                "Server returned status {}: {}",
                status, body
            )));
        }

        let snapshot: LeaderboardSnapshot = response.json().await?;
        debug!(
            version = %snapshot.version,
            entries = snapshot.entries.len(),
            "Fetched leaderboard snapshot"
        );
        Ok(snapshot)
    }
}

#[async_trait]
impl LeaderboardSource for HttpSnapshotSource {
    async fn poll(&self) -> Option<LeaderboardSnapshot> {
        match self.fetch().await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(error = %e, url = %self.url, "Failed to fetch leaderboard snapshot");
                None
            }
        }
    }
}
