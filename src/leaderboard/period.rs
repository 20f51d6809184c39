//! Time-bounded prediction-market periods

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A set of market identifiers that applies until a fixed deadline
///
/// `market_ids[i]` is the market for tracked rank `i + 1`; an empty string
/// means no market exists for that rank in this period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPeriod {
    pub label: String,
    pub ends_at: DateTime<Utc>,
    pub market_ids: Vec<String>,
}

impl EventPeriod {
    pub fn new<I, S>(label: impl Into<String>, ends_at: DateTime<Utc>, market_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            ends_at,
            market_ids: market_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Market for a 1-based rank, `None` when absent or blank
    pub fn market_for_rank(&self, rank: usize) -> Option<&str> {
        rank.checked_sub(1)
            .and_then(|index| self.market_ids.get(index))
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.ends_at > now
    }
}

/// Picks the active period out of a static list ordered by deadline
#[derive(Debug, Clone, Default)]
pub struct EventPeriodSelector {
    periods: Vec<EventPeriod>,
}

impl EventPeriodSelector {
    pub fn new(mut periods: Vec<EventPeriod>) -> Self {
        periods.sort_by_key(|p| p.ends_at);
        Self { periods }
    }

    /// First period whose deadline is strictly after `now`
    pub fn current(&self, now: DateTime<Utc>) -> Option<&EventPeriod> {
        self.periods.iter().find(|p| p.is_active(now))
    }

    pub fn periods(&self) -> &[EventPeriod] {
        &self.periods
    }
}
