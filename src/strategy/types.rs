use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which outcome of a binary market an intent buys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Yes,
    No,
}

impl Direction {
    /// Outcome label as it appears in a market's `outcomes` list
    pub fn outcome_label(&self) -> &'static str {
        match self {
            Direction::Yes => "Yes",
            Direction::No => "No",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Yes => write!(f, "YES"),
            Direction::No => write!(f, "NO"),
        }
    }
}

/// How the trader locates the participant's market inside an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketMatch {
    /// Group title equals the participant, or the question mentions it
    TitleOrQuestion,
    /// Group title equals the participant exactly
    ExactTitle,
}

/// A proposed buy, subject to gating and the price ceiling
///
/// Every intent is a BUY; `direction` picks the YES or NO outcome token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeIntent {
    /// Event slug the market lives under
    pub market_key: String,
    /// Company or tier the market is about
    pub participant: String,
    pub direction: Direction,
    /// Human-readable reason, for logs and notifications only
    pub reason: String,
    pub matching: MarketMatch,
}

impl TradeIntent {
    pub fn new(
        market_key: impl Into<String>,
        participant: impl Into<String>,
        direction: Direction,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            market_key: market_key.into(),
            participant: participant.into(),
            direction,
            reason: reason.into(),
            matching: MarketMatch::TitleOrQuestion,
        }
    }

    pub fn buy_yes(market_key: impl Into<String>, participant: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(market_key, participant, Direction::Yes, reason)
    }

    pub fn buy_no(market_key: impl Into<String>, participant: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(market_key, participant, Direction::No, reason)
    }

    pub fn with_exact_title(mut self) -> Self {
        self.matching = MarketMatch::ExactTitle;
        self
    }

    pub fn key(&self) -> TradeKey {
        TradeKey {
            market_key: self.market_key.clone(),
            participant: self.participant.clone(),
            direction: self.direction,
        }
    }
}

/// De-duplication key of a trade
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TradeKey {
    pub market_key: String,
    pub participant: String,
    pub direction: Direction,
}

impl std::fmt::Display for TradeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.market_key, self.participant, self.direction)
    }
}

/// A trade that was confirmed by the order sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub market_key: String,
    pub participant: String,
    pub direction: Direction,
    /// Version of the snapshot whose trade most recently succeeded
    pub leaderboard_version: String,
    /// Lowest ask observed before placing the order
    pub price: Decimal,
    pub size: Decimal,
    pub executed_at: DateTime<Utc>,
}

impl TradeRecord {
    pub fn key(&self) -> TradeKey {
        TradeKey {
            market_key: self.market_key.clone(),
            participant: self.participant.clone(),
            direction: self.direction,
        }
    }
}

/// Change of a tracked rank between two observations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Transition {
    /// A different company now holds `rank`
    Promotion {
        rank: usize,
        new_company: String,
        old_company: String,
        new_model: String,
        old_model: String,
    },
    /// Same company, different score; informational only
    ScoreChange {
        rank: usize,
        company: String,
        old_score: f64,
        new_score: f64,
    },
}

/// A competitor seen for the first time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEntrant {
    pub name: String,
    pub score: f64,
    pub company: Option<String>,
    pub significant: bool,
}

/// Output of one pure policy step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decision {
    pub intents: Vec<TradeIntent>,
    /// Messages for the notifier
    pub notices: Vec<String>,
    /// Ask the outer loop to terminate
    pub stop: bool,
}

impl Decision {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn stop_with(notice: impl Into<String>) -> Self {
        Self {
            intents: Vec::new(),
            notices: vec![notice.into()],
            stop: true,
        }
    }

    /// Add an intent unless one with the same key is already queued
    pub fn push_intent(&mut self, intent: TradeIntent) {
        if !self.intents.iter().any(|queued| queued.key() == intent.key()) {
            self.intents.push(intent);
        }
    }

    pub fn notice(&mut self, message: impl Into<String>) {
        self.notices.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty() && !self.stop
    }
}

/// Result of one `Strategy::evaluate` call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// Every intent the policy produced, before gating
    pub intents: Vec<TradeIntent>,
    /// Trades the order sink confirmed
    pub executed: Vec<TradeRecord>,
    pub stop: bool,
}

impl Evaluation {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn traded(&self) -> bool {
        !self.executed.is_empty()
    }
}
