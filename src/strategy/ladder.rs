//! Score-ladder policy: buy the highest score tier a model family has reached

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::gate::TradeGate;
use super::trader::Trader;
use super::traits::Strategy;
use super::types::{Decision, Evaluation, TradeIntent};
use crate::leaderboard::{EventPeriod, LeaderboardSnapshot, ScoreMetric};

/// Version under which ladder trades are recorded; tiers are bought once ever
pub const LADDER_VERSION: &str = "once";

/// One threshold market inside the ladder event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreTier {
    /// Market group title, e.g. "1500+"
    pub title: String,
    pub threshold: f64,
    /// `true` for `score >= threshold`, `false` for `score > threshold`
    pub inclusive: bool,
}

impl ScoreTier {
    pub fn at_least(title: impl Into<String>, threshold: f64) -> Self {
        Self {
            title: title.into(),
            threshold,
            inclusive: true,
        }
    }

    pub fn above(title: impl Into<String>, threshold: f64) -> Self {
        Self {
            title: title.into(),
            threshold,
            inclusive: false,
        }
    }

    pub fn reached_by(&self, score: f64) -> bool {
        if self.inclusive {
            score >= self.threshold
        } else {
            score > self.threshold
        }
    }
}

/// Static parameters of a score-ladder policy
#[derive(Debug, Clone)]
pub struct LadderConfig {
    pub name: String,
    /// Lowercase model-name prefix of the tracked family
    pub model_prefix: String,
    pub metric: ScoreMetric,
    /// Ordered from highest threshold to lowest
    pub tiers: Vec<ScoreTier>,
    /// The ladder event; its first market id is the event slug
    pub period: EventPeriod,
    /// Target only the highest reached tier and stop trading after one buy
    pub single_shot: bool,
}

/// Best score of the tracked family, `None` when no model matches
pub fn family_best(snapshot: &LeaderboardSnapshot, config: &LadderConfig) -> Option<f64> {
    snapshot
        .entries
        .iter()
        .filter(|e| e.display_name.to_lowercase().starts_with(&config.model_prefix))
        .map(|e| config.metric.score_of(e))
        .max_by(f64::total_cmp)
}

/// Decide which tier to buy
///
/// Pure: the caller passes the trade gate so tiers already bought are skipped.
pub fn step(
    snapshot: Option<&LeaderboardSnapshot>,
    now: DateTime<Utc>,
    config: &LadderConfig,
    gate: &TradeGate,
) -> Decision {
    let name = config.name.as_str();

    if !config.period.is_active(now) {
        warn!(strategy = name, "Event period {} has ended", config.period.label);
        return Decision::stop_with(format!(
            "[{}] Event period {} has ended. Stopping.",
            name, config.period.label
        ));
    }

    let Some(snapshot) = snapshot.filter(|s| !s.is_empty()) else {
        info!(strategy = name, "No data received from monitor");
        return Decision::none();
    };

    let Some(best) = family_best(snapshot, config) else {
        info!(strategy = name, "No {} models found in leaderboard", config.model_prefix);
        return Decision::none();
    };
    info!(strategy = name, best, "Found {} models", config.model_prefix);

    let Some(slug) = config.period.market_for_rank(1) else {
        return Decision::none();
    };

    if config.single_shot && !gate.is_empty() {
        debug!(strategy = name, "Already bought a tier");
        return Decision::none();
    }

    let mut decision = Decision::none();
    for tier in &config.tiers {
        if !tier.reached_by(best) {
            debug!(strategy = name, tier = %tier.title, best, "Tier not reached");
            continue;
        }

        let intent = TradeIntent::buy_yes(
            slug,
            tier.title.as_str(),
            format!("{} best score {} reached tier {}", config.model_prefix, best, tier.title),
        )
        .with_exact_title();

        if !gate.admit(&intent.key(), LADDER_VERSION) {
            debug!(strategy = name, tier = %tier.title, "Tier already bought");
            continue;
        }

        decision.push_intent(intent);
        if config.single_shot {
            break;
        }
    }
    decision
}

/// Score-ladder strategy bound to a trader
pub struct LadderStrategy {
    config: LadderConfig,
    gate: TradeGate,
    trader: Arc<Trader>,
}

impl LadderStrategy {
    pub fn new(config: LadderConfig, trader: Arc<Trader>) -> Self {
        Self {
            config,
            gate: TradeGate::new(),
            trader,
        }
    }
}

#[async_trait]
impl Strategy for LadderStrategy {
    fn name(&self) -> &str {
        &self.config.name
    }

    /// Tiers are tried from the top; the first successful buy ends the poll
    async fn evaluate(
        &mut self,
        snapshot: Option<&LeaderboardSnapshot>,
        now: DateTime<Utc>,
    ) -> Evaluation {
        let decision = step(snapshot, now, &self.config, &self.gate);

        for notice in &decision.notices {
            self.trader.notify(notice).await;
        }

        let mut executed = Vec::new();
        for intent in &decision.intents {
            if let Some(record) = self
                .trader
                .execute(&self.config.name, intent, LADDER_VERSION, &mut self.gate)
                .await
            {
                executed.push(record);
                break;
            }
        }

        Evaluation {
            intents: decision.intents,
            executed,
            stop: decision.stop,
        }
    }

    fn state_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "strategy": self.config.name,
            "modelPrefix": self.config.model_prefix,
            "tiers": self.config.tiers,
            "singleShot": self.config.single_shot,
            "period": self.config.period,
            "trades": self.gate.records(),
        })
    }

    fn reset(&mut self) {
        self.gate.clear();
        info!(strategy = %self.config.name, "State reset");
    }
}
