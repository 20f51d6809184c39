//! Rank-based policy: trade the companies that move in or out of a tracked rank
//!
//! The decision logic is the pure [`step`] function over a [`RankState`];
//! [`RankStrategy`] wraps it with a [`Trader`] and the trade gate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::entrants::{NewEntrantDetector, SignificanceMatcher};
use super::gate::TradeGate;
use super::rank_tracker::RankStateTracker;
use super::trader::Trader;
use super::traits::Strategy;
use super::types::{Decision, Evaluation, TradeIntent, Transition};
use crate::leaderboard::{
    CompanyResolver, EventPeriodSelector, LeaderboardSnapshot, ScoreMetric, ValidationCounter,
    ValidationOutcome, VersionValidator,
};

/// Static parameters of a rank-based policy
#[derive(Debug, Clone)]
pub struct RankPolicyConfig {
    pub name: String,
    pub tracked_ranks: usize,
    pub resolver: CompanyResolver,
    pub validator: VersionValidator,
    pub max_validation_failures: u32,
    pub periods: EventPeriodSelector,
}

impl RankPolicyConfig {
    pub fn new(name: impl Into<String>, periods: EventPeriodSelector) -> Self {
        Self {
            name: name.into(),
            tracked_ranks: 3,
            resolver: CompanyResolver::arena(),
            validator: VersionValidator::default(),
            max_validation_failures: 5,
            periods,
        }
    }

    pub fn with_tracked_ranks(mut self, tracked_ranks: usize) -> Self {
        self.tracked_ranks = tracked_ranks;
        self
    }

    pub fn with_max_validation_failures(mut self, max: u32) -> Self {
        self.max_validation_failures = max;
        self
    }
}

/// Everything a rank-based policy remembers between polls
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankState {
    pub tracker: RankStateTracker,
    pub known_models: NewEntrantDetector,
    pub validation: ValidationCounter,
    pub last_version: Option<String>,
}

impl RankState {
    pub fn new(tracked_ranks: usize) -> Self {
        Self {
            tracker: RankStateTracker::new(tracked_ranks),
            known_models: NewEntrantDetector::new(),
            validation: ValidationCounter::default(),
            last_version: None,
        }
    }
}

/// Advance the policy by one snapshot
pub fn step(
    mut state: RankState,
    snapshot: Option<&LeaderboardSnapshot>,
    now: DateTime<Utc>,
    config: &RankPolicyConfig,
) -> (RankState, Decision) {
    let name = config.name.as_str();

    let Some(snapshot) = snapshot.filter(|s| !s.is_empty()) else {
        warn!(strategy = name, "No leaderboard entries in this poll");
        return (state, Decision::none());
    };

    match state.validation.check(
        &config.validator,
        &snapshot.version,
        config.max_validation_failures,
    ) {
        ValidationOutcome::Valid => {}
        ValidationOutcome::Invalid { .. } => return (state, Decision::none()),
        ValidationOutcome::Escalate { failures } => {
            let notice = format!(
                "[{}] Leaderboard version label invalid {} times in a row (last: {:?}). Stopping.",
                name, failures, snapshot.version
            );
            warn!(strategy = name, failures, "Validation failure threshold reached");
            return (state, Decision::stop_with(notice));
        }
    }

    let Some(period) = config.periods.current(now) else {
        warn!(strategy = name, "All event periods have ended");
        return (
            state,
            Decision::stop_with(format!("[{}] All event periods have ended. Stopping.", name)),
        );
    };

    let mut decision = Decision::none();
    let version = snapshot.version_token();

    if let Some(previous) = state.last_version.as_deref() {
        if previous != version {
            info!(strategy = name, previous, current = %version, "Leaderboard updated");
            decision.notice(format!(
                "[{}] Leaderboard updated\nVersion: {}\nTotal votes: {}\nTotal models: {}",
                name, version, snapshot.total_votes, snapshot.total_models
            ));
        }
    }
    state.last_version = Some(version.clone());

    info!(
        strategy = name,
        models = snapshot.entries.len(),
        version = %version,
        period = %period.label,
        "Evaluating leaderboard"
    );

    let top = snapshot.effective_top(config.tracked_ranks);

    if !state.tracker.is_initialized() {
        state.known_models.absorb(&snapshot.entries);
        state.tracker.observe(&top, &config.resolver);
        decision.notice(initialization_notice(&state, config, &period.label));
        info!(
            strategy = name,
            known_models = state.known_models.known_count(),
            "Initialized rank state"
        );
        return (state, decision);
    }

    for entrant in state.known_models.scan(
        &snapshot.entries,
        &config.resolver,
        &SignificanceMatcher::default(),
        &ScoreMetric::Overall,
    ) {
        info!(
            strategy = name,
            company = entrant.company.as_deref().unwrap_or("Unknown"),
            score = entrant.score,
            "New model: {}",
            entrant.name
        );
    }

    for transition in state.tracker.observe(&top, &config.resolver) {
        match transition {
            Transition::Promotion {
                rank,
                new_company,
                old_company,
                new_model,
                old_model,
            } => {
                let Some(market) = period.market_for_rank(rank) else {
                    debug!(strategy = name, rank, "No market for this rank in the current period");
                    continue;
                };

                info!(
                    strategy = name,
                    rank,
                    "Rank #{} change: {} ({}) -> {} ({})",
                    rank,
                    old_company,
                    old_model,
                    new_company,
                    new_model
                );
                decision.notice(format!(
                    "[{}] Rank change\nPosition: #{}\nPrevious: {} ({})\nNew: {} ({})\nPeriod: {}",
                    name, rank, old_company, old_model, new_company, new_model, period.label
                ));

                decision.push_intent(TradeIntent::buy_yes(
                    market,
                    new_company.as_str(),
                    format!(
                        "Rank #{} change: {} took position from {}",
                        rank, new_company, old_company
                    ),
                ));
                decision.push_intent(TradeIntent::buy_no(
                    market,
                    old_company.as_str(),
                    format!(
                        "Rank #{} change: {} lost position to {}",
                        rank, old_company, new_company
                    ),
                ));
            }
            Transition::ScoreChange {
                rank,
                company,
                old_score,
                new_score,
            } => {
                info!(
                    strategy = name,
                    rank,
                    "Score change for {} at rank #{}: {} -> {}",
                    company,
                    rank,
                    old_score,
                    new_score
                );
            }
        }
    }

    (state, decision)
}

fn initialization_notice(state: &RankState, config: &RankPolicyConfig, period: &str) -> String {
    let mut lines = vec![format!("[{}] Initialized", config.name)];
    for (index, slot) in state.tracker.slots().iter().enumerate() {
        if let Some(slot) = slot {
            lines.push(format!(
                "#{}: {} ({}) {}",
                index + 1,
                slot.company.as_deref().unwrap_or("Unknown"),
                slot.model,
                slot.score
            ));
        }
    }
    lines.push(format!("Known models: {}", state.known_models.known_count()));
    lines.push(format!("Active period: {}", period));
    lines.join("\n")
}

/// Rank-based strategy bound to a trader
pub struct RankStrategy {
    config: RankPolicyConfig,
    state: RankState,
    gate: TradeGate,
    trader: Arc<Trader>,
}

impl RankStrategy {
    pub fn new(config: RankPolicyConfig, trader: Arc<Trader>) -> Self {
        let state = RankState::new(config.tracked_ranks);
        Self {
            config,
            state,
            gate: TradeGate::new(),
            trader,
        }
    }

    pub fn state(&self) -> &RankState {
        &self.state
    }

    pub fn gate(&self) -> &TradeGate {
        &self.gate
    }
}

#[async_trait]
impl Strategy for RankStrategy {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn evaluate(
        &mut self,
        snapshot: Option<&LeaderboardSnapshot>,
        now: DateTime<Utc>,
    ) -> Evaluation {
        let state = std::mem::replace(&mut self.state, RankState::new(self.config.tracked_ranks));
        let (state, decision) = step(state, snapshot, now, &self.config);
        self.state = state;

        let version = snapshot.map(LeaderboardSnapshot::version_token);
        self.trader
            .apply(&self.config.name, decision, version.as_deref(), &mut self.gate)
            .await
    }

    fn state_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "strategy": self.config.name,
            "initialized": self.state.tracker.is_initialized(),
            "slots": self.state.tracker.slots(),
            "knownModels": self.state.known_models.known_count(),
            "consecutiveValidationFailures": self.state.validation.consecutive_failures,
            "lastVersion": self.state.last_version,
            "activePeriod": self.config.periods.current(Utc::now()).map(|p| &p.label),
            "trades": self.gate.records(),
        })
    }

    fn reset(&mut self) {
        self.state = RankState::new(self.config.tracked_ranks);
        self.gate.clear();
        info!(strategy = %self.config.name, "State reset");
    }
}
