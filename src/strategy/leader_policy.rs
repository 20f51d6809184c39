//! Leader-threshold policy: watch a single leader and the models that challenge it

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use super::entrants::{NewEntrantDetector, SignificanceMatcher};
use super::gate::TradeGate;
use super::trader::Trader;
use super::traits::Strategy;
use super::types::{Decision, Evaluation, TradeIntent};
use crate::leaderboard::{CompanyResolver, EventPeriodSelector, LeaderboardSnapshot, ScoreMetric};

/// Static parameters of a leader-threshold policy
#[derive(Debug, Clone)]
pub struct LeaderPolicyConfig {
    pub name: String,
    pub resolver: CompanyResolver,
    pub matcher: SignificanceMatcher,
    pub metric: ScoreMetric,
    /// Each period's first market id is the "who leads" event
    pub periods: EventPeriodSelector,
}

impl LeaderPolicyConfig {
    pub fn new(
        name: impl Into<String>,
        metric: ScoreMetric,
        matcher: SignificanceMatcher,
        periods: EventPeriodSelector,
    ) -> Self {
        Self {
            name: name.into(),
            resolver: CompanyResolver::benchmark(),
            matcher,
            metric,
            periods,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leader {
    pub company: String,
    pub model: String,
    pub score: f64,
}

/// Everything a leader-threshold policy remembers between polls
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LeaderState {
    pub leader: Option<Leader>,
    pub known_models: NewEntrantDetector,
    pub last_version: Option<String>,
}

/// Advance the policy by one snapshot
///
/// New entrants are compared against the leader as stored before this call;
/// the leader is overwritten once, afterwards.
pub fn step(
    mut state: LeaderState,
    snapshot: Option<&LeaderboardSnapshot>,
    now: DateTime<Utc>,
    config: &LeaderPolicyConfig,
) -> (LeaderState, Decision) {
    let name = config.name.as_str();

    let Some(snapshot) = snapshot.filter(|s| !s.is_empty()) else {
        warn!(strategy = name, "No leaderboard entries in this poll");
        return (state, Decision::none());
    };

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
                "[{}] Leaderboard updated\nVersion: {}\nTotal models: {}",
                name, version, snapshot.total_models
            ));
        }
    }
    state.last_version = Some(version);

    let sorted = snapshot.sorted_by(&config.metric);
    let top = sorted[0];
    let top_score = config.metric.score_of(top);
    let top_company = config.resolver.resolve(&top.display_name);
    if top_company.is_none() {
        warn!(strategy = name, "Could not map top model {:?} to a known company", top.display_name);
    }

    let Some(leader) = state.leader.clone() else {
        state.known_models.absorb(&snapshot.entries);
        if let Some(company) = top_company {
            info!(
                strategy = name,
                known_models = state.known_models.known_count(),
                "Initialized. Leader: {} ({})",
                company,
                top_score
            );
            decision.notice(format!(
                "[{}] Initialized\nLeader: {} ({}) {}\nKnown models: {}",
                name,
                company,
                top.display_name,
                top_score,
                state.known_models.known_count()
            ));
            state.leader = Some(Leader {
                company,
                model: top.display_name.clone(),
                score: top_score,
            });
        }
        return (state, decision);
    };

    let market = period.market_for_rank(1);

    for entrant in state.known_models.scan(
        &snapshot.entries,
        &config.resolver,
        &config.matcher,
        &config.metric,
    ) {
        info!(strategy = name, score = entrant.score, "New model detected: {}", entrant.name);
        decision.notice(format!(
            "[{}] New model detected: {} (score: {})",
            name, entrant.name, entrant.score
        ));

        let Some(company) = entrant.company else {
            warn!(strategy = name, "Unknown company for new model {}, not trading", entrant.name);
            continue;
        };

        if entrant.score > leader.score {
            if company == leader.company {
                info!(strategy = name, "{} improved its own lead with {}", company, entrant.name);
                continue;
            }
            warn!(
                strategy = name,
                "Challenger success: {} ({}) beat {} ({})",
                entrant.name,
                entrant.score,
                leader.company,
                leader.score
            );
            if let Some(market) = market {
                decision.push_intent(TradeIntent::buy_yes(
                    market,
                    company.as_str(),
                    format!("Usurpation: {} ({}) took the lead", entrant.name, entrant.score),
                ));
            }
        } else if entrant.significant {
            warn!(
                strategy = name,
                "Major challenger failed: {} ({}) <= leader score ({})",
                entrant.name,
                entrant.score,
                leader.score
            );
            if let Some(market) = market {
                decision.push_intent(TradeIntent::buy_yes(
                    market,
                    leader.company.as_str(),
                    format!("Defense: {} failed to beat {}", entrant.name, leader.company),
                ));
            }
        } else {
            info!(strategy = name, "Minor challenger failed: {}. Ignoring.", entrant.name);
        }
    }

    if let Some(company) = top_company {
        if company != leader.company || top_score != leader.score {
            if company != leader.company {
                decision.notice(format!(
                    "[{}] Leader changed\nOld: {} ({})\nNew: {} ({})\nModel: {}",
                    name, leader.company, leader.score, company, top_score, top.display_name
                ));
            } else {
                info!(
                    strategy = name,
                    "Leader score changed: {} {} -> {}",
                    company,
                    leader.score,
                    top_score
                );
            }
            state.leader = Some(Leader {
                company,
                model: top.display_name.clone(),
                score: top_score,
            });
        }
    }

    (state, decision)
}

/// Leader-threshold strategy bound to a trader
pub struct LeaderStrategy {
    config: LeaderPolicyConfig,
    state: LeaderState,
    gate: TradeGate,
    trader: Arc<Trader>,
}

impl LeaderStrategy {
    pub fn new(config: LeaderPolicyConfig, trader: Arc<Trader>) -> Self {
        Self {
            config,
            state: LeaderState::default(),
            gate: TradeGate::new(),
            trader,
        }
    }

    pub fn state(&self) -> &LeaderState {
        &self.state
    }
}

#[async_trait]
impl Strategy for LeaderStrategy {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn evaluate(
        &mut self,
        snapshot: Option<&LeaderboardSnapshot>,
        now: DateTime<Utc>,
    ) -> Evaluation {
        let state = std::mem::take(&mut self.state);
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
            "leader": self.state.leader,
            "knownModels": self.state.known_models.known_count(),
            "lastVersion": self.state.last_version,
            "activePeriod": self.config.periods.current(Utc::now()).map(|p| &p.label),
            "trades": self.gate.records(),
        })
    }

    fn reset(&mut self) {
        self.state = LeaderState::default();
        self.gate.clear();
        info!(strategy = %self.config.name, "State reset");
    }
}
