//! Compile-time registry of the strategies the bot can run

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::aggregate::AggregateStrategy;
use super::entrants::SignificanceMatcher;
use super::ladder::{LadderConfig, LadderStrategy, ScoreTier};
use super::leader_policy::{LeaderPolicyConfig, LeaderStrategy};
use super::rank_policy::{RankPolicyConfig, RankStrategy};
use super::trader::Trader;
use super::traits::BoxedStrategy;
use crate::common::errors::{BotError, Result};
use crate::leaderboard::{EventPeriod, EventPeriodSelector, ScoreMetric};

/// Stable identifier of every strategy the bot can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyId {
    /// Arena text leaderboard, style control on, top-3 ranks
    LmarenaText,
    /// Arena text leaderboard, style control off, top-3 ranks
    LmarenaTextNoStyle,
    /// LiveBench coding leader
    LivebenchCoding,
    /// LiveBench mathematics leader
    LivebenchMath,
    /// LiveBench coding and mathematics together
    Livebench,
    /// Gemini 3 arena score tiers
    #[value(name = "gemini3-lmarena-score")]
    #[serde(rename = "gemini3-lmarena-score")]
    Gemini3LmarenaScore,
    /// Gemini 3 Humanity's Last Exam score tiers
    #[value(name = "gemini3-hle")]
    #[serde(rename = "gemini3-hle")]
    Gemini3Hle,
    /// Arena text (no style) together with the Gemini 3 score tiers
    LmarenaTextAggregate,
}

impl StrategyId {
    pub const ALL: [StrategyId; 8] = [
        StrategyId::LmarenaText,
        StrategyId::LmarenaTextNoStyle,
        StrategyId::LivebenchCoding,
        StrategyId::LivebenchMath,
        StrategyId::Livebench,
        StrategyId::Gemini3LmarenaScore,
        StrategyId::Gemini3Hle,
        StrategyId::LmarenaTextAggregate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyId::LmarenaText => "lmarena-text",
            StrategyId::LmarenaTextNoStyle => "lmarena-text-no-style",
            StrategyId::LivebenchCoding => "livebench-coding",
            StrategyId::LivebenchMath => "livebench-math",
            StrategyId::Livebench => "livebench",
            StrategyId::Gemini3LmarenaScore => "gemini3-lmarena-score",
            StrategyId::Gemini3Hle => "gemini3-hle",
            StrategyId::LmarenaTextAggregate => "lmarena-text-aggregate",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StrategyId::LmarenaText => "Arena text top-3 rank changes (style control on)",
            StrategyId::LmarenaTextNoStyle => "Arena text top-3 rank changes (style control off)",
            StrategyId::LivebenchCoding => "LiveBench coding leader and challengers",
            StrategyId::LivebenchMath => "LiveBench mathematics leader and challengers",
            StrategyId::Livebench => "LiveBench coding and mathematics together",
            StrategyId::Gemini3LmarenaScore => "Gemini 3 arena score tiers (1500+, 1600+)",
            StrategyId::Gemini3Hle => "Gemini 3 Humanity's Last Exam score tiers (40%+, 45%)",
            StrategyId::LmarenaTextAggregate => "Arena text (style off) plus Gemini 3 score tiers",
        }
    }
}

impl std::fmt::Display for StrategyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Runtime pieces every strategy is built from
#[derive(Debug, Clone)]
pub struct StrategyDeps {
    pub trader: Arc<Trader>,
    pub tracked_ranks: usize,
    pub max_validation_failures: u32,
}

impl StrategyDeps {
    pub fn new(trader: Arc<Trader>) -> Self {
        Self {
            trader,
            tracked_ranks: 3,
            max_validation_failures: 5,
        }
    }
}

const LIVEBENCH_SIGNIFICANT: &[&str] = &[r"gpt-5\.2-codex", r"gemini-3(\.0)?-(pro|flash)"];

const LIVEBENCH_CODING_EVENT: &str =
    "which-company-will-have-the-best-ai-model-for-coding-at-the-end-of-2025";
const LIVEBENCH_MATH_EVENT: &str =
    "which-company-will-have-the-best-ai-model-for-math-at-the-end-of-2025";
const GEMINI3_LMARENA_EVENT: &str = "google-gemini-3-score-on-lmarena-by-december-31";
const GEMINI3_HLE_EVENT: &str = "google-gemini-3-score-on-humanitys-last-exam-by-january-31";

/// Build the strategy registered under `id`
pub fn build(id: StrategyId, deps: &StrategyDeps) -> Result<BoxedStrategy> {
    let strategy: BoxedStrategy = match id {
        StrategyId::LmarenaText => Box::new(RankStrategy::new(
            rank_config(id, lmarena_style_on_periods()?, deps),
            deps.trader.clone(),
        )),
        StrategyId::LmarenaTextNoStyle => Box::new(RankStrategy::new(
            rank_config(id, lmarena_no_style_periods()?, deps),
            deps.trader.clone(),
        )),
        StrategyId::LivebenchCoding => Box::new(LeaderStrategy::new(
            leader_config(id, ScoreMetric::category("coding"), LIVEBENCH_CODING_EVENT)?,
            deps.trader.clone(),
        )),
        StrategyId::LivebenchMath => Box::new(LeaderStrategy::new(
            leader_config(id, ScoreMetric::category("mathematics"), LIVEBENCH_MATH_EVENT)?,
            deps.trader.clone(),
        )),
        StrategyId::Livebench => Box::new(AggregateStrategy::new(
            id.as_str(),
            vec![
                build(StrategyId::LivebenchCoding, deps)?,
                build(StrategyId::LivebenchMath, deps)?,
            ],
        )),
        StrategyId::Gemini3LmarenaScore => Box::new(LadderStrategy::new(
            LadderConfig {
                name: id.as_str().to_string(),
                model_prefix: "gemini-3".to_string(),
                metric: ScoreMetric::Overall,
                tiers: vec![
                    ScoreTier::at_least("1600+", 1600.0),
                    ScoreTier::at_least("1500+", 1500.0),
                ],
                period: EventPeriod::new(
                    "December 2025",
                    deadline("2026-01-01T05:00:00Z")?,
                    [GEMINI3_LMARENA_EVENT],
                ),
                single_shot: false,
            },
            deps.trader.clone(),
        )),
        StrategyId::Gemini3Hle => Box::new(LadderStrategy::new(
            LadderConfig {
                name: id.as_str().to_string(),
                model_prefix: "gemini-3".to_string(),
                metric: ScoreMetric::Overall,
                tiers: vec![ScoreTier::at_least("45%", 45.0), ScoreTier::above("40%+", 40.0)],
                period: EventPeriod::new(
                    "January 2026",
                    deadline("2026-02-01T05:00:00Z")?,
                    [GEMINI3_HLE_EVENT],
                ),
                single_shot: true,
            },
            deps.trader.clone(),
        )),
        StrategyId::LmarenaTextAggregate => Box::new(AggregateStrategy::new(
            id.as_str(),
            vec![
                build(StrategyId::LmarenaTextNoStyle, deps)?,
                build(StrategyId::Gemini3LmarenaScore, deps)?,
            ],
        )),
    };
    Ok(strategy)
}

fn rank_config(id: StrategyId, periods: EventPeriodSelector, deps: &StrategyDeps) -> RankPolicyConfig {
    RankPolicyConfig::new(id.as_str(), periods)
        .with_tracked_ranks(deps.tracked_ranks)
        .with_max_validation_failures(deps.max_validation_failures)
}

fn leader_config(id: StrategyId, metric: ScoreMetric, event: &str) -> Result<LeaderPolicyConfig> {
    Ok(LeaderPolicyConfig::new(
        id.as_str(),
        metric,
        SignificanceMatcher::new(LIVEBENCH_SIGNIFICANT.iter().copied())?,
        EventPeriodSelector::new(vec![EventPeriod::new(
            "End of 2025",
            deadline("2026-01-01T05:00:00Z")?,
            [event],
        )]),
    ))
}

fn deadline(instant: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(instant)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| BotError::Internal(format!("bad period deadline {}: {}", instant, e)))
}

/// Deadlines are noon US Eastern on the last day of each month
pub fn lmarena_style_on_periods() -> Result<EventPeriodSelector> {
    Ok(EventPeriodSelector::new(vec![
        EventPeriod::new(
            "December 2025",
            deadline("2025-12-31T17:00:00Z")?,
            [
                "which-company-has-top-ai-model-end-of-december-style-control-on",
                "which-company-has-the-2-ai-model-end-of-december-style-control-on",
                "which-company-has-the-3-ai-model-end-of-december-style-control-on",
            ],
        ),
        EventPeriod::new(
            "January 2026",
            deadline("2026-01-31T17:00:00Z")?,
            [
                "which-company-has-the-best-ai-model-end-of-january-style-control-on",
                "which-company-has-the-2-ai-model-end-of-january-style-control-on",
                "which-company-has-the-3-ai-model-end-of-january-style-control-on",
            ],
        ),
        EventPeriod::new(
            "March 2026",
            deadline("2026-03-31T16:00:00Z")?,
            [
                "which-company-has-the-top-ai-model-end-of-march-style-control-on",
                "which-company-has-the-2-ai-model-end-of-march-style-control-on",
                "which-company-has-the-3-ai-model-end-of-march-style-control-on",
            ],
        ),
        EventPeriod::new(
            "June 2026",
            deadline("2026-06-30T16:00:00Z")?,
            ["which-company-has-top-ai-model-end-of-june-style-control-on", "", ""],
        ),
    ]))
}

pub fn lmarena_no_style_periods() -> Result<EventPeriodSelector> {
    Ok(EventPeriodSelector::new(vec![
        EventPeriod::new(
            "December 2025",
            deadline("2025-12-31T17:00:00Z")?,
            [
                "which-company-has-best-ai-model-end-of-2025",
                "which-company-has-second-best-ai-model-end-of-december",
                "which-company-has-the-third-best-ai-model-end-of-december",
            ],
        ),
        EventPeriod::new(
            "January 2026",
            deadline("2026-01-31T17:00:00Z")?,
            [
                "which-company-has-the-best-ai-model-end-of-january",
                "which-company-has-the-second-best-ai-model-end-of-january",
                "which-company-has-the-third-best-ai-model-end-of-january",
            ],
        ),
        EventPeriod::new(
            "March 2026",
            deadline("2026-03-31T16:00:00Z")?,
            [
                "which-company-has-the-best-ai-model-end-of-march-751",
                "which-company-has-the-second-best-ai-model-end-of-march",
                "which-company-has-the-third-best-ai-model-end-of-march",
            ],
        ),
        EventPeriod::new(
            "June 2026",
            deadline("2026-06-30T16:00:00Z")?,
            [
                "which-company-has-best-ai-model-end-of-june",
                "which-company-has-second-best-ai-model-end-of-june",
                "",
            ],
        ),
    ]))
}
