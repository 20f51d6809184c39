//! Strategy module for trade decision making
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PURE (per poll)                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  step(state, snapshot, now, config) -> (state', Decision)   │
//! │    - validates the snapshot                                 │
//! │    - selects the active event period                        │
//! │    - RankStateTracker / NewEntrantDetector                  │
//! │    - emits BUY-YES / BUY-NO trade intents                   │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ASYNC (per intent, sequential)           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Trader                                                     │
//! │    - TradeGate admit (market, participant, side, version)   │
//! │    - event by slug -> market -> outcome token               │
//! │    - order book lowest ask vs price ceiling                 │
//! │    - order sink, then record the trade                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`Strategy`]: Trait the bot drives once per poll
//! - [`RankStrategy`]: Top-N rank tracking (arena leaderboards)
//! - [`LeaderStrategy`]: Single leader plus challengers (benchmark leaderboards)
//! - [`LadderStrategy`]: Score tier markets for one model family
//! - [`AggregateStrategy`]: Several strategies on one snapshot
//! - [`TradeGate`]: Version-keyed de-duplication
//! - [`StrategyId`]: Registry of buildable strategies

mod aggregate;
mod entrants;
mod gate;
mod ladder;
mod leader_policy;
mod rank_policy;
mod rank_tracker;
mod registry;
mod trader;
mod traits;
mod types;

pub use aggregate::AggregateStrategy;
pub use entrants::{NewEntrantDetector, SignificanceMatcher};
pub use gate::TradeGate;
pub use ladder::{LadderConfig, LadderStrategy, ScoreTier, LADDER_VERSION};
pub use leader_policy::{Leader, LeaderPolicyConfig, LeaderState, LeaderStrategy};
pub use rank_policy::{RankPolicyConfig, RankState, RankStrategy};
pub use rank_tracker::{RankSlot, RankStateTracker};
pub use registry::{build, lmarena_no_style_periods, lmarena_style_on_periods, StrategyDeps, StrategyId};
pub use trader::{TradeSettings, Trader};
pub use traits::{BoxedStrategy, Strategy};
pub use types::{
    Decision,
    Direction,
    Evaluation,
    MarketMatch,
    NewEntrant,
    TradeIntent,
    TradeKey,
    TradeRecord,
    Transition,
};

/// Pure step functions, exposed for testing the state machines directly
pub mod policy {
    pub use super::ladder::step as ladder_step;
    pub use super::leader_policy::step as leader_step;
    pub use super::rank_policy::step as rank_step;
}
