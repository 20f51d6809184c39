use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::leaderboard::LeaderboardSnapshot;
use crate::strategy::types::Evaluation;

/// Core strategy trait
///
/// The bot calls `evaluate` once per poll, sequentially, and awaits it fully
/// (including any order placement) before polling again. Strategies own all
/// of their state; nothing is shared between instances.
///
/// # Implementation Notes
///
/// - `snapshot` is `None` when the source could not be read this cycle
/// - `now` is the wall-clock time used for event-period selection
/// - Returning `stop: true` asks the bot to exit its loop
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Unique identifier for this strategy
    fn name(&self) -> &str;

    /// Process one poll result
    async fn evaluate(
        &mut self,
        snapshot: Option<&LeaderboardSnapshot>,
        now: DateTime<Utc>,
    ) -> Evaluation;

    /// Serializable view of the in-memory state, for diagnostics
    fn state_summary(&self) -> serde_json::Value;

    /// Forget everything learned so far; the next poll bootstraps again
    fn reset(&mut self);
}

/// Boxed strategy for dynamic dispatch
pub type BoxedStrategy = Box<dyn Strategy>;
