//! Runs several strategies against the same snapshot

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use super::traits::{BoxedStrategy, Strategy};
use super::types::Evaluation;
use crate::leaderboard::LeaderboardSnapshot;

/// Fan-out over child strategies, evaluated sequentially in order
///
/// A child that asked to stop is not evaluated again. The aggregate asks to
/// stop once every child has.
pub struct AggregateStrategy {
    name: String,
    children: Vec<(BoxedStrategy, bool)>,
}

impl AggregateStrategy {
    pub fn new(name: impl Into<String>, children: Vec<BoxedStrategy>) -> Self {
        Self {
            name: name.into(),
            children: children.into_iter().map(|child| (child, false)).collect(),
        }
    }

    pub fn finished_children(&self) -> Vec<&str> {
        self.children
            .iter()
            .filter(|(_, finished)| *finished)
            .map(|(child, _)| child.name())
            .collect()
    }
}

#[async_trait]
impl Strategy for AggregateStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn evaluate(
        &mut self,
        snapshot: Option<&LeaderboardSnapshot>,
        now: DateTime<Utc>,
    ) -> Evaluation {
        let mut combined = Evaluation::idle();

        for (child, finished) in self.children.iter_mut() {
            if *finished {
                continue;
            }

            let evaluation = child.evaluate(snapshot, now).await;
            if evaluation.stop {
                info!(strategy = %self.name, child = child.name(), "Child strategy finished");
                *finished = true;
            }
            combined.intents.extend(evaluation.intents);
            combined.executed.extend(evaluation.executed);
        }

        combined.stop = self.children.iter().all(|(_, finished)| *finished);
        combined
    }

    fn state_summary(&self) -> serde_json::Value {
        let children: Vec<serde_json::Value> = self
            .children
            .iter()
            .map(|(child, finished)| {
                serde_json::json!({
                    "finished": finished,
                    "state": child.state_summary(),
                })
            })
            .collect();

        serde_json::json!({
            "strategy": self.name,
            "children": children,
        })
    }

    fn reset(&mut self) {
        for (child, finished) in self.children.iter_mut() {
            child.reset();
            *finished = false;
        }
    }
}
