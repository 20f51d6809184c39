//! Poll loop driving one strategy

use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use crate::common::traits::{LeaderboardSource, Notifier};
use crate::strategy::BoxedStrategy;

/// Granularity of the stop-flag check while waiting out the interval
const STOP_POLL: Duration = Duration::from_millis(200);

/// Why the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The strategy asked to stop
    Strategy,
    /// The shared stop flag was raised
    Signal,
    /// The configured cycle limit was reached
    CycleLimit,
}

/// Summary returned by [`Bot::run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub trades: u64,
    pub reason: StopReason,
}

/// Polls a leaderboard source and feeds each snapshot to the strategy
pub struct Bot {
    source: Arc<dyn LeaderboardSource>,
    strategy: BoxedStrategy,
    notifier: Arc<dyn Notifier>,
    interval: Duration,
    max_cycles: Option<u64>,
    stop: Arc<AtomicBool>,
}

impl Bot {
    pub fn new(
        source: Arc<dyn LeaderboardSource>,
        strategy: BoxedStrategy,
        notifier: Arc<dyn Notifier>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            strategy,
            notifier,
            interval,
            max_cycles: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stop after `cycles` polls even if nothing else asked to
    pub fn with_max_cycles(mut self, cycles: u64) -> Self {
        self.max_cycles = Some(cycles);
        self
    }

    /// Flag that ends the loop at the next cycle boundary
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    pub fn strategy(&self) -> &BoxedStrategy {
        &self.strategy
    }

    pub async fn run(&mut self) -> RunSummary {
        let name = self.strategy.name().to_string();
        info!(strategy = %name, interval = ?self.interval, "Bot started");
        self.notifier
            .notify(&format!("Bot started with strategy {}.", name))
            .await;

        let mut cycles = 0u64;
        let mut trades = 0u64;

        let reason = loop {
            if self.stop.load(Ordering::SeqCst) {
                break StopReason::Signal;
            }

            let snapshot = self.source.poll().await;
            let evaluation = self.strategy.evaluate(snapshot.as_ref(), Utc::now()).await;
            cycles += 1;
            trades += evaluation.executed.len() as u64;

            debug!(
                strategy = %name,
                cycles,
                intents = evaluation.intents.len(),
                executed = evaluation.executed.len(),
                "Cycle complete"
            );

            if evaluation.stop {
                break StopReason::Strategy;
            }
            if self.max_cycles.is_some_and(|max| cycles >= max) {
                break StopReason::CycleLimit;
            }

            self.wait_interval().await;
        };

        let message = match reason {
            StopReason::Strategy => "Strategy requested stop. Exiting bot loop.",
            StopReason::Signal => "Stop signal received. Exiting bot loop.",
            StopReason::CycleLimit => "Cycle limit reached. Exiting bot loop.",
        };
        info!(strategy = %name, cycles, trades, "{}", message);
        self.notifier.notify(message).await;

        RunSummary {
            cycles,
            trades,
            reason,
        }
    }

    async fn wait_interval(&self) {
        let deadline = Instant::now() + self.interval;
        while !self.stop.load(Ordering::SeqCst) {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            sleep(STOP_POLL.min(deadline - now)).await;
        }
    }
}
