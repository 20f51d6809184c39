//! Turns trade intents into orders
//!
//! Every intent goes through the same sequence: gate check, event lookup by
//! slug, market match, outcome token, order book, price ceiling, order
//! placement. Any miss along the way skips that intent only.

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::gate::TradeGate;
use super::types::{Decision, Evaluation, MarketMatch, TradeIntent, TradeRecord};
use crate::common::traits::{MarketDirectory, Notifier, OrderSink};
use crate::common::types::{OrderRequest, OrderType, Side, TimeInForce};
use crate::config::types::TradingConfig;

/// Order parameters shared by every intent
#[derive(Debug, Clone, PartialEq)]
pub struct TradeSettings {
    /// Dollar amount per buy
    pub order_size: Decimal,
    /// Skip when the lowest ask is at or above this; also the order's price
    pub price_ceiling: Decimal,
    pub order_type: OrderType,
    pub time_in_force: Option<TimeInForce>,
}

impl Default for TradeSettings {
    fn default() -> Self {
        Self {
            order_size: dec!(10),
            price_ceiling: dec!(0.9),
            order_type: OrderType::Market,
            time_in_force: Some(TimeInForce::Fak),
        }
    }
}

impl From<&TradingConfig> for TradeSettings {
    fn from(config: &TradingConfig) -> Self {
        Self {
            order_size: config.order_size,
            price_ceiling: config.price_ceiling,
            order_type: config.order_type,
            time_in_force: config.time_in_force,
        }
    }
}

/// Executes intents against the market directory and order sink
pub struct Trader {
    directory: Arc<dyn MarketDirectory>,
    sink: Arc<dyn OrderSink>,
    notifier: Arc<dyn Notifier>,
    settings: TradeSettings,
}

impl std::fmt::Debug for Trader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trader")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Trader {
    pub fn new(
        directory: Arc<dyn MarketDirectory>,
        sink: Arc<dyn OrderSink>,
        notifier: Arc<dyn Notifier>,
        settings: TradeSettings,
    ) -> Self {
        Self {
            directory,
            sink,
            notifier,
            settings,
        }
    }

    pub fn settings(&self) -> &TradeSettings {
        &self.settings
    }

    pub async fn notify(&self, message: &str) {
        self.notifier.notify(message).await;
    }

    /// Deliver a policy decision: send its notices, then run its intents
    pub async fn apply(
        &self,
        strategy: &str,
        decision: Decision,
        version: Option<&str>,
        gate: &mut TradeGate,
    ) -> Evaluation {
        for notice in &decision.notices {
            self.notifier.notify(notice).await;
        }

        let executed = match version {
            Some(version) if !decision.intents.is_empty() => {
                self.execute_all(strategy, &decision.intents, version, gate)
                    .await
            }
            _ => Vec::new(),
        };

        Evaluation {
            intents: decision.intents,
            executed,
            stop: decision.stop,
        }
    }

    /// Run intents one after another, recording each confirmed trade
    pub async fn execute_all(
        &self,
        strategy: &str,
        intents: &[TradeIntent],
        version: &str,
        gate: &mut TradeGate,
    ) -> Vec<TradeRecord> {
        let mut executed = Vec::new();
        for intent in intents {
            if let Some(record) = self.execute(strategy, intent, version, gate).await {
                executed.push(record);
            }
        }
        executed
    }

    /// Try one intent; `Some` only when the order sink confirmed it
    pub async fn execute(
        &self,
        strategy: &str,
        intent: &TradeIntent,
        version: &str,
        gate: &mut TradeGate,
    ) -> Option<TradeRecord> {
        let key = intent.key();
        if !gate.admit(&key, version) {
            debug!(strategy, %key, version, "Already traded for this leaderboard version");
            return None;
        }

        info!(
            strategy,
            %key,
            reason = %intent.reason,
            "Executing BUY {} for {}",
            intent.direction,
            intent.participant
        );

        let Some(event) = self.directory.get_event_by_slug(&intent.market_key).await else {
            warn!(strategy, slug = %intent.market_key, "Event not found");
            return None;
        };

        let market = match intent.matching {
            MarketMatch::TitleOrQuestion => event.find_market(&intent.participant),
            MarketMatch::ExactTitle => event.find_by_title(&intent.participant),
        };
        let Some(market) = market else {
            warn!(
                strategy,
                slug = %intent.market_key,
                available = ?event.titles(),
                "Market for {:?} not found",
                intent.participant
            );
            return None;
        };

        let Some(token_id) = market.token_for_outcome(intent.direction.outcome_label()) else {
            warn!(
                strategy,
                outcomes = ?market.outcomes,
                "{} outcome not found for {}",
                intent.direction,
                intent.participant
            );
            return None;
        };
        let token_id = token_id.to_string();

        let Some(book) = self.directory.get_order_book(&token_id).await else {
            warn!(strategy, token_id = %token_id, "Order book unavailable");
            return None;
        };

        let Some(lowest_ask) = book.lowest_ask() else {
            warn!(strategy, "No asks for {} {}", intent.participant, intent.direction);
            return None;
        };

        info!(
            strategy,
            "{} {} lowest ask: {}",
            intent.participant,
            intent.direction,
            lowest_ask
        );

        if lowest_ask >= self.settings.price_ceiling {
            info!(
                strategy,
                lowest_ask = %lowest_ask,
                ceiling = %self.settings.price_ceiling,
                "Lowest ask at or above ceiling, skipping"
            );
            return None;
        }

        let order = OrderRequest {
            token_id,
            price: self.settings.price_ceiling,
            size: self.settings.order_size,
            side: Side::Buy,
            order_type: self.settings.order_type,
            time_in_force: self.settings.time_in_force,
        };

        if !self.sink.execute(&order).await {
            warn!(strategy, %key, "Order was not placed");
            return None;
        }

        let record = TradeRecord {
            market_key: intent.market_key.clone(),
            participant: intent.participant.clone(),
            direction: intent.direction,
            leaderboard_version: version.to_string(),
            price: lowest_ask,
            size: self.settings.order_size,
            executed_at: Utc::now(),
        };
        gate.record(record.clone());

        self.notifier
            .notify(&format!(
                "[{}] {} BUY: {} {} @ {} (~${}). Reason: {}",
                strategy,
                order.order_type,
                intent.participant,
                intent.direction,
                order.price,
                order.size,
                intent.reason
            ))
            .await;

        Some(record)
    }
}
