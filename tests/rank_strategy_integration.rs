//! Integration tests for the rank-tracking strategy
//!
//! The strategy runs against in-memory collaborators: events and books come
//! from a fake directory and orders land in a recording sink.

mod common;

use chrono::Duration;
use common::*;
use leaderboard_sniper::leaderboard::Entry;
use leaderboard_sniper::strategy::{Direction, RankPolicyConfig, RankStrategy, Strategy};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

const V1: &str = "Dec 10, 2025";
const V2: &str = "Dec 11, 2025";

fn openai_on_top(version: &str) -> leaderboard_sniper::LeaderboardSnapshot {
    snapshot(
        version,
        vec![
            Entry::new(1, "gpt-5.1-high", 1460.0),
            Entry::new(2, "gemini-3-pro", 1450.0),
            Entry::new(3, "claude-opus-4-5", 1440.0),
            Entry::new(4, "grok-4.1", 1430.0),
        ],
    )
}

fn google_on_top(version: &str) -> leaderboard_sniper::LeaderboardSnapshot {
    snapshot(
        version,
        vec![
            Entry::new(1, "gemini-3-pro", 1490.0),
            Entry::new(2, "gpt-5.1-high", 1460.0),
            Entry::new(3, "claude-opus-4-5", 1440.0),
            Entry::new(4, "grok-4.1", 1430.0),
        ],
    )
}

fn strategy(harness: &Harness) -> RankStrategy {
    RankStrategy::new(
        RankPolicyConfig::new("lmarena-test", rank_periods()),
        harness.trader.clone(),
    )
}

#[test_log::test(tokio::test)]
async fn test_bootstrap_never_trades() {
    let harness = Harness::ranks();
    let mut strategy = strategy(&harness);

    let evaluation = strategy.evaluate(Some(&openai_on_top(V1)), *NOW).await;

    assert!(evaluation.intents.is_empty());
    assert!(evaluation.executed.is_empty());
    assert!(!evaluation.stop);
    assert!(harness.sink.orders.lock().unwrap().is_empty());
    assert!(harness.notifier.contains("Initialized"));
    assert_eq!(strategy.state().known_models.known_count(), 4);
}

#[tokio::test]
async fn test_promotion_buys_both_sides() {
    let harness = Harness::ranks();
    let mut strategy = strategy(&harness);

    strategy.evaluate(Some(&openai_on_top(V1)), *NOW).await;
    let evaluation = strategy.evaluate(Some(&google_on_top(V1)), *NOW).await;

    let trades: Vec<(String, String, Direction)> = evaluation
        .executed
        .iter()
        .map(|r| (r.market_key.clone(), r.participant.clone(), r.direction))
        .collect();
    assert_eq!(
        trades,
        vec![
            ("top-1-dec".to_string(), "Google".to_string(), Direction::Yes),
            ("top-1-dec".to_string(), "OpenAI".to_string(), Direction::No),
            ("top-2-dec".to_string(), "OpenAI".to_string(), Direction::Yes),
            ("top-2-dec".to_string(), "Google".to_string(), Direction::No),
        ]
    );

    assert_eq!(
        harness.sink.tokens(),
        vec![
            token("top-1-dec", "Google", "yes"),
            token("top-1-dec", "OpenAI", "no"),
            token("top-2-dec", "OpenAI", "yes"),
            token("top-2-dec", "Google", "no"),
        ]
    );
    assert!(evaluation.executed.iter().all(|r| r.price == dec!(0.50)));
    assert!(evaluation.executed.iter().all(|r| r.leaderboard_version == V1));
    assert!(harness.notifier.contains("Rank change"));
}

#[tokio::test]
async fn test_same_version_never_trades_twice() {
    let harness = Harness::ranks();
    let mut strategy = strategy(&harness);

    strategy.evaluate(Some(&openai_on_top(V1)), *NOW).await;
    let first = strategy.evaluate(Some(&google_on_top(V1)), *NOW).await;
    let back = strategy.evaluate(Some(&openai_on_top(V1)), *NOW).await;
    let again = strategy.evaluate(Some(&google_on_top(V1)), *NOW).await;

    assert_eq!(first.executed.len(), 4);
    // Flipping back buys the opposite sides, which are new keys
    assert_eq!(back.executed.len(), 4);
    // Same transition inside the same version is blocked by the gate
    assert_eq!(again.intents.len(), 4);
    assert!(again.executed.is_empty());
    assert_eq!(harness.sink.orders.lock().unwrap().len(), 8);
    assert_eq!(strategy.gate().len(), 8);
}

#[tokio::test]
async fn test_new_version_allows_retrade() {
    let harness = Harness::ranks();
    let mut strategy = strategy(&harness);

    strategy.evaluate(Some(&openai_on_top(V1)), *NOW).await;
    strategy.evaluate(Some(&google_on_top(V1)), *NOW).await;
    strategy.evaluate(Some(&openai_on_top(V1)), *NOW).await;
    let retrade = strategy.evaluate(Some(&google_on_top(V2)), *NOW).await;

    assert_eq!(retrade.executed.len(), 4);
    assert!(retrade.executed.iter().all(|r| r.leaderboard_version == V2));
    assert!(harness.notifier.contains("Leaderboard updated"));
}

#[tokio::test]
async fn test_identical_repoll_is_idle() {
    let harness = Harness::ranks();
    let mut strategy = strategy(&harness);

    strategy.evaluate(Some(&openai_on_top(V1)), *NOW).await;
    strategy.evaluate(Some(&google_on_top(V1)), *NOW).await;
    let repoll = strategy.evaluate(Some(&google_on_top(V1)), *NOW).await;

    assert!(repoll.intents.is_empty());
    assert_eq!(harness.sink.orders.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn test_unknown_company_never_trades() {
    let harness = Harness::ranks();
    let mut strategy = strategy(&harness);

    strategy.evaluate(Some(&openai_on_top(V1)), *NOW).await;

    let mystery = snapshot(
        V1,
        vec![
            Entry::new(1, "anonymous-chatbot-0915", 1500.0),
            Entry::new(2, "gemini-3-pro", 1450.0),
            Entry::new(3, "claude-opus-4-5", 1440.0),
        ],
    );
    let with_unknown = strategy.evaluate(Some(&mystery), *NOW).await;
    assert!(with_unknown.intents.is_empty());

    // The unknown occupant is a baseline, not a loser
    let restored = strategy.evaluate(Some(&openai_on_top(V1)), *NOW).await;
    assert!(restored.intents.is_empty());
    assert!(harness.sink.orders.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_ask_at_ceiling_skips_only_that_leg() {
    let harness = Harness::ranks();
    harness
        .directory
        .set_ask(&token("top-1-dec", "OpenAI", "no"), dec!(0.90));
    let mut strategy = strategy(&harness);

    strategy.evaluate(Some(&openai_on_top(V1)), *NOW).await;
    let evaluation = strategy.evaluate(Some(&google_on_top(V1)), *NOW).await;

    assert_eq!(evaluation.intents.len(), 4);
    assert_eq!(evaluation.executed.len(), 3);
    assert!(!harness
        .sink
        .tokens()
        .contains(&token("top-1-dec", "OpenAI", "no")));
}

#[tokio::test]
async fn test_refused_order_is_not_recorded() {
    let harness = Harness::ranks();
    harness.sink.set_accept(false);
    let mut strategy = strategy(&harness);

    strategy.evaluate(Some(&openai_on_top(V1)), *NOW).await;
    let evaluation = strategy.evaluate(Some(&google_on_top(V1)), *NOW).await;

    assert_eq!(harness.sink.orders.lock().unwrap().len(), 4);
    assert!(evaluation.executed.is_empty());
    assert!(strategy.gate().is_empty());
}

#[tokio::test]
async fn test_invalid_labels_escalate_after_five() {
    let harness = Harness::ranks();
    let mut strategy = strategy(&harness);
    let bad = openai_on_top("not-a-date");

    for _ in 0..4 {
        let evaluation = strategy.evaluate(Some(&bad), *NOW).await;
        assert!(!evaluation.stop);
        assert!(evaluation.intents.is_empty());
    }

    let fifth = strategy.evaluate(Some(&bad), *NOW).await;
    assert!(fifth.stop);
    assert!(harness.notifier.contains("invalid 5 times"));
}

#[tokio::test]
async fn test_valid_label_resets_failure_count() {
    let harness = Harness::ranks();
    let mut strategy = strategy(&harness);
    let bad = openai_on_top("not-a-date");

    for _ in 0..4 {
        assert!(!strategy.evaluate(Some(&bad), *NOW).await.stop);
    }
    assert!(!strategy.evaluate(Some(&openai_on_top(V1)), *NOW).await.stop);
    for _ in 0..4 {
        assert!(!strategy.evaluate(Some(&bad), *NOW).await.stop);
    }
    assert_eq!(strategy.state().validation.consecutive_failures, 4);
}

#[tokio::test]
async fn test_missing_snapshot_is_not_a_failure() {
    let harness = Harness::ranks();
    let mut strategy = strategy(&harness);

    for _ in 0..10 {
        let evaluation = strategy.evaluate(None, *NOW).await;
        assert!(!evaluation.stop);
    }
    assert_eq!(strategy.state().validation.consecutive_failures, 0);
    assert!(!strategy.state().tracker.is_initialized());
}

#[tokio::test]
async fn test_stops_after_last_period() {
    let harness = Harness::ranks();
    let mut strategy = strategy(&harness);
    let later = *PERIOD_END + Duration::minutes(1);

    let evaluation = strategy.evaluate(Some(&openai_on_top(V1)), later).await;

    assert!(evaluation.stop);
    assert!(harness.notifier.contains("All event periods have ended"));
}

#[tokio::test]
async fn test_reset_forgets_state() {
    let harness = Harness::ranks();
    let mut strategy = strategy(&harness);

    strategy.evaluate(Some(&openai_on_top(V1)), *NOW).await;
    strategy.evaluate(Some(&google_on_top(V1)), *NOW).await;
    strategy.reset();

    assert!(strategy.gate().is_empty());
    assert!(!strategy.state().tracker.is_initialized());

    // Next poll bootstraps again instead of trading
    let evaluation = strategy.evaluate(Some(&openai_on_top(V1)), *NOW).await;
    assert!(evaluation.intents.is_empty());
}
