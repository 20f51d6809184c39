//! Common test utilities and fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use leaderboard_sniper::common::types::{EventMarket, MarketEvent, OrderBook, OrderRequest, PriceLevel};
use leaderboard_sniper::leaderboard::{Entry, EventPeriod, EventPeriodSelector, LeaderboardSnapshot};
use leaderboard_sniper::strategy::{TradeSettings, Trader};
use leaderboard_sniper::{LeaderboardSource, MarketDirectory, Notifier, OrderSink};

/// Fixed evaluation time inside every test period
pub static NOW: Lazy<DateTime<Utc>> = Lazy::new(|| Utc.with_ymd_and_hms(2025, 12, 10, 12, 0, 0).unwrap());

/// End of the single test period
pub static PERIOD_END: Lazy<DateTime<Utc>> =
    Lazy::new(|| Utc.with_ymd_and_hms(2025, 12, 31, 17, 0, 0).unwrap());

/// Companies listed in every test event
pub const COMPANIES: [&str; 5] = ["Google", "OpenAI", "Anthropic", "xAI", "DeepSeek"];

/// Slugs of the per-rank markets in the test period
pub const RANK_SLUGS: [&str; 3] = ["top-1-dec", "top-2-dec", "top-3-dec"];

pub fn rank_periods() -> EventPeriodSelector {
    EventPeriodSelector::new(vec![EventPeriod::new(
        "December 2025",
        *PERIOD_END,
        RANK_SLUGS,
    )])
}

pub fn single_market_periods(slug: &str) -> EventPeriodSelector {
    EventPeriodSelector::new(vec![EventPeriod::new("End of 2025", *PERIOD_END, [slug])])
}

/// Token id convention used by the fake directory
pub fn token(slug: &str, title: &str, outcome: &str) -> String {
    format!("{}:{}:{}", slug, title, outcome.to_lowercase())
}

/// Event with one YES/NO market per title
pub fn event(slug: &str, titles: &[&str]) -> MarketEvent {
    MarketEvent {
        id: format!("id-{}", slug),
        slug: slug.to_string(),
        title: slug.to_string(),
        markets: titles
            .iter()
            .map(|title| EventMarket {
                question: format!("Will {} be on top?", title),
                group_item_title: title.to_string(),
                slug: None,
                outcomes: vec!["Yes".to_string(), "No".to_string()],
                clob_token_ids: vec![token(slug, title, "yes"), token(slug, title, "no")],
            })
            .collect(),
    }
}

pub fn book(token_id: &str, asks: &[Decimal]) -> OrderBook {
    OrderBook {
        market_id: "cond".to_string(),
        asset_id: token_id.to_string(),
        bids: vec![PriceLevel::new(dec!(0.01), dec!(100))],
        asks: asks.iter().map(|p| PriceLevel::new(*p, dec!(100))).collect(),
        timestamp: Utc::now(),
    }
}

pub fn snapshot(version: &str, entries: Vec<Entry>) -> LeaderboardSnapshot {
    LeaderboardSnapshot::new(version, entries)
}

/// In-memory event and order-book directory
#[derive(Default)]
pub struct FakeDirectory {
    events: Mutex<HashMap<String, MarketEvent>>,
    books: Mutex<HashMap<String, OrderBook>>,
    pub event_lookups: AtomicUsize,
}

impl FakeDirectory {
    /// Register an event; every token gets a book asking `ask`
    pub fn with_event(self, event: MarketEvent, ask: Decimal) -> Self {
        {
            let mut books = self.books.lock().unwrap();
            for market in &event.markets {
                for token_id in &market.clob_token_ids {
                    books.insert(token_id.clone(), book(token_id, &[ask]));
                }
            }
        }
        self.events.lock().unwrap().insert(event.slug.clone(), event);
        self
    }

    pub fn set_ask(&self, token_id: &str, ask: Decimal) {
        self.books
            .lock()
            .unwrap()
            .insert(token_id.to_string(), book(token_id, &[ask]));
    }
}

#[async_trait]
impl MarketDirectory for FakeDirectory {
    async fn get_event_by_slug(&self, slug: &str) -> Option<MarketEvent> {
        self.event_lookups.fetch_add(1, Ordering::SeqCst);
        self.events.lock().unwrap().get(slug).cloned()
    }

    async fn get_order_book(&self, token_id: &str) -> Option<OrderBook> {
        self.books.lock().unwrap().get(token_id).cloned()
    }
}

/// Order sink that remembers every order it was handed
pub struct RecordingSink {
    pub orders: Mutex<Vec<OrderRequest>>,
    accept: AtomicBool,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self {
            orders: Mutex::new(Vec::new()),
            accept: AtomicBool::new(true),
        }
    }
}

impl RecordingSink {
    pub fn set_accept(&self, accept: bool) {
        self.accept.store(accept, Ordering::SeqCst);
    }

    pub fn tokens(&self) -> Vec<String> {
        self.orders
            .lock()
            .unwrap()
            .iter()
            .map(|o| o.token_id.clone())
            .collect()
    }
}

#[async_trait]
impl OrderSink for RecordingSink {
    async fn execute(&self, order: &OrderRequest) -> bool {
        self.orders.lock().unwrap().push(order.clone());
        self.accept.load(Ordering::SeqCst)
    }
}

/// Notifier that keeps messages for inspection
#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn contains(&self, needle: &str) -> bool {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .any(|m| m.contains(needle))
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Source that replays a fixed script of polls, then reports nothing
#[derive(Default)]
pub struct ScriptedSource {
    polls: Mutex<VecDeque<Option<LeaderboardSnapshot>>>,
}

impl ScriptedSource {
    pub fn new(polls: Vec<Option<LeaderboardSnapshot>>) -> Self {
        Self {
            polls: Mutex::new(polls.into()),
        }
    }
}

#[async_trait]
impl LeaderboardSource for ScriptedSource {
    async fn poll(&self) -> Option<LeaderboardSnapshot> {
        self.polls.lock().unwrap().pop_front().flatten()
    }
}

/// Everything a strategy under test talks to
pub struct Harness {
    pub directory: Arc<FakeDirectory>,
    pub sink: Arc<RecordingSink>,
    pub notifier: Arc<RecordingNotifier>,
    pub trader: Arc<Trader>,
}

impl Harness {
    pub fn new(directory: FakeDirectory) -> Self {
        let directory = Arc::new(directory);
        let sink = Arc::new(RecordingSink::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let trader = Arc::new(Trader::new(
            directory.clone(),
            sink.clone(),
            notifier.clone(),
            TradeSettings::default(),
        ));
        Self {
            directory,
            sink,
            notifier,
            trader,
        }
    }

    /// Directory holding the three rank events at a 0.50 ask
    pub fn ranks() -> Self {
        let directory = RANK_SLUGS
            .iter()
            .fold(FakeDirectory::default(), |dir, slug| {
                dir.with_event(event(slug, &COMPANIES), dec!(0.50))
            });
        Self::new(directory)
    }
}
