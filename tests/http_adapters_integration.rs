//! Integration tests for the HTTP adapters against a local mock server
//!
//! Covers the Gamma event lookup, the CLOB order book, the order relay,
//! Telegram delivery and the leaderboard snapshot source.

use leaderboard_sniper::common::types::{OrderRequest, OrderType, Side, TimeInForce};
use leaderboard_sniper::config::types::{ApiCredentials, TelegramConfig};
use leaderboard_sniper::{
    BotError, HttpSnapshotSource, LeaderboardSource, MarketDirectory, Notifier,
    PolymarketRestClient, RelayOrderSink, TelegramNotifier,
};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_json, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn order() -> OrderRequest {
    OrderRequest {
        token_id: "tok-yes".to_string(),
        price: dec!(0.9),
        size: dec!(10),
        side: Side::Buy,
        order_type: OrderType::Market,
        time_in_force: Some(TimeInForce::Fak),
    }
}

// ============================================================================
// Gamma / CLOB
// ============================================================================

#[tokio::test]
async fn test_event_lookup_decodes_encoded_lists() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .and(query_param("slug", "which-company-has-best-ai-model-end-of-2025"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "123",
            "title": "Which company has best AI model end of 2025?",
            "slug": "which-company-has-best-ai-model-end-of-2025",
            "markets": [
                {
                    "id": "m1",
                    "question": "Will Google have the best AI model at the end of 2025?",
                    "groupItemTitle": "Google",
                    "outcomes": "[\"Yes\", \"No\"]",
                    "clobTokenIds": "[\"g-yes\", \"g-no\"]"
                },
                {
                    "id": "m2",
                    "question": "Will OpenAI have the best AI model at the end of 2025?",
                    "groupItemTitle": "OpenAI",
                    "outcomes": ["Yes", "No"],
                    "clobTokenIds": ["o-yes", "o-no"]
                }
            ]
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let client = PolymarketRestClient::new(&server.uri(), &server.uri()).unwrap();
    let event = MarketDirectory::get_event_by_slug(&client, "which-company-has-best-ai-model-end-of-2025")
        .await
        .unwrap();

    assert_eq!(event.titles(), vec!["Google", "OpenAI"]);
    assert_eq!(event.find_market("Google").unwrap().token_for_outcome("No"), Some("g-no"));
    assert_eq!(event.find_market("OpenAI").unwrap().token_for_outcome("Yes"), Some("o-yes"));
}

#[tokio::test]
async fn test_unknown_slug_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = PolymarketRestClient::new(&server.uri(), &server.uri()).unwrap();

    assert!(client.get_event_by_slug("missing").await.unwrap().is_none());
    assert!(MarketDirectory::get_event_by_slug(&client, "missing").await.is_none());
}

#[tokio::test]
async fn test_order_book_levels_parse_to_decimal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book"))
        .and(query_param("token_id", "g-yes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "market": "0xcond",
            "asset_id": "g-yes",
            "hash": "0xabc",
            "timestamp": "1733800000000",
            "bids": [{"price": "0.31", "size": "40"}],
            "asks": [
                {"price": "0.99", "size": "1000"},
                {"price": "0.36", "size": "12.5"},
                {"price": "0.37", "size": "80"}
            ]
        })))
        .mount(&server)
        .await;

    let client = PolymarketRestClient::new(&server.uri(), &server.uri()).unwrap();
    let book = MarketDirectory::get_order_book(&client, "g-yes").await.unwrap();

    assert_eq!(book.lowest_ask(), Some(dec!(0.36)));
    assert_eq!(book.bids[0].price, dec!(0.31));
}

#[tokio::test]
async fn test_server_error_surfaces_as_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = PolymarketRestClient::new(&server.uri(), &server.uri()).unwrap();

    assert!(matches!(
        client.get_order_book("x").await,
        Err(BotError::InvalidResponse(_))
    ));
    assert!(MarketDirectory::get_order_book(&client, "x").await.is_none());
}

#[tokio::test]
async fn test_too_many_requests_is_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "7")
                .set_body_string("slow down"),
        )
        .mount(&server)
        .await;

    let client = PolymarketRestClient::new(&server.uri(), &server.uri()).unwrap();

    match client.get_event_by_slug("busy").await {
        Err(BotError::RateLimit {
            message,
            retry_after_seconds,
        }) => {
            assert_eq!(message, "slow down");
            assert_eq!(retry_after_seconds, Some(7));
        }
        other => panic!("expected rate limit, got {:?}", other),
    }
    assert!(MarketDirectory::get_event_by_slug(&client, "busy").await.is_none());
}

// ============================================================================
// Order relay
// ============================================================================

#[test_log::test(tokio::test)]
async fn test_relay_signs_and_accepts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/order"))
        .and(header_exists("POLY_SIGNATURE"))
        .and(header_exists("POLY_TIMESTAMP"))
        .and(body_json(json!({
            "tokenId": "tok-yes",
            "price": "0.9",
            "size": "10",
            "side": "BUY",
            "type": "MARKET",
            "timeInForce": "FAK"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "errorMsg": "",
            "orderID": "0xorder",
            "status": "matched"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sink = RelayOrderSink::new(&format!("{}/order", server.uri()))
        .unwrap()
        .with_credentials(ApiCredentials::new(
            "key".to_string(),
            "c2VjcmV0LXNlY3JldC1zZWNyZXQ=".to_string(),
            "phrase".to_string(),
        ));

    assert_eq!(sink.submit(&order()).await.unwrap().as_deref(), Some("0xorder"));
}

#[tokio::test]
async fn test_relay_error_message_means_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/order"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "errorMsg": "not enough balance / allowance"
        })))
        .mount(&server)
        .await;

    let sink = RelayOrderSink::new(&format!("{}/order", server.uri())).unwrap();

    assert!(matches!(
        sink.submit(&order()).await,
        Err(BotError::OrderRejected(msg)) if msg.contains("balance")
    ));
    assert!(!leaderboard_sniper::OrderSink::execute(&sink, &order()).await);
}

#[tokio::test]
async fn test_relay_forbidden_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/order"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Attention Required! | Cloudflare"))
        .mount(&server)
        .await;

    let sink = RelayOrderSink::new(&format!("{}/order", server.uri())).unwrap();
    assert!(!leaderboard_sniper::OrderSink::execute(&sink, &order()).await);
}

// ============================================================================
// Telegram
// ============================================================================

#[tokio::test]
async fn test_telegram_posts_send_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .and(body_json(json!({"chat_id": "-100200", "text": "Bot started."})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = TelegramConfig::new("123:abc", "-100200");
    config.api_url = server.uri();
    let notifier = TelegramNotifier::new(&config).unwrap();

    notifier.notify("Bot started.").await;
}

#[tokio::test]
async fn test_telegram_failure_is_swallowed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"ok": false})))
        .mount(&server)
        .await;

    let mut config = TelegramConfig::new("bad", "1");
    config.api_url = server.uri();
    let notifier = TelegramNotifier::new(&config).unwrap();

    assert!(matches!(
        notifier.send("hello").await,
        Err(BotError::Notification(_))
    ));
    notifier.notify("hello").await;
}

// ============================================================================
// Snapshot source
// ============================================================================

#[tokio::test]
async fn test_snapshot_source_decodes_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/leaderboard/text"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "Dec 10, 2025",
            "totalVotes": 4_200_000,
            "totalModels": 250,
            "entries": [
                {"rank": 1, "displayName": "gemini-3-pro", "score": 1492.0, "organization": "Google", "votes": 20000},
                {"rank": 2, "displayName": "grok-4.1-thinking", "score": 1478.0},
                {"rank": 3, "displayName": "claude-opus-4-5", "score": 1470.5, "categoryScores": {"coding": 75.2}}
            ]
        })))
        .mount(&server)
        .await;

    let source = HttpSnapshotSource::new(&format!("{}/leaderboard/text", server.uri())).unwrap();
    let snapshot = source.poll().await.unwrap();

    assert_eq!(snapshot.version, "Dec 10, 2025");
    assert_eq!(snapshot.total_models, 250);
    assert_eq!(snapshot.entries.len(), 3);
    assert_eq!(snapshot.entries[2].category_scores.get("coding"), Some(&75.2));
}

#[tokio::test]
async fn test_snapshot_source_failure_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source = HttpSnapshotSource::new(&server.uri()).unwrap();
    assert!(source.poll().await.is_none());
}
