//! Polymarket adapters: Gamma event lookup, CLOB order books, order placement

pub mod auth;
pub mod executor;
pub mod messages;
pub mod rest;

pub use executor::{DryRunOrderSink, RelayOrderSink};
pub use rest::PolymarketRestClient;
