//! Common types, traits, and utilities shared across the bot

pub mod errors;
pub mod traits;
pub mod types;
