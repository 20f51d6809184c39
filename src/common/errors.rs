//! Error types for the application

use thiserror::Error;

/// Result type alias using our BotError
pub type Result<T> = std::result::Result<T, BotError>;

/// Main error type for collaborator operations
///
/// Only adapters (REST, relay, Telegram, snapshot source) produce these.
/// The decision engine consumes the adapters through traits that map
/// every error to `None`/`false`.
#[derive(Error, Debug)]
pub enum BotError {
    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limit exceeded: {message}, retry after {retry_after_seconds:?} seconds")]
    RateLimit {
        message: String,
        retry_after_seconds: Option<u64>,
    },

    /// Invalid API response
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Event slug did not resolve
    #[error("Event not found: {0}")]
    EventNotFound(String),

    /// Order was refused by the relay or exchange
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    /// Notification delivery errors
    #[error("Notification error: {0}")]
    Notification(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<url::ParseError> for BotError {
    fn from(err: url::ParseError) -> Self {
        BotError::Configuration(format!("invalid URL: {}", err))
    }
}
