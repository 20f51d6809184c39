//! L2 request signing for the Polymarket order relay

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE},
    Engine,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::common::errors::{BotError, Result};
use crate::config::types::ApiCredentials;

type HmacSha256 = Hmac<Sha256>;

/// Sign `timestamp + METHOD + path + body` with the API secret
///
/// CLOB secrets are issued URL-safe base64 encoded; standard base64 is
/// accepted too. The signature is returned URL-safe encoded.
pub fn sign_request(
    secret: &str,
    timestamp: i64,
    method: &str,
    request_path: &str,
    body: &str,
) -> Result<String> {
    let secret_bytes = URL_SAFE
        .decode(secret)
        .or_else(|_| STANDARD.decode(secret))
        .map_err(|e| BotError::Authentication(format!("Failed to decode secret: {}", e)))?;

    let message = format!("{}{}{}{}", timestamp, method.to_uppercase(), request_path, body);

    let mut mac = HmacSha256::new_from_slice(&secret_bytes)
        .map_err(|e| BotError::Authentication(format!("Failed to create HMAC: {}", e)))?;
    mac.update(message.as_bytes());

    Ok(URL_SAFE.encode(mac.finalize().into_bytes()))
}

/// Headers attached to every authenticated relay call
#[derive(Debug, Clone)]
pub struct AuthHeaders {
    pub api_key: String,
    pub signature: String,
    pub timestamp: i64,
    pub passphrase: String,
}

impl AuthHeaders {
    /// Sign a request for `credentials` at the current time
    pub fn generate(
        credentials: &ApiCredentials,
        method: &str,
        request_path: &str,
        body: &str,
    ) -> Result<Self> {
        Self::generate_at(
            credentials,
            chrono::Utc::now().timestamp(),
            method,
            request_path,
            body,
        )
    }

    pub fn generate_at(
        credentials: &ApiCredentials,
        timestamp: i64,
        method: &str,
        request_path: &str,
        body: &str,
    ) -> Result<Self> {
        let signature = sign_request(
            &credentials.api_secret,
            timestamp,
            method,
            request_path,
            body,
        )?;

        Ok(Self {
            api_key: credentials.api_key.clone(),
            signature,
            timestamp,
            passphrase: credentials.passphrase.clone(),
        })
    }

    pub fn apply_to_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("POLY_API_KEY", &self.api_key)
            .header("POLY_SIGNATURE", &self.signature)
            .header("POLY_TIMESTAMP", self.timestamp.to_string())
            .header("POLY_PASSPHRASE", &self.passphrase)
    }
}
