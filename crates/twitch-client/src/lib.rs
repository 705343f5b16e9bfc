//! Twitch Helix client library.
//!
//! Provides the app access token exchange and the read-only REST
//! endpoints needed to find which followed channels are live.

pub mod api;
pub mod auth;

use serde::{Deserialize, Serialize};

/// Bearer token presented to the Helix API.
///
/// App access tokens carry no refresh token; `refresh_token` is empty for them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub scope: String,
    pub expires_at: i64,
}

impl Token {
    /// Wrap a user access token supplied out of band (no known expiry).
    pub fn from_access_token(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: String::new(),
            scope: String::new(),
            expires_at: i64::MAX,
        }
    }
}

/// Unified error type for the twitch-client crate.
#[derive(Debug, thiserror::Error)]
pub enum TwitchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Token request failed: {0}")]
    TokenRequestFailed(String),

    #[error("Twitch API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl TwitchError {
    /// True when the API rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, TwitchError::ApiError { status: 401, .. })
    }
}
