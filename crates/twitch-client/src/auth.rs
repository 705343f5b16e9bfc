//! App access token exchange for Twitch authentication.
//!
//! Trades the application's client ID and secret for a bearer token
//! using the OAuth client credentials grant.

use chrono::Utc;
use serde::Deserialize;

use crate::{Token, TwitchError};

const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";

/// Twitch OAuth token response from the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    expires_in: i64,
    #[serde(default)]
    scope: Option<Vec<String>>,
}

/// Twitch OAuth error response.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Exchanges application credentials for app access tokens.
pub struct TwitchAuth {
    client_id: String,
    client_secret: String,
    http: reqwest::Client,
}

impl TwitchAuth {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client_id,
            client_secret,
            http: reqwest::Client::new(),
        }
    }

    /// Request a fresh app access token.
    pub async fn app_access_token(&self) -> Result<Token, TwitchError> {
        tracing::info!("Requesting Twitch app access token");

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let resp = self
            .http
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        parse_token_response(status.as_u16(), &body)
    }
}

/// Parse the token endpoint response into a `Token`.
fn parse_token_response(status: u16, body: &str) -> Result<Token, TwitchError> {
    if !(200..300).contains(&status) {
        let err: ErrorResponse = serde_json::from_str(body).unwrap_or(ErrorResponse {
            status: Some(status),
            message: Some(body.to_string()),
            error: None,
        });
        return Err(TwitchError::TokenRequestFailed(format!(
            "{} {}: {}",
            err.status.unwrap_or(status),
            err.error.unwrap_or_default(),
            err.message.unwrap_or_default()
        )));
    }

    let token_resp: TokenResponse = serde_json::from_str(body)
        .map_err(|e| TwitchError::TokenRequestFailed(format!("failed to parse response: {e}")))?;

    let scope = token_resp.scope.map(|s| s.join(" ")).unwrap_or_default();
    let expires_at = Utc::now().timestamp() + token_resp.expires_in;

    Ok(Token {
        access_token: token_resp.access_token,
        refresh_token: token_resp.refresh_token.unwrap_or_default(),
        scope,
        expires_at,
    })
}
