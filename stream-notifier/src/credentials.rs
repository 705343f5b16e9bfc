//! Bearer token sources injected into the snapshot fetcher.
//!
//! `AppTokenCache` fetches an app access token on first use and keeps it for
//! the rest of the process. There is no refresh on expiry; a source that
//! renews tokens can be written against [`TokenSource`] without touching the
//! fetcher.

use async_trait::async_trait;
use tokio::sync::Mutex;
use twitch_client::auth::TwitchAuth;
use twitch_client::{Token, TwitchError};

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("token exchange failed: {0}")]
    Exchange(#[from] TwitchError),
}

/// Anything that can hand out a bearer token for the next request.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn token(&self) -> Result<Token, CredentialError>;
}

/// A user access token passed on the command line.
pub struct StaticToken {
    token: Token,
}

impl StaticToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            token: Token::from_access_token(access_token),
        }
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Result<Token, CredentialError> {
        Ok(self.token.clone())
    }
}

/// Source of freshly minted app tokens.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    async fn exchange(&self) -> Result<Token, TwitchError>;
}

#[async_trait]
impl TokenExchange for TwitchAuth {
    async fn exchange(&self) -> Result<Token, TwitchError> {
        self.app_access_token().await
    }
}

/// Lazily exchanged, process-lifetime app token.
pub struct AppTokenCache<E = TwitchAuth> {
    exchange: E,
    cached: Mutex<Option<Token>>,
}

impl<E: TokenExchange> AppTokenCache<E> {
    pub fn new(exchange: E) -> Self {
        Self {
            exchange,
            cached: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<E: TokenExchange> TokenSource for AppTokenCache<E> {
    async fn token(&self) -> Result<Token, CredentialError> {
        let mut slot = self.cached.lock().await;
        if let Some(token) = slot.as_ref() {
            return Ok(token.clone());
        }

        // A failed exchange leaves the slot empty so the next cycle retries.
        let token = self.exchange.exchange().await?;
        tracing::info!(
            expires_at = ?chrono::DateTime::from_timestamp(token.expires_at, 0),
            "App access token cached for the process lifetime"
        );
        *slot = Some(token.clone());
        Ok(token)
    }
}
