//! Snapshot fetcher: handle -> user id -> follow list -> live streams.
//!
//! The three Helix round-trips run sequentially and either all succeed or
//! produce no snapshot at all.

#[cfg(test)]
mod tests;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use twitch_client::api::{
    FOLLOWED_PAGE_SIZE, FollowedChannel, MAX_STREAM_IDS_PER_REQUEST, StreamInfo, TwitchApiClient,
    TwitchUser,
};
use twitch_client::{Token, TwitchError};

use crate::credentials::{CredentialError, TokenSource};
use crate::snapshot::{LiveStreamRecord, Snapshot};

/// Upper bound on follow-list pages walked in one fetch.
pub const MAX_FOLLOW_PAGES: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("transport failure: {0}")]
    Transport(#[source] TwitchError),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("follow list did not end after {0} pages")]
    PaginationRunaway(usize),
}

impl From<TwitchError> for FetchError {
    fn from(err: TwitchError) -> Self {
        if err.is_unauthorized() {
            FetchError::Auth(err.to_string())
        } else {
            FetchError::Transport(err)
        }
    }
}

impl From<CredentialError> for FetchError {
    fn from(err: CredentialError) -> Self {
        FetchError::Auth(err.to_string())
    }
}

/// The Helix calls the fetcher depends on.
#[async_trait]
pub trait FollowsApi: Send + Sync {
    async fn user_by_login(
        &self,
        token: &Token,
        login: &str,
    ) -> Result<Option<TwitchUser>, TwitchError>;

    async fn followed_channels_page(
        &self,
        token: &Token,
        user_id: &str,
        after: Option<&str>,
    ) -> Result<(Vec<FollowedChannel>, Option<String>), TwitchError>;

    /// Live streams among `user_ids` (at most [`MAX_STREAM_IDS_PER_REQUEST`]).
    async fn live_streams(
        &self,
        token: &Token,
        user_ids: &[String],
    ) -> Result<Vec<StreamInfo>, TwitchError>;
}

#[async_trait]
impl FollowsApi for TwitchApiClient {
    async fn user_by_login(
        &self,
        token: &Token,
        login: &str,
    ) -> Result<Option<TwitchUser>, TwitchError> {
        self.find_user_by_login(token, login).await
    }

    async fn followed_channels_page(
        &self,
        token: &Token,
        user_id: &str,
        after: Option<&str>,
    ) -> Result<(Vec<FollowedChannel>, Option<String>), TwitchError> {
        self.get_followed_channels_page(token, user_id, FOLLOWED_PAGE_SIZE, after)
            .await
    }

    async fn live_streams(
        &self,
        token: &Token,
        user_ids: &[String],
    ) -> Result<Vec<StreamInfo>, TwitchError> {
        self.get_streams_by_user_ids(token, user_ids).await
    }
}

/// Anything that can produce the current live snapshot.
#[async_trait]
pub trait LiveSource: Send + Sync {
    async fn fetch(&self) -> Result<Snapshot, FetchError>;
}

/// Fetches which of a user's followed channels are live.
pub struct SnapshotFetcher<A> {
    handle: String,
    api: A,
    tokens: Arc<dyn TokenSource>,
}

impl<A: FollowsApi> SnapshotFetcher<A> {
    pub fn new(handle: impl Into<String>, api: A, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            handle: handle.into(),
            api,
            tokens,
        }
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }

    /// Resolve the handle, walk the full follow list and collect who is live.
    pub async fn fetch_live_follows(&self) -> Result<Snapshot, FetchError> {
        let token = self.tokens.token().await?;

        let user = self
            .api
            .user_by_login(&token, &self.handle)
            .await?
            .ok_or_else(|| FetchError::UserNotFound(self.handle.clone()))?;
        tracing::debug!(login = %user.login, user_id = %user.id, "Resolved handle");

        let follows = self.all_follows(&token, &user.id).await?;
        let broadcaster_ids = unique_broadcaster_ids(&follows);

        let mut live: HashMap<String, StreamInfo> = HashMap::new();
        for chunk in broadcaster_ids.chunks(MAX_STREAM_IDS_PER_REQUEST) {
            let streams = self.api.live_streams(&token, chunk).await?;
            for stream in streams {
                live.entry(stream.user_id.clone()).or_insert(stream);
            }
        }

        let snapshot = Snapshot::new(
            broadcaster_ids
                .iter()
                .filter_map(|id| live.remove(id))
                .map(LiveStreamRecord::from),
        );
        tracing::debug!(
            follows = broadcaster_ids.len(),
            live = snapshot.len(),
            "Fetched live follows"
        );
        Ok(snapshot)
    }

    async fn all_follows(
        &self,
        token: &Token,
        user_id: &str,
    ) -> Result<Vec<FollowedChannel>, FetchError> {
        let mut followed: Vec<FollowedChannel> = Vec::new();
        let mut after: Option<String> = None;
        for _ in 0..MAX_FOLLOW_PAGES {
            let (mut page_rows, next_cursor) = self
                .api
                .followed_channels_page(token, user_id, after.as_deref())
                .await?;
            followed.append(&mut page_rows);
            let Some(cursor) = next_cursor.filter(|cursor| !cursor.is_empty()) else {
                return Ok(followed);
            };
            after = Some(cursor);
        }
        Err(FetchError::PaginationRunaway(MAX_FOLLOW_PAGES))
    }
}

#[async_trait]
impl<A: FollowsApi> LiveSource for SnapshotFetcher<A> {
    async fn fetch(&self) -> Result<Snapshot, FetchError> {
        self.fetch_live_follows().await
    }
}

fn unique_broadcaster_ids(follows: &[FollowedChannel]) -> Vec<String> {
    let mut seen = HashSet::new();
    follows
        .iter()
        .filter(|f| seen.insert(f.broadcaster_id.as_str()))
        .map(|f| f.broadcaster_id.clone())
        .collect()
}
