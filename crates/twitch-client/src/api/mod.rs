//! Twitch Helix REST API client.
//!
//! Provides typed access to the user, follow and stream endpoints
//! with automatic Bearer token + Client-ID header injection.

mod channels;
mod request;
mod streams;
mod users;

pub mod models;

use std::time::Duration;

pub use channels::FOLLOWED_PAGE_SIZE;
pub use models::{
    FollowedChannel, HelixPaginatedResponse, HelixPagination, HelixResponse, StreamInfo,
    TwitchUser,
};
pub use streams::MAX_STREAM_IDS_PER_REQUEST;

use crate::{Token, TwitchError};

const HELIX_BASE: &str = "https://api.twitch.tv/helix";

/// Twitch Helix API client with automatic auth header injection.
pub struct TwitchApiClient {
    pub(super) http: reqwest::Client,
    pub(super) client_id: String,
    pub(super) base_url: String,
}
