//! Desktop notifications for channels that went live.
//!
//! [`StreamNotification`] is rendered from a live record; a [`Notifier`]
//! displays it. The desktop implementation attaches an "Open" action that
//! launches the channel page.

pub mod desktop;
pub mod escape;
pub mod opener;

use async_trait::async_trait;
use url::Url;

pub use desktop::DesktopNotifier;
pub use escape::html_escape;
pub use opener::{Opener, channel_page_url};

use crate::snapshot::LiveStreamRecord;

pub const ACTION_LABEL: &str = "Open";
const UNKNOWN_GAME: &str = "unknown game";

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("failed to show notification: {0}")]
    Show(String),

    #[error("invalid channel URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Clickable action carried by a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAction {
    pub label: String,
    pub url: Url,
}

/// A rendered notification: plain title, body with `<b>` markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamNotification {
    pub title: String,
    pub body: String,
    pub action: Option<NotificationAction>,
}

impl StreamNotification {
    /// Render the "is online" notification for a newly-live channel.
    pub fn stream_online(record: &LiveStreamRecord) -> Result<Self, NotifyError> {
        let game = record
            .game
            .as_deref()
            .map(html_escape)
            .unwrap_or_else(|| UNKNOWN_GAME.to_string());
        let status = record.title.as_deref().map(html_escape).unwrap_or_default();

        Ok(Self {
            title: format!("{} is online", record.display_name),
            body: format!(
                "<b>{}</b> is online playing <b>{game}</b> with status:\n\n<b>{status}</b>",
                record.display_name
            ),
            action: Some(NotificationAction {
                label: ACTION_LABEL.to_string(),
                url: channel_page_url(&record.login)?,
            }),
        })
    }
}

/// Displays notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn show(&self, notification: &StreamNotification) -> Result<(), NotifyError>;
}
