//! Live channel records and the snapshots they are grouped into.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use twitch_client::api::StreamInfo;

/// Stable identity of a channel. Exact-match equality, used as the diff key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One followed channel that is broadcasting right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveStreamRecord {
    pub id: ChannelId,
    pub display_name: String,
    pub login: String,
    /// Current game or category, if the broadcaster set one.
    pub game: Option<String>,
    /// Free-text stream title. Untrusted; escape before embedding in markup.
    pub title: Option<String>,
    pub started_at: Option<String>,
    pub viewer_count: u64,
}

impl LiveStreamRecord {
    /// Channel page for this broadcaster.
    pub fn channel_url(&self) -> String {
        format!("https://twitch.tv/{}", self.login)
    }
}

impl From<StreamInfo> for LiveStreamRecord {
    fn from(info: StreamInfo) -> Self {
        let display_name = if info.user_name.is_empty() {
            info.user_login.clone()
        } else {
            info.user_name
        };
        Self {
            id: ChannelId::new(info.user_id),
            display_name,
            login: info.user_login,
            game: non_empty(info.game_name),
            title: non_empty(info.title),
            started_at: info.started_at,
            viewer_count: info.viewer_count,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Every followed channel observed live by one fetch cycle.
///
/// Identities are unique; the record order is the order the fetcher produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    records: Vec<LiveStreamRecord>,
}

impl Snapshot {
    /// Build a snapshot, keeping the first record seen for each identity.
    pub fn new(records: impl IntoIterator<Item = LiveStreamRecord>) -> Self {
        let mut seen = HashSet::new();
        let records = records
            .into_iter()
            .filter(|record| {
                let fresh = seen.insert(record.id.clone());
                if !fresh {
                    tracing::debug!(id = %record.id, "Dropping duplicate live record");
                }
                fresh
            })
            .collect();
        Self { records }
    }

    pub fn records(&self) -> &[LiveStreamRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LiveStreamRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a LiveStreamRecord;
    type IntoIter = std::slice::Iter<'a, LiveStreamRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
pub(crate) fn record(id: &str, name: &str) -> LiveStreamRecord {
    LiveStreamRecord {
        id: ChannelId::new(id),
        display_name: name.to_string(),
        login: name.to_lowercase(),
        game: None,
        title: None,
        started_at: None,
        viewer_count: 0,
    }
}
