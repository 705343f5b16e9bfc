//! Runtime application configuration loaded from the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::diff::FirstPollPolicy;

use super::validation::validate_setting;

/// App ID registered in the Twitch developer console.
pub const DEFAULT_CLIENT_ID: &str = "454q3qk5jh0rzgps78fnxrwc5u1i8t";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 120;
pub const DEFAULT_NOTIFICATION_TIMEOUT_MS: u32 = 15_000;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_OPENER: &str = "xdg-open";

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client_id: String,
    pub client_secret: String,
    pub poll_interval: Duration,
    pub notification_timeout_ms: u32,
    pub notify_on_start: bool,
    pub opener: String,
    pub http_timeout: Duration,
    pub data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID.into(),
            client_secret: String::new(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            notification_timeout_ms: DEFAULT_NOTIFICATION_TIMEOUT_MS,
            notify_on_start: false,
            opener: DEFAULT_OPENER.into(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            data_dir: super::data_dir(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load(data_dir: PathBuf) -> Self {
        Self::from_lookup(data_dir, |key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup. Invalid values fall back to defaults.
    pub fn from_lookup(data_dir: PathBuf, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let g = |key: &str| -> Option<String> {
            let value = lookup(key)?;
            let value = value.trim().to_string();
            if value.is_empty() {
                return None;
            }
            match validate_setting(key, &value) {
                Ok(()) => Some(value),
                Err(e) => {
                    tracing::warn!("Ignoring invalid {key}={value:?}: {e}");
                    None
                }
            }
        };

        let defaults = Self {
            data_dir,
            ..Self::default()
        };

        Self {
            client_id: g("CLIENT_ID").unwrap_or(defaults.client_id),
            client_secret: g("CLIENT_SECRET").unwrap_or(defaults.client_secret),
            poll_interval: g("POLL_INTERVAL_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            notification_timeout_ms: g("NOTIFICATION_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.notification_timeout_ms),
            notify_on_start: g("NOTIFY_ON_START")
                .map(|v| v == "true")
                .unwrap_or(defaults.notify_on_start),
            opener: g("OPENER").unwrap_or(defaults.opener),
            http_timeout: g("HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            data_dir: defaults.data_dir,
        }
    }

    pub fn first_poll_policy(&self) -> FirstPollPolicy {
        if self.notify_on_start {
            FirstPollPolicy::AnnounceAll
        } else {
            FirstPollPolicy::Suppress
        }
    }

    /// Log file location for `data_dir`, usable before the config is loaded.
    pub fn log_file_in(data_dir: &Path) -> PathBuf {
        data_dir.join(crate::logging::LOG_FILE_NAME)
    }
}
