//! Startup wiring: config, credentials, fetcher, and the two run modes.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use twitch_client::api::TwitchApiClient;
use twitch_client::auth::TwitchAuth;

use crate::cli::Cli;
use crate::config::{self, AppConfig};
use crate::credentials::{AppTokenCache, StaticToken, TokenSource};
use crate::fetcher::SnapshotFetcher;
use crate::notification::{DesktopNotifier, Opener};
use crate::scheduler::PollScheduler;
use crate::shutdown;
use crate::snapshot::{LiveStreamRecord, Snapshot};

const APP_NAME: &str = "stream-notifier";

/// Load .env and the runtime config, applying command-line overrides.
pub fn init_foundation(cli: &Cli, data_dir: PathBuf) -> AppConfig {
    config::load_dotenv(&data_dir);
    let mut config = AppConfig::load(data_dir);
    if let Some(secs) = cli.interval {
        config.poll_interval = std::time::Duration::from_secs(secs);
    }
    tracing::info!(
        interval_secs = config.poll_interval.as_secs(),
        data_dir = %config.data_dir.display(),
        "Settings loaded"
    );
    config
}

/// How the process authenticates, decided before any network client exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialPlan {
    UserToken(String),
    AppCredentials {
        client_id: String,
        client_secret: String,
    },
}

impl CredentialPlan {
    pub fn resolve(cli: &Cli, config: &AppConfig) -> anyhow::Result<Self> {
        if let Some(token) = cli.credential.as_deref().filter(|t| !t.is_empty()) {
            let token = token.strip_prefix("oauth:").unwrap_or(token);
            return Ok(Self::UserToken(token.to_string()));
        }
        if config.client_secret.is_empty() {
            anyhow::bail!(
                "no access token given and CLIENT_SECRET is not set; \
                 pass a user access token or configure app credentials"
            );
        }
        Ok(Self::AppCredentials {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
    }

    fn into_token_source(self) -> Arc<dyn TokenSource> {
        match self {
            Self::UserToken(token) => Arc::new(StaticToken::new(token)),
            Self::AppCredentials {
                client_id,
                client_secret,
            } => Arc::new(AppTokenCache::new(TwitchAuth::new(client_id, client_secret))),
        }
    }
}

/// Build the Helix-backed fetcher for `handle`.
pub fn build_fetcher(
    handle: &str,
    plan: CredentialPlan,
    config: &AppConfig,
) -> anyhow::Result<SnapshotFetcher<TwitchApiClient>> {
    let api = TwitchApiClient::with_timeout(config.client_id.clone(), config.http_timeout)
        .context("failed to build HTTP client")?;
    Ok(SnapshotFetcher::new(handle, api, plan.into_token_source()))
}

/// `name / game / status / url`
pub fn format_record(record: &LiveStreamRecord) -> String {
    format!(
        "{} / {} / {} / {}",
        record.display_name,
        record.game.as_deref().unwrap_or("unknown game"),
        record.title.as_deref().unwrap_or(""),
        record.channel_url()
    )
}

pub fn render_snapshot(snapshot: &Snapshot, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(snapshot)?);
    }
    Ok(snapshot
        .iter()
        .map(format_record)
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Fetch once and print the live follows to stdout.
pub async fn run_once(fetcher: &SnapshotFetcher<TwitchApiClient>, json: bool) -> anyhow::Result<()> {
    let snapshot = fetcher
        .fetch_live_follows()
        .await
        .context("failed to get the list of live follows")?;
    let out = render_snapshot(&snapshot, json)?;
    if !out.is_empty() {
        println!("{out}");
    }
    Ok(())
}

/// Poll until SIGINT/SIGTERM, notifying about channels that go live.
pub async fn run_poll_loop(
    fetcher: SnapshotFetcher<TwitchApiClient>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    tracing::info!(handle = fetcher.handle(), "Watching followed channels");

    let notifier = DesktopNotifier::new(
        APP_NAME,
        config.notification_timeout_ms,
        Opener::new(config.opener.clone()),
    );
    let scheduler = PollScheduler::new(Arc::new(fetcher), Arc::new(notifier), config.poll_interval)
        .with_first_poll_policy(config.first_poll_policy());

    let cancel = CancellationToken::new();
    let signals = tokio::spawn(shutdown::listen_for_shutdown(cancel.clone()));

    scheduler.run(cancel.clone()).await;

    cancel.cancel();
    let _ = signals.await;
    tracing::info!("Shutdown sequence completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::snapshot::record;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    fn config(secret: &str) -> AppConfig {
        AppConfig {
            client_secret: secret.into(),
            data_dir: PathBuf::from("/tmp/sn"),
            ..AppConfig::default()
        }
    }

    #[test]
    fn command_line_token_wins() {
        let plan = CredentialPlan::resolve(&cli(&["sn", "viewer", "oauth:abc"]), &config("s")).unwrap();
        assert_eq!(plan, CredentialPlan::UserToken("abc".into()));
    }

    #[test]
    fn app_credentials_need_a_secret() {
        assert!(CredentialPlan::resolve(&cli(&["sn", "viewer"]), &config("")).is_err());

        let plan = CredentialPlan::resolve(&cli(&["sn", "viewer"]), &config("s")).unwrap();
        assert!(matches!(plan, CredentialPlan::AppCredentials { ref client_secret, .. } if client_secret == "s"));
    }

    #[test]
    fn records_print_as_slash_separated_line() {
        let mut rec = record("1", "Alice");
        rec.game = Some("Chess".into());
        rec.title = Some("blitz & chill".into());

        assert_eq!(
            format_record(&rec),
            "Alice / Chess / blitz & chill / https://twitch.tv/alice"
        );
        assert_eq!(
            format_record(&record("2", "Bob")),
            "Bob / unknown game /  / https://twitch.tv/bob"
        );
    }

    #[test]
    fn json_output_lists_records() {
        let snap = Snapshot::new([record("1", "Alice")]);
        let out = render_snapshot(&snap, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value[0]["id"], "1");
        assert_eq!(value[0]["login"], "alice");
        assert!(value[0]["game"].is_null());
    }

    #[test]
    fn empty_snapshot_prints_nothing() {
        assert_eq!(render_snapshot(&Snapshot::default(), false).unwrap(), "");
    }
}
