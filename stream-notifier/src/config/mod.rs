//! Configuration management: defaults, validation, loading from the environment.

pub mod app_config;
pub mod validation;

use std::path::PathBuf;

pub use app_config::AppConfig;

pub const DATA_DIR_ENV: &str = "STREAM_NOTIFIER_DATA_DIR";

/// Determine the data directory for the application.
/// Priority: STREAM_NOTIFIER_DATA_DIR env var > platform data dir > ./.stream-notifier
pub fn data_dir() -> PathBuf {
    resolve_data_dir(std::env::var(DATA_DIR_ENV).ok())
}

fn resolve_data_dir(override_dir: Option<String>) -> PathBuf {
    if let Some(dir) = override_dir.filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::data_local_dir()
        .map(|d| d.join("stream-notifier"))
        .unwrap_or_else(|| PathBuf::from(".stream-notifier"))
}

/// Load .env from the working directory, then from the data directory.
pub fn load_dotenv(data_dir: &std::path::Path) {
    let candidates = [PathBuf::from(".env"), data_dir.join(".env")];
    for path in &candidates {
        if dotenvy::from_path(path).is_ok() {
            tracing::info!("Loaded .env from: {}", path.display());
            return;
        }
    }
    tracing::debug!("No .env file found, using system environment variables");
}
