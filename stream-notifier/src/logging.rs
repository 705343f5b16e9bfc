//! Tracing subscriber setup for foreground and detached runs.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "stream-notifier.log";

fn env_filter(verbose: bool) -> EnvFilter {
    let default = if verbose {
        "stream_notifier_lib=debug,stream_notifier=debug,twitch_client=debug"
    } else {
        "stream_notifier_lib=info,stream_notifier=info,twitch_client=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to stderr.
pub fn init_stderr(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(io::stderr)
        .init();
}

/// Log to an append-only file; used once stdio is detached.
pub fn init_file(path: &Path) -> io::Result<()> {
    let file = open_log_file(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(false))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
