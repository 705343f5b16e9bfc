//! Command-line interface.

use std::ffi::OsString;

use clap::Parser;

use crate::config::validation::validate_handle;

/// Desktop notifications when channels you follow on Twitch go live.
#[derive(Debug, Parser)]
#[command(name = "stream-notifier", version)]
pub struct Cli {
    /// Twitch login whose followed channels are watched.
    #[arg(value_parser = parse_handle)]
    pub handle: String,

    /// User access token with the user:read:follows scope.
    ///
    /// When omitted, an app token is requested with CLIENT_ID and
    /// CLIENT_SECRET. Twitch only lists followed channels for user tokens,
    /// so that mode fails with an authentication error.
    pub credential: Option<String>,

    /// Print the followed channels that are live right now and exit.
    #[arg(long)]
    pub now: bool,

    /// Run the poll loop in the foreground instead of detaching.
    #[arg(long)]
    pub debug: bool,

    /// With --now, print the live channels as JSON.
    #[arg(long, requires = "now")]
    pub json: bool,

    /// Seconds between polls (overrides POLL_INTERVAL_SECS).
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(10..=86_400))]
    pub interval: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Fetch once, print, exit.
    OneShot,
    /// Poll loop attached to the terminal.
    Foreground,
    /// Poll loop detached from the terminal.
    Daemon,
}

impl Cli {
    /// Parse the process arguments, accepting `-now`/`-debug` as well as `--now`/`--debug`.
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    pub fn mode(&self) -> Mode {
        if self.now {
            Mode::OneShot
        } else if self.debug {
            Mode::Foreground
        } else {
            Mode::Daemon
        }
    }
}

impl Mode {
    /// Whether tracing output goes to the terminal's stderr in this mode.
    pub fn logs_to_stderr(self) -> bool {
        !matches!(self, Mode::Daemon)
    }
}

fn parse_handle(value: &str) -> Result<String, String> {
    validate_handle(value)?;
    Ok(value.to_string())
}

/// Rewrite single-dash long flags into the `--flag` form clap understands.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| match arg.to_str() {
            Some("-now") => OsString::from("--now"),
            Some("-debug") => OsString::from("--debug"),
            Some("-json") => OsString::from("--json"),
            _ => arg,
        })
        .collect()
}
