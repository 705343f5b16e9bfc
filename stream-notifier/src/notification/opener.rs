//! Launches the channel page when a notification action is invoked.

use std::io;
use std::process::{Command, ExitStatus, Stdio};

use url::Url;

const CHANNEL_BASE: &str = "https://www.twitch.tv/";

/// `https://www.twitch.tv/<login>`, with the login percent-encoded as one path segment.
pub fn channel_page_url(login: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(CHANNEL_BASE)?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .clear()
        .push(login);
    Ok(url)
}

/// External program that opens URLs, run directly with the URL as its only argument.
#[derive(Debug, Clone)]
pub struct Opener {
    program: String,
}

impl Opener {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, url: &Url) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(url.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }

    /// Run the opener and wait for it to exit.
    pub fn open(&self, url: &Url) -> io::Result<ExitStatus> {
        tracing::debug!(program = %self.program, %url, "Opening channel page");
        self.command(url).status()
    }
}
