use std::process::ExitCode;

use anyhow::Context;

use stream_notifier_lib::bootstrap::{self, CredentialPlan};
use stream_notifier_lib::cli::{Cli, Mode};
use stream_notifier_lib::config::{self, AppConfig};
use stream_notifier_lib::{daemon, logging};

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    let mode = cli.mode();
    match run(cli, mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // The stderr subscriber would print the same line twice.
            if !mode.logs_to_stderr() {
                tracing::error!("{e:#}");
            }
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, mode: Mode) -> anyhow::Result<()> {
    let data_dir = config::data_dir();

    // Step 1: Tracing
    match mode {
        Mode::Daemon => {
            let path = AppConfig::log_file_in(&data_dir);
            logging::init_file(&path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
        }
        Mode::Foreground => logging::init_stderr(true),
        Mode::OneShot => logging::init_stderr(false),
    }

    // Step 2: Config + credentials (errors still reach the terminal)
    let config = bootstrap::init_foundation(&cli, data_dir);
    let plan = CredentialPlan::resolve(&cli, &config)?;

    // Step 3: Detach before any threads exist
    if mode == Mode::Daemon {
        daemon::daemonize().context("failed to detach from terminal")?;
    }

    // Step 4: Runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(async {
        let fetcher = bootstrap::build_fetcher(&cli.handle, plan, &config)?;
        match mode {
            Mode::OneShot => bootstrap::run_once(&fetcher, cli.json).await,
            Mode::Foreground | Mode::Daemon => bootstrap::run_poll_loop(fetcher, &config).await,
        }
    })
}
