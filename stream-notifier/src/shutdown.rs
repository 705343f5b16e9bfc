//! Signal-driven shutdown.
//!
//! SIGINT and SIGTERM cancel a [`CancellationToken`]; the poll loop checks it
//! between cycles, so an in-flight fetch always finishes first.

use std::future::Future;

use tokio::signal::unix::{SignalKind, signal};
use tokio_util::sync::CancellationToken;

/// Cancel `token` on the first SIGINT or SIGTERM.
pub async fn listen_for_shutdown(token: CancellationToken) {
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to install SIGTERM handler: {e}");
            cancel_on(
                async {
                    let _ = tokio::signal::ctrl_c().await;
                    "SIGINT"
                },
                token,
            )
            .await;
            return;
        }
    };
    let mut sigint = match signal(SignalKind::interrupt()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to install SIGINT handler: {e}");
            cancel_on(
                async {
                    sigterm.recv().await;
                    "SIGTERM"
                },
                token,
            )
            .await;
            return;
        }
    };

    cancel_on(
        async {
            tokio::select! {
                _ = sigterm.recv() => "SIGTERM",
                _ = sigint.recv() => "SIGINT",
            }
        },
        token,
    )
    .await;
}

async fn cancel_on(received: impl Future<Output = &'static str>, token: CancellationToken) {
    tokio::select! {
        name = received => {
            tracing::info!(signal = name, "Shutdown requested, finishing current cycle");
            token.cancel();
        }
        _ = token.cancelled() => {}
    }
}
