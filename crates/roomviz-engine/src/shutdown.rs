// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signal handling for interactive runs.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Returns a token cancelled on SIGINT (Ctrl+C) or SIGTERM.
///
/// Must be called from within a tokio runtime.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => info!("received SIGINT, stopping"),
                        _ = sigterm.recv() => info!("received SIGTERM, stopping"),
                        _ = trigger.cancelled() => return,
                    }
                }
                Err(e) => {
                    warn!(error = %e, "SIGTERM handler unavailable, listening for Ctrl+C only");
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => info!("received SIGINT, stopping"),
                        _ = trigger.cancelled() => return,
                    }
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => info!("received Ctrl+C, stopping"),
                _ = trigger.cancelled() => return,
            }
        }

        trigger.cancel();
        debug!("signal handler completed");
    });

    token
}
