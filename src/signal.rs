//! OS signal handling.

use tracing::{info, warn};

/// Resolve on the first SIGTERM or SIGINT.
#[cfg(unix)]
pub(crate) async fn wait_for_shutdown() {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut sigterm, mut sigint) =
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(term), Ok(int)) => (term, int),
            (Err(e), _) | (_, Err(e)) => {
                warn!("Failed to install signal handlers, falling back to Ctrl+C: {}", e);
                return ctrl_c().await;
            }
        };

    tokio::select! {
        _ = sigterm.recv() => info!("Received SIGTERM"),
        _ = sigint.recv() => info!("Received SIGINT"),
    }
}

#[cfg(not(unix))]
pub(crate) async fn wait_for_shutdown() {
    ctrl_c().await
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C"),
        Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
    }
}
