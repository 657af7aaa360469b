use crate::cosmic::CosmicHandle;
use tracing::{error, info};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
#[cfg(windows)]
use tokio::signal::windows::{ctrl_break, ctrl_c};

/// Wait for a termination signal, then stop the Cosmic actor.
///
/// Meant to be passed to `with_graceful_shutdown`: the server stops accepting
/// connections once this future resolves.
pub async fn handle_signals(store: CosmicHandle) {
    // Wait for a termination signal
    wait_for_signal().await;

    // Shut down the Cosmic actor
    if let Err(e) = store.shutdown().await {
        error!("Error shutting down Cosmic actor: {:?}", e);
    } else {
        info!("Cosmic actor shut down successfully");
    }
}

/// Fallback when the platform handlers cannot be installed
async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        // Without any signal source, keep serving until the process is killed
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, initiating graceful shutdown");
}

/// Platform-specific signal handling implementation
#[cfg(unix)]
async fn wait_for_signal() {
    // SIGTERM is what container runtimes send on stop
    let sigterm = signal(SignalKind::terminate());
    let sigint = signal(SignalKind::interrupt());

    let (mut sigterm, mut sigint) = match (sigterm, sigint) {
        (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
        (Err(e), _) | (_, Err(e)) => {
            error!("Failed to create signal handlers: {}", e);
            return wait_for_ctrl_c().await;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => {
            info!("Received SIGTERM signal, initiating graceful shutdown");
        }
        _ = sigint.recv() => {
            info!("Received SIGINT signal, initiating graceful shutdown");
        }
    }
}

/// Platform-specific signal handling implementation
#[cfg(windows)]
async fn wait_for_signal() {
    let (mut ctrlc, mut ctrlbreak) = match (ctrl_c(), ctrl_break()) {
        (Ok(ctrlc), Ok(ctrlbreak)) => (ctrlc, ctrlbreak),
        (Err(e), _) | (_, Err(e)) => {
            error!("Failed to create signal handlers: {}", e);
            return wait_for_ctrl_c().await;
        }
    };

    tokio::select! {
        _ = ctrlc.recv() => {
            info!("Received Ctrl+C signal, initiating graceful shutdown");
        }
        _ = ctrlbreak.recv() => {
            info!("Received Ctrl+Break signal, initiating graceful shutdown");
        }
    }
}

#[cfg(not(any(unix, windows)))]
async fn wait_for_signal() {
    wait_for_ctrl_c().await;
}
