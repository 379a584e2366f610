// Signal handling module
//
// Supported signals:
// - SIGTERM: Stop the server
// - SIGINT:  Stop the server (Ctrl+C)

use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Start signal handlers (Unix only)
///
/// Spawns a background task that notifies `shutdown` once, on the first
/// SIGINT or SIGTERM.
#[cfg(unix)]
pub fn start_signal_handler(shutdown: Arc<Notify>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => logger::log_signal("SIGTERM received"),
            _ = sigint.recv() => logger::log_signal("SIGINT received (Ctrl+C)"),
        }
        shutdown.notify_one();
    });

    Ok(())
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(shutdown: Arc<Notify>) -> std::io::Result<()> {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_signal("Ctrl+C received");
            shutdown.notify_one();
        }
    });

    Ok(())
}
