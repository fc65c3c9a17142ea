//! # Shutdown on process termination signals.
//!
//! Provides [`wait_for_shutdown_signal`], an async helper that completes when
//! the process receives a termination signal, and
//! [`SelectCollection::shutdown_on_signal`], which ties that helper to a
//! collection's `shutdown`.
//!
//! ## Signals
//! **Unix platforms:**
//! - `SIGINT` (Ctrl-C in terminal)
//! - `SIGTERM` (default kill signal, used by systemd/Kubernetes)
//! - `SIGQUIT` (quit signal, often used for core dumps or hard stop)
//!
//! **Windows platforms:**
//! - `Ctrl-C` via [`tokio::signal::ctrl_c`]
//!
//! Use [`SignalSelection`](crate::SignalSelection) instead when the signal
//! should reach an `on_select` callback rather than end the loop.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::collection::SelectCollection;

/// Waits for a termination signal.
///
/// Returns `Ok(())` when any signal is received, or `Err` if signal registration fails.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = sigint.recv()  => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

/// Waits for a termination signal.
///
/// Returns `Ok(())` when Ctrl-C is received, or `Err` if signal registration fails.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

impl SelectCollection {
    /// Spawns a task that calls [`shutdown`](Self::shutdown) on the first termination signal.
    ///
    /// The task ends without shutting down if signal registration fails; the
    /// error is logged and returned through the handle.
    pub fn shutdown_on_signal(self: &Arc<Self>) -> JoinHandle<std::io::Result<()>> {
        let collection = Arc::downgrade(self);
        tokio::spawn(async move {
            if let Err(e) = wait_for_shutdown_signal().await {
                tracing::warn!(error = %e, "termination signal listener failed");
                return Err(e);
            }
            tracing::debug!("termination signal received");
            if let Some(collection) = collection.upgrade() {
                collection.shutdown();
            }
            Ok(())
        })
    }
}
