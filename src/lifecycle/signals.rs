//! OS signal handling.

use crate::lifecycle::Shutdown;

/// Trigger the shutdown coordinator when Ctrl+C arrives.
pub fn listen_for_ctrl_c(shutdown: &Shutdown) {
    let shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            shutdown.trigger();
        }
    });
}
