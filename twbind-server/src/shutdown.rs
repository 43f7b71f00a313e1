//! Signal handling for graceful shutdown and config reload.

use crate::config::ConfigLoader;
use crate::config::runtime::{RuntimeConfig, ServerConfig};
use crate::logging::{LogReloadHandle, reload_filter};
use std::sync::Arc;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::{Notify, watch};

/// Creates a future that completes when a shutdown signal is received.
///
/// Listens for SIGTERM and SIGINT (Ctrl+C).
pub async fn shutdown_signal() {
    let (mut sigterm, mut sigint) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!("Failed to install signal handlers: {}", e);
            // Ctrl+C still works through the portable handler.
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
        _ = sigint.recv() => {
            tracing::info!("Received SIGINT, initiating graceful shutdown");
        }
    }
}

/// Wait for `signal`, then tell every in-flight invocation to wind down.
pub async fn broadcast_shutdown(
    signal: impl Future<Output = ()>,
    shutdown_tx: watch::Sender<bool>,
) {
    signal.await;
    // Receivers may all be gone already; nothing to notify then.
    let _ = shutdown_tx.send(true);
}

/// Spawns a task that listens for SIGHUP and reloads the log filter.
///
/// Only the log filter is applied live. `running` is the server section the
/// listener was started with; changes to it are reported, not applied.
///
/// Returns a Notify that can be used to signal when shutdown is complete.
pub fn spawn_config_reload_handler(
    config_loader: Arc<ConfigLoader>,
    log_handle: LogReloadHandle,
    running: ServerConfig,
) -> Arc<Notify> {
    let shutdown_notify = Arc::new(Notify::new());
    let shutdown_notify_clone = shutdown_notify.clone();

    tokio::spawn(async move {
        let mut sighup = match signal(SignalKind::hangup()) {
            Ok(sighup) => sighup,
            Err(e) => {
                tracing::warn!("Failed to install SIGHUP handler, config reload disabled: {}", e);
                return;
            }
        };

        loop {
            tokio::select! {
                _ = sighup.recv() => {
                    tracing::info!("Received SIGHUP, reloading configuration");
                    match config_loader.reload() {
                        Ok(config) => apply_reloaded_config(&log_handle, &running, &config),
                        Err(e) => {
                            tracing::error!("Failed to reload configuration: {}", e);
                        }
                    }
                }
                _ = shutdown_notify_clone.notified() => {
                    tracing::debug!("Config reload handler shutting down");
                    break;
                }
            }
        }
    });

    shutdown_notify
}

/// Apply a configuration re-read on SIGHUP.
pub fn apply_reloaded_config(
    log_handle: &LogReloadHandle,
    running: &ServerConfig,
    reloaded: &RuntimeConfig,
) {
    if reloaded.server != *running {
        tracing::warn!(
            listen = %running.listen,
            max_payload_bytes = running.max_payload_bytes,
            reloaded_listen = %reloaded.server.listen,
            reloaded_max_payload_bytes = reloaded.server.max_payload_bytes,
            "Server settings changed; restart to apply them"
        );
    }
    reload_filter(log_handle, &reloaded.log);
}
