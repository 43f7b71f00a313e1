//! Application state shared across all request handlers.

use std::sync::Arc;
use tokio::sync::watch;
use twbind_core::BindingRegistry;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Registered binding handlers. Read-only once serving starts.
    pub registry: Arc<BindingRegistry>,
    /// Flips to `true` when graceful shutdown begins.
    pub shutdown_rx: watch::Receiver<bool>,
}

impl AppState {
    /// Create a new AppState with the given registry and shutdown signal.
    pub fn new(registry: BindingRegistry, shutdown_rx: watch::Receiver<bool>) -> Self {
        Self {
            registry: Arc::new(registry),
            shutdown_rx,
        }
    }
}
