//! Per-invocation context handed to every binding handler.

use tokio::sync::watch;

/// Context for one handler invocation.
///
/// Carries the binding name and a view of the process shutdown signal so a
/// long-running handler can stop early. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    binding: String,
    shutdown_rx: watch::Receiver<bool>,
}

impl InvocationContext {
    /// Create a context observing `shutdown_rx`.
    ///
    /// The sender side flips the value to `true` when the process begins a
    /// graceful shutdown.
    pub fn new(binding: impl Into<String>, shutdown_rx: watch::Receiver<bool>) -> Self {
        Self {
            binding: binding.into(),
            shutdown_rx,
        }
    }

    /// A context that is never cancelled.
    pub fn detached(binding: impl Into<String>) -> Self {
        let (_tx, shutdown_rx) = watch::channel(false);
        Self::new(binding, shutdown_rx)
    }

    /// The name of the binding being invoked.
    pub fn binding(&self) -> &str {
        &self.binding
    }

    /// Whether shutdown has been signalled.
    pub fn is_cancelled(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    /// Wait until shutdown is signalled.
    ///
    /// Never resolves if the signal source goes away without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.shutdown_rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancelled_after_signal() {
        let (tx, rx) = watch::channel(false);
        let ctx = InvocationContext::new("tweets", rx);
        assert_eq!(ctx.binding(), "tweets");
        assert!(!ctx.is_cancelled());

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), ctx.cancelled())
            .await
            .unwrap();
        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_detached_never_cancels() {
        let ctx = InvocationContext::detached("tweets");
        assert!(!ctx.is_cancelled());

        let waited = tokio::time::timeout(Duration::from_millis(20), ctx.cancelled()).await;
        assert!(waited.is_err());
    }
}
