//! The handler seam between the transport and binding logic.

use async_trait::async_trait;
use bytes::Bytes;
use std::future::Future;
use thiserror::Error;
use twbind_sdk::BindingEvent;

use crate::context::InvocationContext;

/// Errors a binding handler can report back to the host runtime.
#[derive(Debug, Error)]
pub enum InvocationError {
    /// The event could not be handled.
    #[error("binding handler failed: {0}")]
    Failed(String),

    /// The handler stopped because the process is shutting down.
    #[error("invocation cancelled")]
    Cancelled,
}

/// An input-binding handler.
///
/// Called once per delivered event, possibly concurrently. The returned
/// bytes are sent back to the host runtime; empty means no result.
#[async_trait]
pub trait BindingHandler: Send + Sync {
    async fn invoke(
        &self,
        ctx: InvocationContext,
        event: BindingEvent,
    ) -> Result<Bytes, InvocationError>;
}

/// Adapter turning an async closure into a [`BindingHandler`].
#[derive(Clone)]
pub struct HandlerFn<F> {
    f: F,
}

/// Wrap `f` so it can be registered as a binding handler.
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(InvocationContext, BindingEvent) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Bytes, InvocationError>> + Send,
{
    HandlerFn { f }
}

#[async_trait]
impl<F, Fut> BindingHandler for HandlerFn<F>
where
    F: Fn(InvocationContext, BindingEvent) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Bytes, InvocationError>> + Send,
{
    async fn invoke(
        &self,
        ctx: InvocationContext,
        event: BindingEvent,
    ) -> Result<Bytes, InvocationError> {
        (self.f)(ctx, event).await
    }
}
