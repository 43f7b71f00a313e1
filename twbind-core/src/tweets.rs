//! The `tweets` input binding.
//!
//! Every delivered tweet is logged and acknowledged. Nothing else happens to
//! it yet: parsing, filtering and forwarding belong in [`TweetHandler::invoke`]
//! once there is a downstream consumer.

use async_trait::async_trait;
use bytes::Bytes;
use twbind_sdk::BindingEvent;

use crate::context::InvocationContext;
use crate::handler::{BindingHandler, InvocationError};

/// Handler for the `tweets` binding. Logs each event and returns no result.
#[derive(Debug, Clone, Copy, Default)]
pub struct TweetHandler;

#[async_trait]
impl BindingHandler for TweetHandler {
    async fn invoke(
        &self,
        _ctx: InvocationContext,
        event: BindingEvent,
    ) -> Result<Bytes, InvocationError> {
        log_tweet(&event);
        Ok(Bytes::new())
    }
}

/// Emit one log line for `event`.
///
/// The payload is rendered escaped, so a payload with line breaks still
/// yields a single line.
pub fn log_tweet(event: &BindingEvent) {
    tracing::info!(
        metadata = ?event.metadata,
        data = ?event.data_lossy(),
        "tweet received"
    );
}
