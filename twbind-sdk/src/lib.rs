//! Shared types for twbind, the tweet input-binding endpoint.
//!
//! The `client` feature adds [`client::BindingClient`], which delivers events
//! to a running endpoint the same way the sidecar does.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(unsafe_code)]

pub mod objects;
pub mod routes;

#[cfg(feature = "client")]
pub mod client;

pub use objects::binding_event::{BindingEvent, Metadata};
