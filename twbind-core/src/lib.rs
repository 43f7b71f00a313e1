//! Binding handlers for twbind.
//!
//! A handler is a pure async function of a [`BindingEvent`](twbind_sdk::BindingEvent)
//! and an [`InvocationContext`]. Handlers are collected in a
//! [`BindingRegistry`] at startup; the server crate adapts the registry to HTTP.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod context;
pub mod handler;
pub mod registry;
#[cfg(any(test, feature = "test-util"))]
pub mod test_support;
pub mod tweets;

pub use context::InvocationContext;
pub use handler::{BindingHandler, HandlerFn, InvocationError, handler_fn};
pub use registry::{BindingRegistry, RegistrationError};
pub use tweets::TweetHandler;
