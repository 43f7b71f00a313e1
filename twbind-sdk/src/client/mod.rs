//! HTTP client that delivers binding events to a twbind endpoint.
//!
//! Gated behind the `client` cargo feature so crates that only need the
//! shared types do not pull in `reqwest`.

mod binding;

pub use binding::BindingClient;

use reqwest::StatusCode;

/// Errors produced by the SDK HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, connection refused, reset, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint returned a non-2xx status code.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// The base URL could not be joined with the binding path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// A metadata entry cannot be sent as an HTTP header.
    #[error("metadata entry {0:?} is not a valid header")]
    InvalidMetadata(String),
}
