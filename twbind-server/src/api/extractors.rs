//! Custom Axum extractors for binding deliveries.
//!
//! The sidecar sends the event payload as the raw request body and the event
//! metadata as request headers.

use axum::{
    extract::{FromRequest, Request, rejection::BytesRejection},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use twbind_sdk::{BindingEvent, Metadata};

/// An Axum extractor that rebuilds the [`BindingEvent`] of one delivery.
///
/// Consumes the body, so it runs after every other extractor. The body size
/// limit comes from the router's `DefaultBodyLimit`.
pub struct DeliveredEvent(pub BindingEvent);

/// Errors that can occur while reading a delivery.
#[derive(Debug, thiserror::Error)]
pub enum DeliveredEventError {
    #[error("failed to read binding payload: {0}")]
    Body(#[from] BytesRejection),
}

impl IntoResponse for DeliveredEventError {
    fn into_response(self) -> Response {
        match self {
            DeliveredEventError::Body(rejection) => {
                tracing::warn!(error = %rejection, "Rejected binding delivery");
                // Keeps the rejection's own status, e.g. 413 for oversized bodies.
                rejection.into_response()
            }
        }
    }
}

impl<S: Send + Sync> FromRequest<S> for DeliveredEvent {
    type Rejection = DeliveredEventError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let metadata = metadata_from_headers(req.headers());
        let data = Bytes::from_request(req, state).await?;
        Ok(DeliveredEvent(BindingEvent::new(metadata, data)))
    }
}

/// Collect request headers into event metadata.
///
/// Header names arrive lower-cased. Values are decoded as lossy UTF-8; when a
/// header repeats, the last value wins.
pub fn metadata_from_headers(headers: &HeaderMap) -> Metadata {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_owned(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_metadata_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-tweet-lang", HeaderValue::from_static("en"));
        headers.append("x-tag", HeaderValue::from_static("first"));
        headers.append("x-tag", HeaderValue::from_static("last"));
        headers.insert("x-raw", HeaderValue::from_bytes(b"caf\xe9").unwrap());

        let metadata = metadata_from_headers(&headers);
        assert_eq!(metadata.len(), 3);
        assert_eq!(metadata["x-tweet-lang"], "en");
        assert_eq!(metadata["x-tag"], "last");
        assert_eq!(metadata["x-raw"], "caf\u{fffd}");
    }

    #[test]
    fn test_no_headers_no_metadata() {
        assert!(metadata_from_headers(&HeaderMap::new()).is_empty());
    }
}
