//! Sidecar-style delivery of input-binding events.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use url::Url;

use super::ClientError;
use crate::objects::binding_event::{BindingEvent, Metadata};
use crate::routes::{HEALTH_ROUTE, binding_path};

/// Typed HTTP client that plays the host runtime's part.
///
/// Metadata travels as request headers and the payload as the raw body,
/// which is how the sidecar invokes an app's input binding.
#[derive(Debug, Clone)]
pub struct BindingClient {
    http: Client,
    base_url: Url,
}

impl BindingClient {
    /// * `base_url` – root URL of the endpoint (e.g. `http://127.0.0.1:8080`).
    pub fn new(base_url: Url) -> Self {
        Self::with_http_client(base_url, Client::new())
    }

    /// Use a caller-configured `reqwest::Client` (e.g. one with timeouts).
    pub fn with_http_client(base_url: Url, http: Client) -> Self {
        Self { http, base_url }
    }

    /// `OPTIONS /{binding}` – ask whether the app subscribes to a binding.
    ///
    /// Returns `false` when the endpoint answers `404`.
    pub async fn probe(&self, binding: &str) -> Result<bool, ClientError> {
        let url = self.base_url.join(&binding_path(binding))?;
        let resp = self.http.request(Method::OPTIONS, url).send().await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(api_error(status, resp).await),
        }
    }

    /// `POST /{binding}` – deliver one event and return the response body.
    pub async fn deliver(&self, binding: &str, event: &BindingEvent) -> Result<Bytes, ClientError> {
        let url = self.base_url.join(&binding_path(binding))?;

        let resp = self
            .http
            .post(url)
            .headers(metadata_headers(&event.metadata)?)
            .body(event.data.clone())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(api_error(status, resp).await);
        }
        Ok(resp.bytes().await?)
    }

    /// `GET /healthz` – succeed when the endpoint reports healthy.
    pub async fn health(&self) -> Result<(), ClientError> {
        let url = self.base_url.join(HEALTH_ROUTE)?;
        let resp = self.http.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(api_error(status, resp).await);
        }
        Ok(())
    }
}

fn metadata_headers(metadata: &Metadata) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::with_capacity(metadata.len());
    for (key, value) in metadata {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| ClientError::InvalidMetadata(key.clone()))?;
        let value =
            HeaderValue::from_str(value).map_err(|_| ClientError::InvalidMetadata(key.clone()))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

async fn api_error(status: StatusCode, resp: reqwest::Response) -> ClientError {
    let body = resp.text().await.unwrap_or_default();
    ClientError::Api { status, body }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_headers() {
        let mut metadata = Metadata::new();
        metadata.insert("x-tweet-lang".to_string(), "en".to_string());
        metadata.insert("traceparent".to_string(), "00-abc-def-01".to_string());

        let headers = metadata_headers(&metadata).unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["x-tweet-lang"], "en");
    }

    #[test]
    fn test_metadata_headers_rejects_invalid_name() {
        let mut metadata = Metadata::new();
        metadata.insert("not a header".to_string(), "value".to_string());

        let err = metadata_headers(&metadata).unwrap_err();
        assert!(matches!(err, ClientError::InvalidMetadata(key) if key == "not a header"));
    }

    #[test]
    fn test_metadata_headers_rejects_invalid_value() {
        let mut metadata = Metadata::new();
        metadata.insert("x-text".to_string(), "line\nbreak".to_string());

        assert!(matches!(
            metadata_headers(&metadata),
            Err(ClientError::InvalidMetadata(_))
        ));
    }
}
