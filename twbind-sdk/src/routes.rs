//! Route names shared by the endpoint and the delivery client.

/// Name of the input binding that carries tweets.
pub const TWEETS_BINDING: &str = "tweets";

/// App health route polled by the sidecar.
pub const HEALTH_ROUTE: &str = "/healthz";

/// Path segment reserved by [`HEALTH_ROUTE`]; no binding may use it.
pub const HEALTH_SEGMENT: &str = "healthz";

/// Build the request path for a binding name.
pub fn binding_path(binding: &str) -> String {
    format!("/{}", binding.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_path() {
        assert_eq!(binding_path("tweets"), "/tweets");
        assert_eq!(binding_path("/tweets"), "/tweets");
        assert_eq!(HEALTH_ROUTE, binding_path(HEALTH_SEGMENT));
    }
}
