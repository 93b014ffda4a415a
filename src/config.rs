//! Client and per-request configuration.
//!
//! [`ClientConfig`] holds client-wide defaults; [`RequestOptions`] holds the
//! options of a single call. The client resolves both into one
//! [`Request`](crate::transport::Request) before any stream is built, so a
//! replayed attempt reuses the exact same resolved request.

use std::time::Duration;

use serde_json::Value;

use crate::transport::{Method, Request};

/// Client-wide defaults applied to every request.
///
/// # Example
///
/// ```rust
/// use httpflow::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new()
///     .with_base_url("http://localhost:3000")
///     .with_header("accept", "application/json")
///     .with_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Base URL that relative request URLs are joined onto
    pub base_url: Option<String>,
    /// Headers sent with every request
    pub headers: Vec<(String, String)>,
    /// Default timeout, overridable per request
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL for relative request URLs.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the default timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Merge these defaults with per-request options into a resolved request.
    ///
    /// Client headers come first so per-request headers can override them;
    /// a per-request timeout wins over the default; a relative URL is joined
    /// onto `base_url` when one is set.
    pub fn resolve(&self, method: Method, url: String, options: RequestOptions) -> Request {
        let url = match &self.base_url {
            Some(base) if !url.starts_with("http://") && !url.starts_with("https://") => {
                format!("{}/{}", base.trim_end_matches('/'), url.trim_start_matches('/'))
            }
            _ => url,
        };

        let mut headers = self.headers.clone();
        headers.extend(options.headers);

        Request {
            method,
            url,
            headers,
            query: options.query,
            json: options.json,
            timeout: options.timeout.or(self.timeout),
        }
    }
}

/// Options of a single request.
///
/// # Example
///
/// ```rust
/// use httpflow::RequestOptions;
/// use serde_json::json;
///
/// let options = RequestOptions::new()
///     .json(json!({"message": "Hello Echo!"}))
///     .query("page", "1")
///     .header("x-request-id", "abc123");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// JSON body to send
    pub json: Option<Value>,
    /// Query string parameters
    pub query: Vec<(String, String)>,
    /// Additional headers for this request
    pub headers: Vec<(String, String)>,
    /// Timeout for this request, overriding the client default
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Add a query string parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_joins_relative_url() {
        let config = ClientConfig::new().with_base_url("http://localhost:3000/");
        let request = config.resolve(Method::Get, "/hello".to_string(), RequestOptions::new());
        assert_eq!(request.url, "http://localhost:3000/hello");
    }

    #[test]
    fn test_resolve_keeps_absolute_url() {
        let config = ClientConfig::new().with_base_url("http://localhost:3000");
        let request = config.resolve(
            Method::Get,
            "https://example.com/api".to_string(),
            RequestOptions::new(),
        );
        assert_eq!(request.url, "https://example.com/api");
    }

    #[test]
    fn test_resolve_merges_headers_in_order() {
        let config = ClientConfig::new().with_header("accept", "application/json");
        let options = RequestOptions::new().header("x-custom", "1");
        let request = config.resolve(Method::Post, "http://x/y".to_string(), options);

        assert_eq!(
            request.headers,
            vec![
                ("accept".to_string(), "application/json".to_string()),
                ("x-custom".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_request_timeout_overrides_default() {
        let config = ClientConfig::new().with_timeout(Duration::from_secs(30));

        let request = config.resolve(
            Method::Get,
            "http://x/y".to_string(),
            RequestOptions::new().timeout(Duration::from_secs(2)),
        );
        assert_eq!(request.timeout, Some(Duration::from_secs(2)));

        let request = config.resolve(Method::Get, "http://x/y".to_string(), RequestOptions::new());
        assert_eq!(request.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_options_builder() {
        let options = RequestOptions::new()
            .json(json!({"a": 1}))
            .query("page", "2")
            .header("x", "y");

        assert_eq!(options.json, Some(json!({"a": 1})));
        assert_eq!(options.query, vec![("page".to_string(), "2".to_string())]);
        assert_eq!(options.headers, vec![("x".to_string(), "y".to_string())]);
    }
}
