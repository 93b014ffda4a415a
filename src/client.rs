//! The HTTP client: one verb method per HTTP method, each returning a lazy
//! [`FlowStream`] of exactly one response.
//!
//! Nothing is sent at call time. A verb method resolves the request against
//! the client configuration and wraps it into a single-element stream whose
//! instantiation issues the call; the network is touched only when a
//! terminal pull drives the chain, and once per `retry` attempt thereafter.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::{ClientConfig, RequestOptions};
use crate::stream::FlowStream;
use crate::transport::{Method, ReqwestTransport, Response, Transport};

/// HTTP client producing [`FlowStream`]s over single responses.
///
/// # Example
///
/// ```rust,ignore
/// use httpflow::{HttpClient, RequestOptions, Response};
///
/// let client = HttpClient::new();
/// let body = client
///     .get::<serde_json::Value>("http://localhost:3000/hello", RequestOptions::new())
///     .retry(2)
///     .chain(|s| s.map(Response::into_body))
///     .head()
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
}

impl HttpClient {
    /// Create a client over the default reqwest transport.
    pub fn new() -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new()))
    }

    /// Create a client over a caller-supplied transport.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            config: ClientConfig::default(),
        }
    }

    /// Attach client-wide configuration.
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Issue a GET request.
    pub fn get<T>(&self, url: impl Into<String>, options: RequestOptions) -> FlowStream<Response<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.request(Method::Get, url, options)
    }

    /// Issue a POST request.
    pub fn post<T>(
        &self,
        url: impl Into<String>,
        options: RequestOptions,
    ) -> FlowStream<Response<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.request(Method::Post, url, options)
    }

    /// Issue a PUT request.
    pub fn put<T>(&self, url: impl Into<String>, options: RequestOptions) -> FlowStream<Response<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.request(Method::Put, url, options)
    }

    /// Issue a PATCH request.
    pub fn patch<T>(
        &self,
        url: impl Into<String>,
        options: RequestOptions,
    ) -> FlowStream<Response<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.request(Method::Patch, url, options)
    }

    /// Issue a DELETE request.
    pub fn delete<T>(
        &self,
        url: impl Into<String>,
        options: RequestOptions,
    ) -> FlowStream<Response<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.request(Method::Delete, url, options)
    }

    /// Issue a HEAD request. The response body decodes from `null`;
    /// `serde_json::Value` is the usual body type here.
    pub fn head<T>(
        &self,
        url: impl Into<String>,
        options: RequestOptions,
    ) -> FlowStream<Response<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.request(Method::Head, url, options)
    }

    /// Issue a request with an explicit method.
    ///
    /// On success the stream yields exactly one decoded [`Response`] and
    /// ends; on failure it raises the transport error. No retries and no
    /// error translation happen here.
    pub fn request<T>(
        &self,
        method: Method,
        url: impl Into<String>,
        options: RequestOptions,
    ) -> FlowStream<Response<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let transport = Arc::clone(&self.transport);
        let request = self.config.resolve(method, url.into(), options);

        FlowStream::once(move || {
            let transport = Arc::clone(&transport);
            let request = request.clone();
            async move {
                tracing::debug!(method = %request.method, url = %request.url, "issuing request");
                let raw = transport.send(request).await?;
                Ok(raw.into_typed::<T>()?)
            }
        })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
