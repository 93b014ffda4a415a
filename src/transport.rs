//! Transport boundary: the single external collaborator this crate calls.
//!
//! The [`Transport`] trait is the sole error channel the stream layer has to
//! handle: a rejected call is a raised failure, and non-success HTTP statuses
//! reject like any other failure. No retries and no error translation happen
//! here; those are the caller's tools (`retry` / `catch_error`).

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{TransportError, TransportResult};

/// HTTP methods supported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl Method {
    /// The method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
        }
    }
}

/// A fully resolved request, ready for the transport.
///
/// `Clone` because the stream layer replays requests under `retry`: each
/// attempt hands the transport its own copy.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub json: Option<Value>,
    pub timeout: Option<Duration>,
}

/// An undecoded response as the transport produced it.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// JSON body; `Value::Null` when the response carried no body.
    pub body: Value,
}

impl RawResponse {
    /// Decode the body into a typed [`Response`].
    pub fn into_typed<T: DeserializeOwned>(self) -> TransportResult<Response<T>> {
        let body =
            serde_json::from_value(self.body).map_err(|e| TransportError::Decode(e.to_string()))?;
        Ok(Response {
            status: self.status,
            headers: self.headers,
            body,
        })
    }
}

/// A decoded response: status, headers and a typed body.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: T,
}

impl<T> Response<T> {
    /// Consume the response, keeping only the body.
    pub fn into_body(self) -> T {
        self.body
    }
}

/// The external collaborator that issues one HTTP call per invocation.
///
/// Implementations must surface non-success statuses as errors; the stream
/// layer treats a rejected call as the raised failure of a single-element
/// stream.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Issue the request and produce the raw response.
    async fn send(&self, request: Request) -> TransportResult<RawResponse>;
}

/// Production [`Transport`] backed by [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing, pre-configured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> TransportResult<RawResponse> {
        let mut builder = self.client.request(request.method.into(), &request.url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.json {
            builder = builder.json(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                let ms = request.timeout.map(|d| d.as_millis() as u64).unwrap_or(0);
                TransportError::Timeout(ms)
            } else {
                TransportError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))?
        };

        Ok(RawResponse {
            status: status.as_u16(),
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Patch.to_string(), "PATCH");
        assert_eq!(reqwest::Method::from(Method::Delete), reqwest::Method::DELETE);
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Message {
        message: String,
    }

    #[test]
    fn test_into_typed_decodes_body() {
        let raw = RawResponse {
            status: 200,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: json!({"message": "Hello World!"}),
        };

        let response = raw.into_typed::<Message>().unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(
            response.into_body(),
            Message {
                message: "Hello World!".to_string()
            }
        );
    }

    #[test]
    fn test_into_typed_rejects_mismatched_body() {
        let raw = RawResponse {
            status: 200,
            headers: vec![],
            body: json!([1, 2, 3]),
        };

        let result = raw.into_typed::<Message>();
        assert!(matches!(result, Err(TransportError::Decode(_))));
    }

    #[test]
    fn test_into_typed_null_body_as_value() {
        // HEAD responses carry no body; Value::Null still decodes as Value.
        let raw = RawResponse {
            status: 200,
            headers: vec![],
            body: Value::Null,
        };

        let response = raw.into_typed::<Value>().unwrap();
        assert_eq!(response.body, Value::Null);
    }
}
