//! Error types for httpflow.

use thiserror::Error;

/// Root error type for httpflow operations.
///
/// This is the item error carried through a [`FlowStream`](crate::FlowStream):
/// a failed underlying call raises one of these through the stream, and it is
/// what `catch_error` handlers receive and what terminal pulls reject with.
#[derive(Error, Debug, Clone)]
pub enum HttpflowError {
    /// Transport-level errors (network, HTTP status, decoding)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A terminal pull found no value in the stream
    #[error("Stream completed without yielding a value")]
    Empty,

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

/// Errors raised by the transport collaborator.
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    /// The request could not be sent or the connection failed
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("HTTP status {0}")]
    Status(u16),

    /// The request did not complete in time
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    /// The response body could not be decoded
    #[error("Failed to decode response body: {0}")]
    Decode(String),
}

impl From<String> for HttpflowError {
    fn from(msg: String) -> Self {
        HttpflowError::Other(msg)
    }
}

impl From<&str> for HttpflowError {
    fn from(msg: &str) -> Self {
        HttpflowError::Other(msg.to_string())
    }
}

/// Result type alias for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Result type alias for general httpflow operations.
pub type HttpflowResult<T> = Result<T, HttpflowError>;
