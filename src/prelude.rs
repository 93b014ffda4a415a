//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits
//! from httpflow for convenient glob imports.
//!
//! # Example
//!
//! ```rust
//! use httpflow::prelude::*;
//! ```

// Client
pub use crate::client::HttpClient;

// Configuration
pub use crate::config::{ClientConfig, RequestOptions};

// Streams
pub use crate::stream::{FlowStream, ItemStream};

// Transport
pub use crate::transport::{Method, RawResponse, ReqwestTransport, Request, Response, Transport};

// Errors
pub use crate::error::{HttpflowError, HttpflowResult, TransportError, TransportResult};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
