//! # Httpflow
//!
//! **Httpflow** is a lazy, chainable stream layer over single-shot HTTP
//! calls. One call yields a one-element asynchronous stream, and the
//! [`FlowStream`] wrapper around it composes like a functional sequence.
//!
//! ## Overview
//!
//! A [`FlowStream`] carries:
//! - the functional-sequence operations `map`, `filter`, `take`, `chain`;
//! - three HTTP-minded additions: `catch_error` (failure substitution),
//!   `retry` (bounded replay of the source), `merge_map` (flattening map);
//! - terminal pulls `head` and `to_vec` that drive the chain.
//!
//! Every chaining operation returns another `FlowStream`, so the extended
//! capability set survives arbitrary composition. Nothing executes until a
//! terminal pull runs: no network call, no iteration.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use httpflow::{HttpClient, RequestOptions, Response};
//!
//! let client = HttpClient::new();
//!
//! let body = client
//!     .get::<serde_json::Value>("http://localhost:3000/hello", RequestOptions::new())
//!     .retry(2)
//!     .catch_error(|err| Response { status: 200, headers: vec![], body: fallback(err) })
//!     .chain(|s| s.map(Response::into_body))
//!     .head()
//!     .await?;
//! ```
//!
//! ## Features
//!
//! - Lazy single-element streams per HTTP call, replayable under `retry`
//! - Failure substitution, bounded retry and order-preserving flatten-map
//! - Pluggable [`Transport`] trait with a reqwest-backed default
//! - Client-wide defaults merged with per-request options

mod client;
mod config;
mod error;
mod transport;
pub mod stream;

pub mod prelude;

// Re-export core types
pub use client::HttpClient;
pub use config::{ClientConfig, RequestOptions};
pub use error::{HttpflowError, HttpflowResult, TransportError, TransportResult};
pub use stream::{FlowStream, ItemStream};
pub use transport::{Method, RawResponse, ReqwestTransport, Request, Response, Transport};

// Re-export async-trait for convenience
pub use async_trait::async_trait;
