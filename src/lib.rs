#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # Fetch Client
//!
//! A minimal async HTTP client abstraction layered over a pluggable fetch
//! transport. The crate standardizes request construction, response
//! resolution, and error classification, and exposes the two pipeline
//! stages (*send* and *interpret*) as overridable hooks so that
//! cross-cutting concerns like auth injection and observation compose
//! without re-implementing request assembly.
//!
//! ## Overview
//!
//! - **[`FetchClient`]**: the configurable entry point with mutable default
//!   headers, an optional async auth callback re-evaluated per request,
//!   request/response observers, and access to the last raw response.
//! - **[`ApiTopic`]**: a path-scoped view sharing a parent's transport,
//!   headers, and auth; used to namespace an API's endpoint groups.
//! - **[`ClientBase`]**: the pipeline both are built on: URL resolution,
//!   case-insensitive header merging, body serialization, transport
//!   dispatch, payload resolution, and status classification.
//! - **[`Transport`]**: the injected fetch capability. The bundled
//!   [`HttpTransport`] rides on `reqwest`; any HTTP stack can be plugged in.
//! - **[`FetchError`]**: the failure taxonomy of connection errors
//!   (status 0), server errors carrying the resolved payload, and auth
//!   callback failures.
//!
//! Malformed JSON in a success response is not an error: it resolves to a
//! diagnostic payload object, so only the HTTP status classification decides
//! success or failure.
//!
//! ## Client Usage
//!
//! ```ignore
//! use fetch_client::{ClientBase, FetchClient, RequestParams};
//!
//! #[tokio::main]
//! async fn main() -> fetch_client::Result<()> {
//!     let client = FetchClient::new("https://api.example.com/v1")
//!         .with_auth_callback(|| async { Ok("Bearer abc".to_string()) });
//!
//!     let users = client
//!         .get("/users", RequestParams::new().with_query("active", true))
//!         .await?;
//!     println!("{users:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - **[client]** - Pipeline, facade, sub-resources, and payload readers
//! - **[error]** - Error taxonomy and result handling
//! - **[transport]** - Transport capability and the bundled reqwest backend
//! - **[types]** - Request descriptors and per-call options
//! - **[utils]** - URL joining and query-string helpers

pub mod client;
pub mod error;
pub mod transport;
pub mod types;
pub mod utils;

pub use client::{
    read_json_payload, ApiTopic, AuthCallback, ClientBase, CustomReader, FetchClient, Payload,
    RequestObserver, ResponseObserver, ResponseReader,
};
pub use error::{FetchError, Result};
pub use transport::{BodyError, HttpTransport, Response, Transport, TransportError};
pub use types::{Body, RequestInit, RequestParams};
pub use utils::{QueryMap, QueryValue};
