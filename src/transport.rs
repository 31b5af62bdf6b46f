//! Transport capability and response envelope.
//!
//! The pipeline never touches the network itself: it hands a fully assembled
//! [`RequestInit`] to a [`Transport`] and gets back a [`Response`]. The
//! transport is an explicit constructor dependency; there is no ambient
//! process-wide fallback.
//!
//! [`HttpTransport`] is the bundled `reqwest`-backed implementation. Any
//! other HTTP stack can be plugged in by implementing [`Transport`]:
//!
//! ```ignore
//! use async_trait::async_trait;
//! use fetch_client::{RequestInit, Response, Transport, TransportError};
//!
//! struct MyTransport;
//!
//! #[async_trait]
//! impl Transport for MyTransport {
//!     async fn fetch(&self, request: &RequestInit) -> Result<Response, TransportError> {
//!         // execute the exchange with your HTTP library
//!         Ok(Response::new(200, "{}"))
//!     }
//! }
//! ```
//!
//! [`RequestInit`]: crate::types::RequestInit

use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::types::RequestInit;

/// Opaque failure produced by a transport before a response exists.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error recorded when a response body could not be read or decoded.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct BodyError(String);

impl BodyError {
    /// Wrap a body-read failure message.
    pub fn new(message: impl Into<String>) -> Self {
        BodyError(message.into())
    }
}

/// A single HTTP exchange: one assembled request in, one response out.
///
/// Implementations must return `Err` only when no response was produced at
/// all. A received response with a failed body read is still a response:
/// build it with [`Response::body_error`] so the failure surfaces as a
/// payload diagnostic instead.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute the exchange described by `request`.
    async fn fetch(&self, request: &RequestInit) -> Result<Response, TransportError>;
}

/// A received HTTP response.
///
/// Status, lower-cased headers, and a body captured as bytes (or the error
/// that prevented reading it). Cloning is cheap: the body is a [`Bytes`]
/// handle.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: BTreeMap<String, String>,
    body: Result<Bytes, BodyError>,
}

impl Response {
    /// Build a response with the given status and body.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Response {
            status,
            headers: BTreeMap::new(),
            body: Ok(body.into()),
        }
    }

    /// Build a response whose body could not be read.
    pub fn body_error(status: u16, message: impl Into<String>) -> Self {
        Response {
            status,
            headers: BTreeMap::new(),
            body: Err(BodyError::new(message)),
        }
    }

    /// Set one response header. The key is lower-cased.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Replace the header mapping. Keys are expected to be lower-cased
    /// already, as reqwest and mockito produce them.
    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status is in the success range (2xx).
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Look up a response header case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// All response headers under lower-cased keys.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Raw body bytes, or the recorded read failure.
    pub fn bytes(&self) -> Result<&Bytes, BodyError> {
        self.body.as_ref().map_err(Clone::clone)
    }

    /// Body decoded as UTF-8 text.
    pub fn text(&self) -> Result<String, BodyError> {
        let bytes = self.bytes()?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|err| BodyError::new(err.to_string()))
    }
}

/// The bundled `reqwest`-backed transport.
///
/// Used by [`FetchClient::new`]; construct it around a customized
/// [`reqwest::Client`] with [`HttpTransport::with_client`] to control
/// timeouts, proxies, or TLS.
///
/// [`FetchClient::new`]: crate::client::FetchClient::new
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Transport over a default `reqwest` client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport over a caller-configured `reqwest` client.
    pub fn with_client(client: reqwest::Client) -> Self {
        HttpTransport { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, request: &RequestInit) -> Result<Response, TransportError> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let mut headers = BTreeMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str().to_string(), value.to_string());
            }
        }

        // A failed body read is still a received response.
        let response = match response.bytes().await {
            Ok(bytes) => Response::new(status, bytes),
            Err(err) => Response::body_error(status, err.to_string()),
        };
        Ok(response.with_headers(headers))
    }
}
