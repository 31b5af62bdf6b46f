//! Error types and result handling.
//!
//! Failures are classified by where they happened:
//!
//! - [`FetchError::Connection`]: the transport rejected before any response
//!   was received (DNS failure, refused connection, transport-level timeout).
//!   `status()` is `0`.
//! - [`FetchError::Server`]: a response arrived but its status is outside
//!   the success range. Carries the resolved payload, not the raw body.
//! - [`FetchError::Auth`]: the installed auth callback itself failed.
//!
//! Every variant exposes `status()`, `payload()`, and the originating
//! [`RequestInit`] where available; [`FetchError::diagnostic`] composes a
//! `"<METHOD> <URL> => <status>"` line for logging. Errors always propagate
//! to the caller; the pipeline never retries and never swallows them.

use std::fmt;

use thiserror::Error;

use crate::client::Payload;
use crate::transport::TransportError;
use crate::types::RequestInit;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, FetchError>;

/// A failed request.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The transport rejected before a response was received.
    Connection {
        /// Underlying transport failure.
        #[source]
        source: TransportError,
        /// The request that was being sent.
        request: Option<Box<RequestInit>>,
    },
    /// A response was received with a non-success status.
    Server {
        /// The HTTP status code.
        status: u16,
        /// The resolved response payload.
        payload: Payload,
        /// The request that produced the response.
        request: Option<Box<RequestInit>>,
    },
    /// The auth callback failed to produce an authorization value.
    Auth {
        /// Underlying callback failure.
        #[source]
        source: TransportError,
    },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Connection { source, .. } => {
                write!(f, "Failed to connect to server: {source}")
            }
            FetchError::Server {
                status, payload, ..
            } => match payload.message() {
                Some(message) => f.write_str(&message),
                None => write!(f, "Server Error: {status}"),
            },
            FetchError::Auth { source } => {
                write!(f, "Failed to obtain authorization: {source}")
            }
        }
    }
}

impl FetchError {
    /// Build a connection error for a request the transport rejected.
    pub fn connection(source: TransportError, request: RequestInit) -> Self {
        FetchError::Connection {
            source,
            request: Some(Box::new(request)),
        }
    }

    /// Build a server error from a non-success response.
    pub fn server(status: u16, payload: Payload, request: RequestInit) -> Self {
        FetchError::Server {
            status,
            payload,
            request: Some(Box::new(request)),
        }
    }

    /// Build an auth-callback failure.
    pub fn auth(source: TransportError) -> Self {
        FetchError::Auth { source }
    }

    /// HTTP status of the failure; `0` when no response was received.
    pub fn status(&self) -> u16 {
        match self {
            FetchError::Connection { .. } | FetchError::Auth { .. } => 0,
            FetchError::Server { status, .. } => *status,
        }
    }

    /// Resolved payload of a server error.
    pub fn payload(&self) -> Option<&Payload> {
        match self {
            FetchError::Server { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// The request descriptor the failure originated from, when recorded.
    pub fn request(&self) -> Option<&RequestInit> {
        match self {
            FetchError::Connection { request, .. } | FetchError::Server { request, .. } => {
                request.as_deref()
            }
            FetchError::Auth { .. } => None,
        }
    }

    /// Compose a one-line diagnostic: `"<METHOD> <URL> => <status>"`, plus
    /// payload-provided detail when present.
    ///
    /// Falls back to the error message when no request was recorded.
    pub fn diagnostic(&self) -> String {
        match self.request() {
            Some(request) => {
                let mut out = format!("{} {} => {}", request.method, request.url, self.status());
                if let Some(detail) = self.payload().and_then(Payload::message) {
                    out.push_str(": ");
                    out.push_str(&detail);
                }
                out
            }
            None => self.to_string(),
        }
    }
}
