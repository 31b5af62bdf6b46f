//! Request descriptors and per-call options.
//!
//! A [`RequestInit`] is the transient, fully assembled description of one
//! outgoing exchange: method, absolute URL, lower-cased headers, and an
//! optional serialized body. It is built by the pipeline once per call and
//! handed to the transport.
//!
//! [`RequestParams`] is what callers supply: an optional query mapping,
//! per-call header overrides, an optional [`Body`], and the payload reader to
//! apply to the response.

use std::collections::BTreeMap;

use http::Method;
use serde::Serialize;
use serde_json::Value;

use crate::client::ResponseReader;
use crate::utils::{QueryMap, QueryValue};

/// An outgoing request body.
///
/// Text passes through to the wire unmodified; anything else is carried as a
/// JSON value and serialized with `serde_json`. Either way the pipeline adds
/// `content-type: application/json` unless a content type was already set.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// A raw string body, sent as-is.
    Text(String),
    /// A JSON body, serialized on assembly.
    Json(Value),
}

impl Body {
    /// Build a JSON body from any serializable value.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Body::Json(serde_json::to_value(value)?))
    }

    pub(crate) fn into_text(self) -> String {
        match self {
            Body::Text(text) => text,
            Body::Json(value) => value.to_string(),
        }
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Body::Text(value)
    }
}

impl From<&str> for Body {
    fn from(value: &str) -> Self {
        Body::Text(value.to_string())
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Json(value)
    }
}

/// A fully assembled outgoing request.
///
/// Header keys are lower-cased before storage or comparison, so two headers
/// differing only in case never coexist. The URL is built once by the
/// pipeline and not mutated after assembly; the *send* hook may still adjust
/// headers (auth injection) before the transport takes over.
#[derive(Debug, Clone)]
pub struct RequestInit {
    /// HTTP method. The pipeline is verb-agnostic and accepts any method.
    pub method: Method,
    /// Fully qualified URL, query string included.
    pub url: String,
    /// Outgoing headers under lower-cased keys.
    pub headers: BTreeMap<String, String>,
    /// Serialized body, when present.
    pub body: Option<String>,
}

impl RequestInit {
    /// Look up a header case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Set a header, lower-casing the key.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }
}

/// Per-call request options.
///
/// # Examples
///
/// ```
/// use fetch_client::RequestParams;
/// use serde_json::json;
///
/// let params = RequestParams::new()
///     .with_query("active", true)
///     .with_query("id", vec![1, 2])
///     .with_header("x-request-id", "42")
///     .with_payload(json!({ "name": "bob" }));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    /// Query parameters appended to the resolved URL.
    pub query: QueryMap,
    /// Per-call header overrides, merged over the default headers.
    pub headers: BTreeMap<String, String>,
    /// Optional request body.
    pub payload: Option<Body>,
    /// Strategy used to resolve the response payload. Defaults to JSON.
    pub reader: ResponseReader,
}

impl RequestParams {
    /// New empty params: no query, no overrides, no body, JSON reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a per-call header override. The key is lower-cased.
    pub fn with_header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.insert(key.to_ascii_lowercase(), value.into());
        self
    }

    /// Attach a request body.
    pub fn with_payload(mut self, payload: impl Into<Body>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Select the payload reader applied to the response.
    pub fn with_reader(mut self, reader: ResponseReader) -> Self {
        self.reader = reader;
        self
    }
}
