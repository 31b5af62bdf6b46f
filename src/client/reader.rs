//! Payload resolution strategies.
//!
//! A [`ResponseReader`] decides how a received [`Response`] body becomes a
//! [`Payload`]. The default JSON strategy is deliberately lenient: a body
//! that fails to parse is converted into a diagnostic JSON object instead of
//! an error, so a non-JSON success response never crashes the caller. Only
//! the status classification decides success or failure.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde_json::{json, Value};

use crate::transport::{BodyError, Response};

/// The resolved payload of a completed exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The response body was empty.
    Empty,
    /// A JSON value: the parsed body, or a diagnostic object when parsing
    /// or reading the body failed.
    Json(Value),
    /// The body as text, produced by [`ResponseReader::Text`].
    Text(String),
    /// The raw body bytes, produced by [`ResponseReader::Bytes`].
    Bytes(Bytes),
}

impl Payload {
    /// Whether the payload is [`Payload::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Empty)
    }

    /// The JSON value, when this is a JSON payload.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Consume into the JSON value, when this is a JSON payload.
    pub fn into_json(self) -> Option<Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The text content, when this is a text payload.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The `message` field of a JSON object payload.
    ///
    /// Server errors use this as their display message when present.
    pub fn message(&self) -> Option<String> {
        match self {
            Payload::Json(Value::Object(map)) => map.get("message").map(|value| match value {
                Value::String(message) => message.clone(),
                other => other.to_string(),
            }),
            _ => None,
        }
    }
}

/// Function type carried by [`ResponseReader::Custom`].
pub type CustomReader = Arc<dyn Fn(&Response) -> Payload + Send + Sync>;

/// Strategy for turning a response body into a [`Payload`].
#[derive(Clone, Default)]
pub enum ResponseReader {
    /// Lenient JSON resolution (the default): see [`read_json_payload`].
    #[default]
    Json,
    /// The body as UTF-8 text.
    Text,
    /// The raw body bytes.
    Bytes,
    /// A caller-supplied resolution function.
    Custom(CustomReader),
}

impl ResponseReader {
    /// Wrap a resolution function as a reader.
    pub fn custom(read: impl Fn(&Response) -> Payload + Send + Sync + 'static) -> Self {
        ResponseReader::Custom(Arc::new(read))
    }

    /// Apply the strategy to a response.
    pub fn read(&self, response: &Response) -> Payload {
        match self {
            ResponseReader::Json => read_json_payload(response),
            ResponseReader::Text => match response.text() {
                Ok(text) => Payload::Text(text),
                Err(err) => read_failure(response.status(), &err),
            },
            ResponseReader::Bytes => match response.bytes() {
                Ok(bytes) => Payload::Bytes(bytes.clone()),
                Err(err) => read_failure(response.status(), &err),
            },
            ResponseReader::Custom(read) => {
                let read = read.as_ref();
                read(response)
            }
        }
    }
}

impl fmt::Debug for ResponseReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseReader::Json => f.write_str("Json"),
            ResponseReader::Text => f.write_str("Text"),
            ResponseReader::Bytes => f.write_str("Bytes"),
            ResponseReader::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Resolve a response body as JSON, leniently.
///
/// - body read failure → diagnostic object
///   `{status, error: "Unable to load response content", message}`;
/// - empty body → [`Payload::Empty`];
/// - valid JSON → the parsed value;
/// - malformed JSON → diagnostic object
///   `{status, error: "Not a valid JSON payload", message, text}`.
///
/// Malformed JSON is never an error here; it becomes the payload.
pub fn read_json_payload(response: &Response) -> Payload {
    let text = match response.text() {
        Ok(text) => text,
        Err(err) => return read_failure(response.status(), &err),
    };
    if text.is_empty() {
        return Payload::Empty;
    }
    match serde_json::from_str::<Value>(&text) {
        Ok(value) => Payload::Json(value),
        Err(err) => {
            tracing::warn!(status = response.status(), error = %err, "response body is not valid JSON");
            Payload::Json(json!({
                "status": response.status(),
                "error": "Not a valid JSON payload",
                "message": err.to_string(),
                "text": text,
            }))
        }
    }
}

fn read_failure(status: u16, err: &BodyError) -> Payload {
    Payload::Json(json!({
        "status": status,
        "error": "Unable to load response content",
        "message": err.to_string(),
    }))
}
