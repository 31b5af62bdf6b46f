//! The request/response pipeline.
//!
//! [`ClientBase`] is the orchestration core: it assembles the outgoing
//! request (URL, query string, case-insensitive header merge, body
//! serialization), delegates transmission and payload resolution to
//! overridable hooks, and maps outcomes to [`Payload`] or [`FetchError`].
//!
//! The two hooks, [`ClientBase::transmit`] and
//! [`ClientBase::resolve_payload`], are default trait methods, so an
//! implementor overrides exactly the stage it cares about without
//! re-implementing request assembly. [`FetchClient`] overrides `transmit` to
//! inject authorization and notify observers; [`ApiTopic`] delegates both
//! hooks to its parent so scoping adds no behavior of its own.
//!
//! Within one call the stages run strictly in order: header merge before
//! send, send completed before payload resolution. Concurrent calls do not
//! block each other and have no completion-order guarantee.
//!
//! [`FetchClient`]: crate::client::FetchClient
//! [`ApiTopic`]: crate::client::ApiTopic

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use http::Method;

use crate::client::{Payload, ResponseReader};
use crate::error::{FetchError, Result};
use crate::transport::{Response, Transport};
use crate::types::{RequestInit, RequestParams};
use crate::utils;

/// Send an assembled request over a transport, classifying rejection as a
/// connection failure.
pub(crate) async fn send_over(transport: &dyn Transport, init: &RequestInit) -> Result<Response> {
    transport.fetch(init).await.map_err(|source| {
        tracing::error!(url = %init.url, error = %source, "failed to connect to server");
        FetchError::connection(source, init.clone())
    })
}

/// The pipeline shared by [`FetchClient`] and [`ApiTopic`].
///
/// Implementors supply the base URL, the transport, and a fresh snapshot of
/// the default headers; everything else is provided. The trait is
/// object-safe, so scoped sub-resources hold their parent as
/// `Arc<dyn ClientBase>`.
///
/// [`FetchClient`]: crate::client::FetchClient
/// [`ApiTopic`]: crate::client::ApiTopic
#[async_trait]
pub trait ClientBase: Send + Sync {
    /// Base URL, trailing slash already stripped.
    fn base_url(&self) -> &str;

    /// The transport requests are sent over.
    fn transport(&self) -> &Arc<dyn Transport>;

    /// Snapshot of the current default headers, under lower-cased keys.
    ///
    /// Read fresh on every call, so runtime mutation of the owning facade is
    /// observed by requests already scheduled but not yet assembled.
    fn default_headers(&self) -> BTreeMap<String, String>;

    /// Resolve a path against the base URL, stripping any trailing slash.
    fn url_for(&self, path: &str) -> String {
        utils::remove_trailing_slash(&utils::join(self.base_url(), path)).to_string()
    }

    /// The *send* hook: hand the assembled request to the transport.
    ///
    /// The default implementation delegates to [`ClientBase::transport`] and
    /// classifies a transport rejection as [`FetchError::Connection`].
    /// Overriders may adjust headers (auth injection), notify observers, or
    /// record diagnostics, and must still return the eventual response.
    async fn transmit(&self, init: &mut RequestInit) -> Result<Response> {
        send_over(self.transport().as_ref(), init).await
    }

    /// The *interpret* hook: resolve the received response into a payload.
    ///
    /// The default implementation applies the reader strategy selected in
    /// the request params. This never fails; malformed bodies resolve to
    /// diagnostic payloads.
    async fn resolve_payload(&self, response: &Response, reader: &ResponseReader) -> Payload {
        reader.read(response)
    }

    /// Execute one exchange.
    ///
    /// Assembles URL, query string, headers, and body; transmits; resolves
    /// the payload; then branches on the status classification: a success
    /// status resolves with the payload, anything else fails with
    /// [`FetchError::Server`] carrying the resolved payload.
    async fn request(&self, method: Method, path: &str, params: RequestParams) -> Result<Payload> {
        let RequestParams {
            query,
            headers: overrides,
            payload,
            reader,
        } = params;

        let mut url = self.url_for(path);
        if !query.is_empty() {
            let query_string = utils::build_query_string(&query);
            if !query_string.is_empty() {
                url.push('?');
                url.push_str(&query_string);
            }
        }

        let mut headers = self.default_headers();
        for (key, value) in overrides {
            headers.insert(key.to_ascii_lowercase(), value);
        }

        let mut init = RequestInit {
            method,
            url,
            headers,
            body: None,
        };
        if let Some(body) = payload {
            init.body = Some(body.into_text());
            if init.header("content-type").is_none() {
                init.set_header("content-type", "application/json");
            }
        }

        let response = self.transmit(&mut init).await?;
        let payload = self.resolve_payload(&response, &reader).await;
        if response.ok() {
            Ok(payload)
        } else {
            Err(FetchError::server(response.status(), payload, init))
        }
    }

    /// `GET` convenience.
    async fn get(&self, path: &str, params: RequestParams) -> Result<Payload> {
        self.request(Method::GET, path, params).await
    }

    /// `POST` convenience.
    async fn post(&self, path: &str, params: RequestParams) -> Result<Payload> {
        self.request(Method::POST, path, params).await
    }

    /// `PUT` convenience.
    async fn put(&self, path: &str, params: RequestParams) -> Result<Payload> {
        self.request(Method::PUT, path, params).await
    }

    /// `DELETE` convenience.
    async fn delete(&self, path: &str, params: RequestParams) -> Result<Payload> {
        self.request(Method::DELETE, path, params).await
    }
}
