//! The configurable client facade.
//!
//! [`FetchClient`] is the concrete entry point: it owns the mutable default
//! headers, the optional auth callback, the request/response observers, and
//! the last-received raw response. All verb methods come from [`ClientBase`];
//! the facade only overrides the *send* hook to layer auth injection and
//! observation on top of the shared pipeline.
//!
//! # Examples
//!
//! ```ignore
//! use fetch_client::{ClientBase, FetchClient, RequestParams};
//!
//! #[tokio::main]
//! async fn main() -> fetch_client::Result<()> {
//!     let client = FetchClient::new("https://api.example.com/v1")
//!         .with_lang(Some("en"))
//!         .with_auth_callback(|| async { Ok("Bearer abc".to_string()) });
//!
//!     let payload = client
//!         .get("/users", RequestParams::new().with_query("active", true))
//!         .await?;
//!     println!("{payload:?}");
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::{Mutex, RwLock};

use crate::client::base::{send_over, ClientBase};
use crate::error::{FetchError, Result};
use crate::transport::{HttpTransport, Response, Transport, TransportError};
use crate::types::RequestInit;
use crate::utils;

/// Zero-argument async callback producing the `authorization` header value.
///
/// Re-evaluated on every request, never cached, so token refresh logic
/// lives entirely in the callback.
pub type AuthCallback =
    Arc<dyn Fn() -> BoxFuture<'static, std::result::Result<String, TransportError>> + Send + Sync>;

/// Callback observing each assembled request just before transmission.
pub type RequestObserver = Arc<dyn Fn(&RequestInit) + Send + Sync>;

/// Callback observing each received response before payload resolution.
pub type ResponseObserver = Arc<dyn Fn(&Response) + Send + Sync>;

/// The top-level configurable HTTP client.
///
/// Default headers are initialized to `{accept: application/json}` and are
/// shared with every [`ApiTopic`] created from this facade: a `set_header`
/// call is immediately visible to all of them. Header mutation is
/// facade-wide and not atomic with respect to in-flight calls.
///
/// The last-received raw response is kept for inspection (e.g. response
/// headers) and overwritten at the start of every new call. Concurrent calls
/// on one facade race on it and the last write wins; callers needing
/// per-call response metadata must not share one facade across those calls.
///
/// [`ApiTopic`]: crate::client::ApiTopic
pub struct FetchClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    headers: RwLock<BTreeMap<String, String>>,
    auth: RwLock<Option<AuthCallback>>,
    on_request: RwLock<Option<RequestObserver>>,
    on_response: RwLock<Option<ResponseObserver>>,
    last_response: Mutex<Option<Response>>,
}

impl FetchClient {
    /// Client over the bundled reqwest transport.
    ///
    /// The trailing slash of `base_url` is stripped at construction and the
    /// URL is not re-validated later.
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, Arc::new(HttpTransport::new()))
    }

    /// Client over an explicitly injected transport.
    pub fn with_transport(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("accept".to_string(), "application/json".to_string());
        FetchClient {
            transport,
            base_url: utils::remove_trailing_slash(base_url).to_string(),
            headers: RwLock::new(headers),
            auth: RwLock::new(None),
            on_request: RwLock::new(None),
            on_response: RwLock::new(None),
            last_response: Mutex::new(None),
        }
    }

    /// Set or remove the `accept-language` default header.
    pub fn with_lang(self, locale: Option<&str>) -> Self {
        match locale {
            Some(locale) => {
                self.headers
                    .write()
                    .insert("accept-language".to_string(), locale.to_string());
            }
            None => {
                self.headers.write().remove("accept-language");
            }
        }
        self
    }

    /// Merge headers into the defaults, lower-casing the keys.
    pub fn with_headers<K, V>(self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        {
            let mut defaults = self.headers.write();
            for (key, value) in headers {
                defaults.insert(key.as_ref().to_ascii_lowercase(), value.into());
            }
        }
        self
    }

    /// Set a single default header, or remove it when `value` is `None` or
    /// empty.
    pub fn set_header(&self, key: &str, value: Option<&str>) {
        let key = key.to_ascii_lowercase();
        match value {
            Some(value) if !value.is_empty() => {
                self.headers.write().insert(key, value.to_string());
            }
            _ => {
                self.headers.write().remove(&key);
            }
        }
    }

    /// Install an auth callback.
    ///
    /// The callback is awaited on every request and its result placed in the
    /// `authorization` header, overriding any default or per-call value.
    pub fn with_auth_callback<F, Fut>(self, callback: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<String, TransportError>> + Send + 'static,
    {
        *self.auth.write() = Some(Arc::new(move || callback().boxed()));
        self
    }

    /// Install or clear the auth callback at runtime.
    pub fn set_auth_callback(&self, callback: Option<AuthCallback>) {
        *self.auth.write() = callback;
    }

    /// Install a callback observing each assembled request.
    pub fn with_request_observer(self, observer: impl Fn(&RequestInit) + Send + Sync + 'static) -> Self {
        *self.on_request.write() = Some(Arc::new(observer));
        self
    }

    /// Install a callback observing each received response.
    pub fn with_response_observer(self, observer: impl Fn(&Response) + Send + Sync + 'static) -> Self {
        *self.on_response.write() = Some(Arc::new(observer));
        self
    }

    /// The raw response of the most recent call, if any completed transport
    /// exchange happened since construction.
    pub fn last_response(&self) -> Option<Response> {
        self.last_response.lock().clone()
    }
}

#[async_trait]
impl ClientBase for FetchClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    fn default_headers(&self) -> BTreeMap<String, String> {
        self.headers.read().clone()
    }

    async fn transmit(&self, init: &mut RequestInit) -> Result<Response> {
        self.last_response.lock().take();

        let auth = self.auth.read().clone();
        if let Some(auth) = auth.as_deref() {
            let value = auth().await.map_err(FetchError::auth)?;
            init.set_header("authorization", value);
        }

        let on_request = self.on_request.read().clone();
        if let Some(observer) = on_request.as_deref() {
            observer(init);
        }

        let response = send_over(self.transport.as_ref(), init).await?;
        *self.last_response.lock() = Some(response.clone());

        let on_response = self.on_response.read().clone();
        if let Some(observer) = on_response.as_deref() {
            observer(&response);
        }
        Ok(response)
    }
}
