//! Scoped sub-resources.
//!
//! An [`ApiTopic`] namespaces a group of endpoints under a fixed sub-path of
//! a parent client. It is purely a path-prefixing view: transport, default
//! headers, auth, and observers all belong to the parent and are reached by
//! delegation, so a topic never needs re-authenticating or re-configuring.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::client::base::ClientBase;
use crate::client::{Payload, ResponseReader};
use crate::error::Result;
use crate::transport::{Response, Transport};
use crate::types::RequestInit;

/// A path-prefixed view over a parent client.
///
/// The base URL is resolved once at construction by joining the parent's
/// base URL with the sub-path. Multiple topics created from one facade are
/// independent objects observing the same mutable default headers; topics
/// nest, since any [`ClientBase`] can be a parent.
///
/// # Examples
///
/// ```ignore
/// use std::sync::Arc;
/// use fetch_client::{ApiTopic, ClientBase, FetchClient, RequestParams};
///
/// let client = Arc::new(FetchClient::new("https://api.example.com/v1"));
/// let users = ApiTopic::new(client.clone(), "/users");
/// // GET https://api.example.com/v1/users/42
/// let user = users.get("/42", RequestParams::new()).await?;
/// ```
pub struct ApiTopic {
    client: Arc<dyn ClientBase>,
    base_url: String,
}

impl ApiTopic {
    /// Scope `base_path` under the parent client.
    pub fn new(client: Arc<dyn ClientBase>, base_path: &str) -> Self {
        let base_url = client.url_for(base_path);
        ApiTopic { client, base_url }
    }

    /// The parent client.
    pub fn client(&self) -> &Arc<dyn ClientBase> {
        &self.client
    }
}

#[async_trait]
impl ClientBase for ApiTopic {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transport(&self) -> &Arc<dyn Transport> {
        self.client.transport()
    }

    fn default_headers(&self) -> BTreeMap<String, String> {
        self.client.default_headers()
    }

    async fn transmit(&self, init: &mut RequestInit) -> Result<Response> {
        self.client.transmit(init).await
    }

    async fn resolve_payload(&self, response: &Response, reader: &ResponseReader) -> Payload {
        self.client.resolve_payload(response, reader).await
    }
}
