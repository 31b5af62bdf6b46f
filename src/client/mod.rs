//! HTTP client surface.
//!
//! This module provides the request/response pipeline and the concrete
//! entry points built on top of it.
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── base   - ClientBase, the request/response pipeline and its hooks
//! ├── fetch  - FetchClient, the configurable facade
//! ├── topic  - ApiTopic, path-scoped sub-resources
//! └── reader - Payload and response-reading strategies
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ClientBase`] | Pipeline trait with overridable send/interpret hooks |
//! | [`FetchClient`] | Top-level client owning headers, auth, and observers |
//! | [`ApiTopic`] | Path-prefixing view sharing a parent's configuration |
//! | [`Payload`] | Resolved payload of a completed exchange |
//! | [`ResponseReader`] | Tagged payload-resolution strategy |

mod base;
mod fetch;
mod reader;
mod topic;

pub use base::ClientBase;
pub use fetch::{AuthCallback, FetchClient, RequestObserver, ResponseObserver};
pub use reader::{read_json_payload, CustomReader, Payload, ResponseReader};
pub use topic::ApiTopic;
