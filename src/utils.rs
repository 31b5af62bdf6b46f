//! URL joining and query-string utilities.
//!
//! These helpers are pure string functions with no client state: they join a
//! base URL with a path, normalize trailing slashes, and serialize a flat
//! key/value mapping into a percent-encoded query string.
//!
//! # Examples
//!
//! ```
//! use fetch_client::utils::{build_query_string, join, QueryMap};
//!
//! assert_eq!(join("http://x/api/", "/users"), "http://x/api/users");
//!
//! let mut query = QueryMap::new();
//! query.insert("active".to_string(), true.into());
//! query.insert("id".to_string(), vec![1, 2].into());
//! assert_eq!(build_query_string(&query), "active=true&id=1&id=2");
//! ```

use std::collections::BTreeMap;

use url::form_urlencoded;

/// Flat key → value mapping serialized by [`build_query_string`].
///
/// A `BTreeMap` keeps serialization order deterministic.
pub type QueryMap = BTreeMap<String, QueryValue>;

/// A single query-string value.
///
/// Covers the primitive shapes a query parameter can take. List values are
/// flattened into one `key=value` pair per element, so
/// `id: [1, 2]` serializes as `id=1&id=2`. Absent parameters are expressed by
/// not inserting the key at all.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// A string value, percent-encoded on serialization.
    String(String),
    /// An integer value.
    Int(i64),
    /// A floating point value.
    Float(f64),
    /// A boolean value, serialized as `true` or `false`.
    Bool(bool),
    /// A list of values flattened into repeated keys.
    List(Vec<QueryValue>),
}

impl QueryValue {
    fn append_to(&self, key: &str, out: &mut form_urlencoded::Serializer<'static, String>) {
        match self {
            QueryValue::String(value) => {
                out.append_pair(key, value);
            }
            QueryValue::Int(value) => {
                out.append_pair(key, &value.to_string());
            }
            QueryValue::Float(value) => {
                out.append_pair(key, &value.to_string());
            }
            QueryValue::Bool(value) => {
                out.append_pair(key, if *value { "true" } else { "false" });
            }
            QueryValue::List(values) => {
                for value in values {
                    value.append_to(key, out);
                }
            }
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::String(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::String(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        QueryValue::Int(value.into())
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Int(value.into())
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        QueryValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Join a base URL and a path with exactly one `/` between them.
///
/// An empty path returns the base unchanged (minus trailing slashes).
pub fn join(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

/// Strip trailing `/` characters from a URL.
pub fn remove_trailing_slash(url: &str) -> &str {
    url.trim_end_matches('/')
}

/// Serialize a query mapping into a percent-encoded query string.
///
/// The leading `?` is not included. An empty mapping produces an empty
/// string.
pub fn build_query_string(query: &QueryMap) -> String {
    let mut out = form_urlencoded::Serializer::new(String::new());
    for (key, value) in query {
        value.append_to(key, &mut out);
    }
    out.finish()
}
