//! Domain types for outgoing calls.
//!
//! This module defines:
//! - [`CallId`] - Unique identifier for an in-flight call
//! - [`Method`] - HTTP-style method of a call
//! - [`ApiCall`] - Immutable record of what a call needs to be retried

use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an in-flight call.
///
/// Assigned when the call is constructed. The id is the handle for
/// cancelling a call that is parked behind an in-flight renewal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallId(Uuid);

impl CallId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// HTTP-style method of an outgoing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Get the method as an uppercase string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An outgoing call, recorded with everything needed to retry it.
///
/// The method, path, and body are opaque to the coordination layer; only
/// the transport interprets them. A descriptor is immutable once created
/// and keeps its [`CallId`] across retries.
///
/// # Examples
///
/// ```
/// use authrelay_core::ApiCall;
/// use serde_json::json;
///
/// let list = ApiCall::get("/bills");
/// let create = ApiCall::post("/bills").with_body(json!({ "amount": 125 }));
/// assert_ne!(list.id(), create.id());
/// ```
#[derive(Debug, Clone)]
pub struct ApiCall {
    id: CallId,

    /// Method of the call.
    pub method: Method,

    /// Target path, interpreted by the transport.
    pub path: String,

    /// Optional body, passed to the transport untouched.
    pub body: Option<Value>,
}

impl ApiCall {
    /// Create a call with a fresh id and no body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            id: CallId::new(),
            method,
            path: path.into(),
            body: None,
        }
    }

    /// Shorthand for a GET call.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Shorthand for a POST call.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// Shorthand for a PUT call.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    /// Shorthand for a DELETE call.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach a body to the call.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// The call's unique id.
    pub fn id(&self) -> CallId {
        self.id
    }
}
