//! Contract with the remote back-office API.
//!
//! The transport is an external collaborator. The core only defines the
//! request/response shapes and the closed failure shape every transport must
//! report, so nothing downstream inspects untyped error objects.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use thiserror::Error;

/// Field name → ordered validation messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Submitted form data, field name → value.
pub type FormPayload = BTreeMap<String, String>;

/// HTTP method used against the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Uppercase method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
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
        f.write_str(self.as_str())
    }
}

/// One call against the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    /// Method.
    pub method: Method,
    /// Path relative to the API base URL, including any query string.
    pub path: String,
    /// Optional JSON body.
    pub body: Option<Value>,
    /// Extra headers.
    pub headers: Vec<(String, String)>,
    /// Bearer token sent as `Authorization`.
    pub bearer: Option<String>,
}

impl ApiRequest {
    /// Create a request without body or headers.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Vec::new(),
            bearer: None,
        }
    }

    /// `GET path`.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// `POST path`.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a bearer token.
    #[must_use]
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

/// Successful (2xx) response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// HTTP status.
    pub status: u16,
    /// Parsed JSON body (`null` when empty).
    pub data: Value,
}

impl ApiResponse {
    /// Create a response.
    #[must_use]
    pub const fn new(status: u16, data: Value) -> Self {
        Self { status, data }
    }

    /// The body's `message` field, if it is a string.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.data.get("message").and_then(Value::as_str)
    }
}

/// Body carried by a failed call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureBody {
    /// Human-readable message from the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Field-level validation errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

/// A failed call: an HTTP error status, or no status at all for
/// network-level failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("remote call failed (status {})", display_status(.status))]
pub struct TransportFailure {
    /// HTTP status, if the server answered.
    pub status: Option<u16>,
    /// Failure body.
    pub data: FailureBody,
}

impl TransportFailure {
    /// Failure with an HTTP status and body.
    #[must_use]
    pub const fn http(status: u16, data: FailureBody) -> Self {
        Self {
            status: Some(status),
            data,
        }
    }

    /// Failure without any server answer (connection refused, timeout, ...).
    #[must_use]
    pub fn network() -> Self {
        Self::default()
    }

    /// Builder: set the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.data.message = Some(message.into());
        self
    }

    /// Builder: add one field error.
    #[must_use]
    pub fn with_field_error(mut self, field: impl Into<String>, error: impl Into<String>) -> Self {
        self.data
            .errors
            .get_or_insert_with(FieldErrors::new)
            .entry(field.into())
            .or_default()
            .push(error.into());
        self
    }
}

fn display_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |code| code.to_string())
}

/// HTTP transport against the remote API.
///
/// # Implementation Notes
///
/// - 2xx responses are `Ok`, everything else is a [`TransportFailure`]
/// - Timeouts belong to the implementation, never to callers
/// - Exactly one network attempt per call; no retries
pub trait HttpTransport: Send + Sync {
    /// Perform one request.
    ///
    /// # Errors
    ///
    /// Returns [`TransportFailure`] for non-2xx answers and network failures.
    fn request(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportFailure>> + Send;
}
