//! Hard failures of the web layer.
//!
//! Only a broken address (undecodable query, rejected search parameters) or
//! an internal fault becomes an [`AppError`]. Failed remote calls are answered
//! with an [`ActionOutcome`](backoffice_core::ActionOutcome) instead.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use backoffice_core::{IssueReason, QueryDecodeError, SearchValidationError};
use serde::Serialize;
use std::fmt;

/// Code sent when the address fails the search schema.
pub const INVALID_SEARCH_PARAMS: &str = "INVALID_SEARCH_PARAMS";

/// Code sent when the query string cannot be decoded.
pub const INVALID_QUERY: &str = "INVALID_QUERY";

/// Code sent for internal faults.
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

/// Handler error rendered as a JSON body `{ code, message, issues? }`.
///
/// ```ignore
/// async fn handler(AddressQuery(params): AddressQuery) -> Result<Json<Page>, AppError> {
///     let search = SearchSchema::validate(&params)?;
///     Ok(Json(load(search).await))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
    issues: Vec<IssueResponse>,
    /// Logged, never sent.
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Error with an explicit status and code.
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            issues: Vec::new(),
            source: None,
        }
    }

    /// `500` hiding `source` behind a generic message.
    #[must_use]
    pub fn internal(source: anyhow::Error) -> Self {
        Self {
            source: Some(source),
            ..Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR,
                "An internal error occurred",
            )
        }
    }

    /// Response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Rejected parameters, empty unless the search schema failed.
    #[must_use]
    pub fn issues(&self) -> &[IssueResponse] {
        &self.issues
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.status.as_u16(), self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let source: &(dyn std::error::Error + 'static) = self.source.as_ref()?.as_ref();
        Some(source)
    }
}

/// One rejected parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueResponse {
    /// Parameter name.
    pub field: String,
    /// Human-readable reason.
    pub message: String,
    /// Machine-readable reason.
    pub reason: IssueReason,
}

#[derive(Serialize)]
struct Body<'a> {
    code: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    issues: &'a [IssueResponse],
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match (&self.source, self.status.is_server_error()) {
            (Some(source), _) => {
                tracing::error!(status = %self.status, code = self.code, error = %source, "Request failed");
            }
            (None, true) => {
                tracing::error!(status = %self.status, code = self.code, message = %self.message, "Request failed");
            }
            (None, false) => {
                tracing::debug!(status = %self.status, code = self.code, "Request rejected");
            }
        }

        let body = Body {
            code: self.code,
            message: &self.message,
            issues: &self.issues,
        };
        (self.status, Json(body)).into_response()
    }
}

/// A malformed address is a broken link, surfaced as a hard 400.
impl From<SearchValidationError> for AppError {
    fn from(err: SearchValidationError) -> Self {
        let issues = err
            .issues
            .into_iter()
            .map(|issue| IssueResponse {
                message: issue.reason.to_string(),
                field: issue.field,
                reason: issue.reason,
            })
            .collect();

        Self {
            issues,
            ..Self::new(
                StatusCode::BAD_REQUEST,
                INVALID_SEARCH_PARAMS,
                "Invalid search parameters",
            )
        }
    }
}

impl From<QueryDecodeError> for AppError {
    fn from(err: QueryDecodeError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, INVALID_QUERY, err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err)
    }
}
