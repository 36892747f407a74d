//! HTTP status for rendered outcomes.

use axum::http::StatusCode;
use backoffice_core::{ActionOutcome, CodeType};

/// Status used when answering with an [`ActionOutcome`].
///
/// Successes and client errors keep the upstream status. Everything else
/// (server errors, unknown or unexpected families) is a `502 Bad Gateway`:
/// the console is fine, the remote API is not.
#[must_use]
pub fn outcome_status(outcome: &ActionOutcome) -> StatusCode {
    let upstream = outcome.code().and_then(|code| StatusCode::from_u16(code).ok());
    match (outcome.code_type(), upstream) {
        (CodeType::Success | CodeType::Client, Some(status)) => status,
        _ => StatusCode::BAD_GATEWAY,
    }
}
