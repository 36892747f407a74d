//! Login form handler.

use super::{AuthAppState, mutation_response};
use crate::environment::MutationEnvironment;
use crate::mutations::Login;
use crate::remote::RemoteMutation;
use axum::{Form, extract::State, http::HeaderMap, response::Response};
use backoffice_core::{FormPayload, HttpTransport};
use backoffice_web::CorrelationId;

/// Log in with the submitted credentials.
///
/// # Endpoint
///
/// ```text
/// POST /login
/// Content-Type: application/x-www-form-urlencoded
///
/// email=admin%40example.com&password=...
/// ```
///
/// # Responses
///
/// - `303 See Other` to the login redirect, with an `HttpOnly` session cookie
/// - `4xx` with the outcome JSON when the API rejected the credentials
/// - `502 Bad Gateway` with the outcome JSON for server and network failures
pub async fn login<T>(
    State(state): State<AuthAppState<T>>,
    correlation_id: CorrelationId,
    headers: HeaderMap,
    Form(payload): Form<FormPayload>,
) -> Response
where
    T: HttpTransport + Clone + 'static,
{
    tracing::debug!(correlation_id = %correlation_id.0, fields = payload.len(), "Login submitted");

    let session = state.session(&headers);
    let mutation = RemoteMutation::new(
        Login::new(&state.config),
        MutationEnvironment::new(state.transport.clone(), session.clone()),
    );

    let result = mutation.invoke(payload).await;
    if let Some(outcome) = result.outcome() {
        tracing::info!(
            correlation_id = %correlation_id.0,
            code = ?outcome.code(),
            "Login rejected"
        );
    }

    mutation_response(result, state.issued_cookie(&session), None)
}
