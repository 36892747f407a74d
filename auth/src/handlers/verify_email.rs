//! Email verification form handler.

use super::{AuthAppState, mutation_response};
use crate::environment::MutationEnvironment;
use crate::mutations::VerifyEmail;
use crate::remote::RemoteMutation;
use axum::{Form, extract::State, http::HeaderMap, response::Response};
use backoffice_core::{FormPayload, HttpTransport};
use backoffice_web::CorrelationId;

/// Confirm an email address with the submitted verification data.
///
/// The current session cookie, if any, authenticates the refetch of the
/// user profile that follows a successful verification.
///
/// # Responses
///
/// - `303 See Other` to the verification redirect, with the refreshed user
///   profile as JSON when the refetch succeeded
/// - the outcome JSON otherwise, status as for [`login`](super::login)
pub async fn verify_email<T>(
    State(state): State<AuthAppState<T>>,
    correlation_id: CorrelationId,
    headers: HeaderMap,
    Form(payload): Form<FormPayload>,
) -> Response
where
    T: HttpTransport + Clone + 'static,
{
    let session = state.session(&headers);
    let mutation = RemoteMutation::new(
        VerifyEmail::new(&state.config),
        MutationEnvironment::new(state.transport.clone(), session.clone()),
    );

    let result = mutation.invoke(payload).await;
    let profile = session.profile();
    tracing::debug!(
        correlation_id = %correlation_id.0,
        redirected = result.redirect().is_some(),
        profile_refreshed = profile.is_some(),
        "Email verification finished"
    );

    mutation_response(result, None, profile)
}
