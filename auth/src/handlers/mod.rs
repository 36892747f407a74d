//! HTTP handlers for the mutation endpoints.
//!
//! Each handler builds a per-request [`CookieSession`](crate::providers::CookieSession)
//! from the `Cookie` header, runs its mutation once through
//! [`RemoteMutation`](crate::remote::RemoteMutation) and turns the result into
//! a response:
//!
//! - redirect: `303 See Other` with `Location`, plus `Set-Cookie` when the
//!   mutation issued a session token and a JSON body when it refreshed the
//!   user profile
//! - rejection: the [`ActionOutcome`](backoffice_core::ActionOutcome) as JSON,
//!   with the upstream status for client errors and `502` otherwise

pub mod login;
pub mod verify_email;

pub use login::login;
pub use verify_email::verify_email;

use crate::config::AuthConfig;
use crate::providers::{CookieSession, SessionCookie, UserProfile};
use crate::state::MutationResult;
use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use backoffice_core::HttpTransport;
use backoffice_web::outcome_status;
use std::sync::Arc;

/// State shared by the mutation handlers.
#[derive(Debug, Clone)]
pub struct AuthAppState<T>
where
    T: HttpTransport + Clone,
{
    /// Remote API transport.
    pub transport: T,
    /// Redirect targets and cookie settings.
    pub config: Arc<AuthConfig>,
}

impl<T> AuthAppState<T>
where
    T: HttpTransport + Clone,
{
    /// Create the handler state.
    #[must_use]
    pub fn new(transport: T, config: AuthConfig) -> Self {
        Self {
            transport,
            config: Arc::new(config),
        }
    }

    /// Session seeded from the request's cookies.
    pub(crate) fn session(&self, headers: &HeaderMap) -> CookieSession {
        let cookie_header = headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok());
        CookieSession::from_cookie_header(cookie_header, &self.config.session_cookie)
    }

    /// `Set-Cookie` for a token issued during the request.
    pub(crate) fn issued_cookie(&self, session: &CookieSession) -> Option<SessionCookie> {
        session.issued_token().map(|token| {
            SessionCookie::new(self.config.session_cookie.clone(), token)
                .with_secure(self.config.cookie_secure)
                .with_same_site(self.config.cookie_same_site)
        })
    }
}

pub(crate) fn mutation_response(
    result: MutationResult,
    cookie: Option<SessionCookie>,
    profile: Option<UserProfile>,
) -> Response {
    match result {
        MutationResult::Redirect { to } => {
            let Ok(location) = HeaderValue::from_str(to.as_str()) else {
                tracing::error!(redirect = %to, "Redirect target is not a valid header value");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            };

            let headers = [(header::LOCATION, location)];
            let mut response = match profile {
                Some(profile) => (StatusCode::SEE_OTHER, headers, Json(profile)).into_response(),
                None => (StatusCode::SEE_OTHER, headers).into_response(),
            };
            if let Some(cookie) = cookie {
                match HeaderValue::from_str(&cookie.to_header_value()) {
                    Ok(value) => {
                        response.headers_mut().append(header::SET_COOKIE, value);
                    },
                    Err(_) => tracing::error!(cookie = %cookie.name, "Session cookie is not a valid header value"),
                }
            }
            response
        },
        MutationResult::Rejected { outcome } => (outcome_status(&outcome), Json(outcome)).into_response(),
    }
}
