//! Email verification.
//!
//! `POST /auth/email/verify` on behalf of the signed-in user. Once accepted,
//! the authenticated user is refetched so the stored profile reflects the
//! verified address. A failed refetch never blocks the redirect.

use super::{Mutation, payload_body};
use crate::config::AuthConfig;
use crate::environment::MutationEnvironment;
use crate::providers::SessionStore;
use crate::state::Redirect;
use backoffice_core::{ApiRequest, ApiResponse, FormPayload, HttpTransport, TransportFailure};
use std::future::Future;

/// Remote verification path.
pub const VERIFY_PATH: &str = "/auth/email/verify";

/// Remote path of the authenticated user.
pub const CURRENT_USER_PATH: &str = "/auth/me";

/// Email verification mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyEmail {
    redirect: Redirect,
}

impl VerifyEmail {
    /// Verification redirecting to `config.verify_redirect`.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            redirect: Redirect::new(config.verify_redirect.clone()),
        }
    }
}

impl Mutation for VerifyEmail {
    fn name(&self) -> &'static str {
        "verify_email"
    }

    fn request(&self, payload: &FormPayload) -> ApiRequest {
        ApiRequest::post(VERIFY_PATH).with_body(payload_body(payload))
    }

    fn authenticated(&self) -> bool {
        true
    }

    fn on_success<T, S>(
        &self,
        _response: ApiResponse,
        env: &MutationEnvironment<T, S>,
    ) -> impl Future<Output = Result<Redirect, TransportFailure>> + Send
    where
        T: HttpTransport + Clone,
        S: SessionStore + Clone,
    {
        let redirect = self.redirect.clone();

        async move {
            let mut request = ApiRequest::get(CURRENT_USER_PATH);
            if let Some(token) = env.sessions.current_token().await {
                request = request.with_bearer(token);
            }

            match env.transport.request(request).await {
                Ok(response) => {
                    if let Err(e) = env.sessions.store_profile(response.data).await {
                        tracing::warn!(error = %e, "Failed to store refreshed profile");
                    }
                }
                Err(failure) => {
                    tracing::warn!(status = ?failure.status, "Failed to refetch authenticated user");
                }
            }

            Ok(redirect)
        }
    }
}
