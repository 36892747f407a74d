//! Credential login.
//!
//! `POST /auth/login` with the submitted credentials. The answer must carry a
//! `token`, which is stored in the session before redirecting.

use super::{Mutation, payload_body};
use crate::config::AuthConfig;
use crate::environment::MutationEnvironment;
use crate::error::AuthError;
use crate::providers::SessionStore;
use crate::state::Redirect;
use backoffice_core::{ApiRequest, ApiResponse, FormPayload, HttpTransport, TransportFailure};
use serde_json::Value;
use std::future::Future;

/// Remote login path.
pub const LOGIN_PATH: &str = "/auth/login";

/// Credential login mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login {
    redirect: Redirect,
}

impl Login {
    /// Login redirecting to `config.login_redirect`.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            redirect: Redirect::new(config.login_redirect.clone()),
        }
    }
}

impl Mutation for Login {
    fn name(&self) -> &'static str {
        "login"
    }

    fn request(&self, payload: &FormPayload) -> ApiRequest {
        ApiRequest::post(LOGIN_PATH).with_body(payload_body(payload))
    }

    fn on_success<T, S>(
        &self,
        response: ApiResponse,
        env: &MutationEnvironment<T, S>,
    ) -> impl Future<Output = Result<Redirect, TransportFailure>> + Send
    where
        T: HttpTransport + Clone,
        S: SessionStore + Clone,
    {
        let token = response
            .data
            .get("token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string);
        let redirect = self.redirect.clone();

        async move {
            let Some(token) = token else {
                tracing::debug!(status = response.status, "Login answer without a token");
                return Err(AuthError::MissingToken.into_failure());
            };

            env.sessions
                .store_token(token)
                .await
                .map_err(AuthError::into_failure)?;

            Ok(redirect)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::Method;

    #[test]
    fn test_login_request() {
        let login = Login::new(&AuthConfig::new().with_login_redirect("/dashboard"));
        let payload = FormPayload::from([("email".to_string(), "a@b.c".to_string())]);

        let request = login.request(&payload);

        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, LOGIN_PATH);
        assert_eq!(request.body, Some(serde_json::json!({"email": "a@b.c"})));
        assert!(!login.authenticated());
        assert_eq!(login.redirect, Redirect::new("/dashboard"));
    }
}
