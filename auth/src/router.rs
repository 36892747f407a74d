//! Mutation router composition.

use crate::handlers::{AuthAppState, login, verify_email};
use axum::{Router, routing::post};
use backoffice_core::HttpTransport;

/// Router with every mutation endpoint.
///
/// # Routes
///
/// - `POST /login` - Log in, set the session cookie
/// - `POST /verify-email` - Confirm an email address
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .merge(auth_router(AuthAppState::new(client, AuthConfig::default())))
///     .layer(correlation_id_layer());
/// ```
pub fn auth_router<T>(state: AuthAppState<T>) -> Router
where
    T: HttpTransport + Clone + 'static,
{
    Router::new()
        .route("/login", post(login::<T>))
        .route("/verify-email", post(verify_email::<T>))
        .with_state(state)
}
