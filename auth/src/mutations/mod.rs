//! Concrete remote mutations.
//!
//! A [`Mutation`] describes one form submission against the remote API: the
//! request it issues and what happens after the API accepts it. The state
//! machine around it lives in [`MutationReducer`](crate::reducers::MutationReducer).

use crate::environment::MutationEnvironment;
use crate::providers::SessionStore;
use crate::state::Redirect;
use backoffice_core::{ApiRequest, ApiResponse, FormPayload, HttpTransport, TransportFailure};
use serde_json::{Map, Value};
use std::future::Future;

pub mod login;
pub mod verify_email;

pub use login::Login;
pub use verify_email::VerifyEmail;

/// One kind of form submission.
pub trait Mutation: Send + Sync + 'static {
    /// Short name used in logs and metric labels.
    fn name(&self) -> &'static str;

    /// Request issued for a submitted payload.
    fn request(&self, payload: &FormPayload) -> ApiRequest;

    /// Whether the current session token is sent as a bearer token.
    fn authenticated(&self) -> bool {
        false
    }

    /// Side effect run after the API accepted the submission.
    ///
    /// Returns where to navigate next. An `Err` turns the invocation into a
    /// failure even though the remote call succeeded.
    fn on_success<T, S>(
        &self,
        response: ApiResponse,
        env: &MutationEnvironment<T, S>,
    ) -> impl Future<Output = Result<Redirect, TransportFailure>> + Send
    where
        T: HttpTransport + Clone,
        S: SessionStore + Clone;
}

/// JSON object body built from a form payload.
#[must_use]
pub fn payload_body(payload: &FormPayload) -> Value {
    Value::Object(
        payload
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect::<Map<String, Value>>(),
    )
}
