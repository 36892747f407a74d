//! One-shot invocation of a mutation.

use crate::actions::MutationAction;
use crate::environment::MutationEnvironment;
use crate::mutations::Mutation;
use crate::providers::SessionStore;
use crate::reducers::{MutationReducer, unfinished_outcome};
use crate::state::{MutationResult, MutationState};
use backoffice_core::{FormPayload, HttpTransport};
use backoffice_runtime::Store;
use std::sync::Arc;

/// A mutation bound to its environment.
///
/// Every [`invoke`](RemoteMutation::invoke) runs a fresh store starting from
/// `Idle`, so each invocation performs exactly one network attempt. Retrying
/// means invoking again.
///
/// # Example
///
/// ```rust,ignore
/// let login = RemoteMutation::new(Login::new(&config), MutationEnvironment::new(client, session));
///
/// match login.invoke(payload).await {
///     MutationResult::Redirect { to } => { /* navigate */ }
///     MutationResult::Rejected { outcome } => { /* re-render the form */ }
/// }
/// ```
#[derive(Debug)]
pub struct RemoteMutation<M, T, S>
where
    T: HttpTransport + Clone,
    S: SessionStore + Clone,
{
    mutation: Arc<M>,
    environment: MutationEnvironment<T, S>,
}

impl<M, T, S> RemoteMutation<M, T, S>
where
    M: Mutation,
    T: HttpTransport + Clone + 'static,
    S: SessionStore + Clone + 'static,
{
    /// Bind `mutation` to `environment`.
    #[must_use]
    pub fn new(mutation: M, environment: MutationEnvironment<T, S>) -> Self {
        Self {
            mutation: Arc::new(mutation),
            environment,
        }
    }

    /// The environment used by every invocation.
    #[must_use]
    pub const fn environment(&self) -> &MutationEnvironment<T, S> {
        &self.environment
    }

    /// Submit `payload` and run the mutation to a terminal state.
    pub async fn invoke(&self, payload: FormPayload) -> MutationResult {
        let store = Store::new(
            MutationState::Idle,
            MutationReducer::from_arc(Arc::clone(&self.mutation)),
            self.environment.clone(),
        );

        store.send(MutationAction::Submit { payload }).await;

        store
            .state(|state| match state {
                MutationState::Succeeded { redirect } => MutationResult::Redirect {
                    to: redirect.clone(),
                },
                MutationState::Failed { outcome } => MutationResult::Rejected {
                    outcome: outcome.clone(),
                },
                other => {
                    tracing::error!(
                        mutation = self.mutation.name(),
                        state = other.name(),
                        "Mutation stopped before reaching a terminal state"
                    );
                    MutationResult::Rejected {
                        outcome: unfinished_outcome(),
                    }
                }
            })
            .await
    }
}
