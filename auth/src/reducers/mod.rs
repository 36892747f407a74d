//! Mutation reducer.
//!
//! One state machine drives every [`Mutation`]:
//!
//! 1. `Submit` in `Idle`: keep the payload, issue exactly one remote call
//! 2. `Responded(Err)`: normalize the failure, attaching the payload
//! 3. `Responded(Ok)`: run the mutation's success side effect
//! 4. `Finished`: terminal `Succeeded` or `Failed`
//!
//! Anything arriving out of order is ignored and logged. In particular a
//! second `Submit` never starts another call while one is outstanding, and a
//! terminal state never changes again.

use crate::actions::MutationAction;
use crate::environment::MutationEnvironment;
use crate::mutations::Mutation;
use crate::providers::SessionStore;
use crate::state::MutationState;
use backoffice_core::effect::Effect;
use backoffice_core::reducer::Reducer;
use backoffice_core::{
    ActionOutcome, CodeType, FormPayload, HttpTransport, OutcomeBuilder, SmallVec,
    TransportFailure, smallvec,
};
use backoffice_runtime::metrics::MutationMetrics;
use std::marker::PhantomData;
use std::sync::Arc;

/// Reducer for one [`Mutation`].
#[derive(Debug)]
pub struct MutationReducer<M, T, S> {
    mutation: Arc<M>,
    _phantom: PhantomData<fn() -> (T, S)>,
}

impl<M, T, S> MutationReducer<M, T, S>
where
    M: Mutation,
{
    /// Create a reducer for `mutation`.
    #[must_use]
    pub fn new(mutation: M) -> Self {
        Self::from_arc(Arc::new(mutation))
    }

    /// Create a reducer sharing an existing mutation.
    #[must_use]
    pub const fn from_arc(mutation: Arc<M>) -> Self {
        Self {
            mutation,
            _phantom: PhantomData,
        }
    }

    /// The mutation this reducer drives.
    #[must_use]
    pub fn mutation(&self) -> &M {
        &self.mutation
    }

    fn fail(&self, state: &mut MutationState, failure: &TransportFailure, payload: FormPayload) {
        let outcome = OutcomeBuilder::from_failure(failure, Some(payload));
        tracing::warn!(
            mutation = self.mutation.name(),
            status = ?outcome.code(),
            code_type = %outcome.code_type(),
            "Mutation failed"
        );
        MutationMetrics::record_outcome(self.mutation.name(), outcome.code_type());
        *state = MutationState::Failed { outcome };
    }

    /// Take the payload out of `InFlight`, or restore the state and return `None`.
    fn take_in_flight(&self, state: &mut MutationState, action: &'static str) -> Option<FormPayload> {
        match std::mem::take(state) {
            MutationState::InFlight { payload } => Some(payload),
            other => {
                tracing::warn!(
                    mutation = self.mutation.name(),
                    state = other.name(),
                    action,
                    "Ignoring action outside in-flight state"
                );
                *state = other;
                None
            }
        }
    }
}

impl<M, T, S> Reducer for MutationReducer<M, T, S>
where
    M: Mutation,
    T: HttpTransport + Clone + 'static,
    S: SessionStore + Clone + 'static,
{
    type State = MutationState;
    type Action = MutationAction;
    type Environment = MutationEnvironment<T, S>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            MutationAction::Submit { payload } => {
                if !matches!(state, MutationState::Idle) {
                    tracing::warn!(
                        mutation = self.mutation.name(),
                        state = state.name(),
                        "Ignoring submit, mutation already started"
                    );
                    return SmallVec::new();
                }

                let request = self.mutation.request(&payload);
                let authenticated = self.mutation.authenticated();
                tracing::debug!(
                    mutation = self.mutation.name(),
                    method = %request.method,
                    path = %request.path,
                    "Submitting mutation"
                );
                *state = MutationState::InFlight { payload };

                let env = env.clone();
                smallvec![Effect::future(async move {
                    let mut request = request;
                    if authenticated {
                        if let Some(token) = env.sessions.current_token().await {
                            request = request.with_bearer(token);
                        }
                    }
                    let result = env.transport.request(request).await;
                    Some(MutationAction::Responded { result })
                })]
            }

            MutationAction::Responded { result } => match result {
                Ok(response) => {
                    if !state.is_in_flight() {
                        tracing::warn!(
                            mutation = self.mutation.name(),
                            state = state.name(),
                            "Ignoring response outside in-flight state"
                        );
                        return SmallVec::new();
                    }
                    tracing::debug!(
                        mutation = self.mutation.name(),
                        status = response.status,
                        "Mutation accepted, running side effect"
                    );

                    let mutation = Arc::clone(&self.mutation);
                    let env = env.clone();
                    smallvec![Effect::future(async move {
                        let result = mutation.on_success(response, &env).await;
                        Some(MutationAction::Finished { result })
                    })]
                }
                Err(failure) => {
                    if let Some(payload) = self.take_in_flight(state, "responded") {
                        self.fail(state, &failure, payload);
                    }
                    SmallVec::new()
                }
            },

            MutationAction::Finished { result } => {
                let Some(payload) = self.take_in_flight(state, "finished") else {
                    return SmallVec::new();
                };
                match result {
                    Ok(redirect) => {
                        tracing::info!(
                            mutation = self.mutation.name(),
                            redirect = %redirect,
                            "Mutation succeeded"
                        );
                        MutationMetrics::record_outcome(self.mutation.name(), CodeType::Success);
                        *state = MutationState::Succeeded { redirect };
                    }
                    Err(failure) => self.fail(state, &failure, payload),
                }
                SmallVec::new()
            }
        }
    }
}

/// Outcome used when a store stops without reaching a terminal state.
pub(crate) fn unfinished_outcome() -> ActionOutcome {
    OutcomeBuilder::from_failure(&TransportFailure::network(), None)
}
