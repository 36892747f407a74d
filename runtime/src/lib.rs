//! # Backoffice Runtime
//!
//! Runtime for reducers: the [`Store`] owns the state, feeds actions to the
//! reducer and executes the effects it returns.
//!
//! ## Scheduling
//!
//! Execution is cooperative and single-task. `send` processes the action, then
//! awaits each effect in order and feeds any action it produces back into the
//! reducer, until no work is left. No effect is ever spawned onto another task,
//! so when `send` returns the store is quiescent and `state` observes the final
//! result.
//!
//! ## Example
//!
//! ```ignore
//! let store = Store::new(MutationState::Idle, MutationReducer::new(Login::new(config)), env);
//!
//! store.send(MutationAction::Submit { payload }).await;
//!
//! let state = store.state(Clone::clone).await;
//! ```

use backoffice_core::effect::Effect;
use backoffice_core::reducer::Reducer;
use std::collections::VecDeque;
use std::marker::PhantomData;
use tokio::sync::RwLock;

pub mod metrics;

/// Store - owns state and drives the reducer.
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: RwLock<S>,
    reducer: R,
    environment: E,
    _action: PhantomData<fn(A)>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self {
            state: RwLock::new(initial_state),
            reducer,
            environment,
            _action: PhantomData,
        }
    }

    /// Send an action and run it to completion
    ///
    /// Returns the number of actions processed, including feedback actions
    /// produced by effects.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> usize {
        let mut queue = VecDeque::from([action]);
        let mut processed = 0;

        while let Some(action) = queue.pop_front() {
            tracing::trace!(queued = queue.len(), "Reducing action");
            let effects = {
                let mut state = self.state.write().await;
                self.reducer.reduce(&mut state, action, &self.environment)
            };
            processed += 1;
            ::metrics::counter!(crate::metrics::STORE_ACTIONS).increment(1);

            for effect in effects {
                match effect {
                    Effect::None => {}
                    Effect::Future(future) => {
                        if let Some(feedback) = future.await {
                            queue.push_back(feedback);
                        }
                    }
                }
            }
        }

        processed
    }

    /// Read the current state through a closure
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// The injected environment
    pub const fn environment(&self) -> &E {
        &self.environment
    }
}
