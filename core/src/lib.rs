//! # Backoffice Core
//!
//! Functional core of the back-office console: everything between the
//! navigation subsystem, the remote API and the UI that has real invariants.
//!
//! ## Core Concepts
//!
//! - **Address**: shareable, bookmarkable query state of a list view ([`params`])
//! - **Search schema**: validation of the parameters every list view supports ([`search`])
//! - **Query-state binding**: typed pagination/sort state projected from the address ([`query_state`])
//! - **Status family**: classification of status codes ([`status`])
//! - **Action outcome**: normalized result of one remote call ([`outcome`])
//! - **Reducer / Effect**: state machines with explicit side-effect descriptions
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - The address is owned by the location service and injected, never global
//! - Transport failures are typed values, never untyped objects
//! - Explicit Effects (no hidden I/O)
//!
//! ## Data Flow
//!
//! ```text
//! UI event ─▶ QueryStateBinding::write_* ─▶ Location (address updated)
//!                                              │
//!              SearchSchema::validate ◀── read ┘
//!                        │
//!                        ▼
//!              HttpTransport::request ─▶ OutcomeBuilder ─▶ ActionOutcome ─▶ UI
//! ```

pub mod location;
pub mod outcome;
pub mod params;
pub mod query_state;
pub mod search;
pub mod status;
pub mod transport;

pub use location::{InMemoryLocation, Location};
pub use outcome::{ActionOutcome, FALLBACK_MESSAGE, InconsistentOutcome, OutcomeBuilder};
pub use params::{AddressParameters, AddressPatch, ParamValue, QueryDecodeError};
pub use query_state::{
    DEFAULT_PAGE, DEFAULT_PER_PAGE, Pagination, PaginationUpdate, QueryStateBinding, View,
};
pub use search::{FieldIssue, IssueReason, SearchParams, SearchSchema, SearchValidationError};
pub use smallvec::{SmallVec, smallvec};
pub use status::{CodeType, StatusFlags};
pub use transport::{
    ApiRequest, ApiResponse, FailureBody, FieldErrors, FormPayload, HttpTransport, Method,
    TransportFailure,
};

/// Reducer module - the core trait for state machines
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all decision logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for MutationReducer<Login> {
    ///     type State = MutationState;
    ///     type Action = MutationAction;
    ///     type Environment = MutationEnvironment<ApiClient, CookieSession>;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut MutationState,
    ///         action: MutationAction,
    ///         env: &Self::Environment,
    ///     ) -> SmallVec<[Effect<MutationAction>; 4]> {
    ///         match action {
    ///             MutationAction::Submit { payload } => { /* ... */ }
    ///             _ => SmallVec::new(),
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action against the current state
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution).
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store runtime.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::None => write!(f, "Effect::None"),
                Self::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap a future producing an optional feedback action
        pub fn future<F>(future: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Self::Future(Box::pin(future))
        }

        /// Whether this effect does nothing
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Self::None)
        }
    }
}
