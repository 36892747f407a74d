//! Mutation environment.
//!
//! Dependency injection for mutation reducers.

use crate::providers::SessionStore;
use backoffice_core::HttpTransport;

/// Mutation environment.
///
/// Contains all external dependencies needed by mutation reducers.
///
/// # Type Parameters
///
/// - `T`: HTTP transport to the remote API
/// - `S`: Session store
#[derive(Debug, Clone)]
pub struct MutationEnvironment<T, S>
where
    T: HttpTransport + Clone,
    S: SessionStore + Clone,
{
    /// Remote API transport.
    pub transport: T,

    /// Session store.
    pub sessions: S,
}

impl<T, S> MutationEnvironment<T, S>
where
    T: HttpTransport + Clone,
    S: SessionStore + Clone,
{
    /// Create a new mutation environment.
    #[must_use]
    pub const fn new(transport: T, sessions: S) -> Self {
        Self {
            transport,
            sessions,
        }
    }
}
