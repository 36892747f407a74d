//! Application state for Axum handlers.

use backoffice_core::HttpTransport;

/// State shared by the list-view handlers.
///
/// # Type Parameters
///
/// - `T`: HTTP transport to the remote API
#[derive(Debug, Clone)]
pub struct AppState<T>
where
    T: HttpTransport + Clone,
{
    /// Remote API transport.
    pub transport: T,
}

impl<T> AppState<T>
where
    T: HttpTransport + Clone,
{
    /// Create a new application state.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }
}
