//! Error types for the remote API client

use thiserror::Error;

/// Errors raised while setting up the client.
///
/// Call failures are never reported here; they surface as
/// [`backoffice_core::TransportFailure`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// An environment variable held an unusable value
    #[error("Invalid value for {name}: {value}")]
    InvalidEnv {
        /// Variable name
        name: &'static str,
        /// Raw value
        value: String,
    },

    /// The base URL is not absolute
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// The underlying HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}
