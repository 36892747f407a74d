//! Error types for session storage and mutation setup.

use backoffice_core::TransportFailure;
use thiserror::Error;

/// Result type alias for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors raised by session storage.
///
/// Remote call failures never appear here: they are
/// [`TransportFailure`] values and end up in
/// an [`ActionOutcome`](backoffice_core::ActionOutcome).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The session backend refused the write.
    #[error("Session storage failed: {0}")]
    SessionStorage(String),

    /// A successful login answer carried no token.
    #[error("Login response did not contain a token")]
    MissingToken,
}

impl AuthError {
    /// Returns `true` if the remote API answered with something unusable.
    ///
    /// # Examples
    ///
    /// ```
    /// # use backoffice_auth::AuthError;
    /// assert!(AuthError::MissingToken.is_protocol_error());
    /// assert!(!AuthError::SessionStorage("down".into()).is_protocol_error());
    /// ```
    #[must_use]
    pub const fn is_protocol_error(&self) -> bool {
        matches!(self, Self::MissingToken)
    }

    /// Log the error and turn it into a status-less failure, so the caller
    /// sees the generic fallback message instead of internals.
    #[must_use]
    pub fn into_failure(self) -> TransportFailure {
        if self.is_protocol_error() {
            tracing::warn!(error = %self, "Unusable answer from the remote API");
        } else {
            tracing::error!(error = %self, "Mutation side effect failed");
        }
        TransportFailure::network()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_failure_hides_details() {
        for error in [
            AuthError::MissingToken,
            AuthError::SessionStorage("disk full".to_string()),
        ] {
            let failure = error.into_failure();
            assert_eq!(failure.status, None);
            assert_eq!(failure.data.message, None);
        }
    }
}
