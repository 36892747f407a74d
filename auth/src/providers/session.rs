//! Session store trait.

use crate::error::Result;
use std::future::Future;

/// Authenticated-user data as returned by `GET /auth/me`.
pub type UserProfile = serde_json::Value;

/// Session store.
///
/// Holds the token obtained by a login and the profile of the authenticated
/// user. How either is persisted is up to the implementation.
pub trait SessionStore: Send + Sync {
    /// Store the session token.
    ///
    /// # Errors
    ///
    /// Returns error if the backend refuses the write.
    fn store_token(&self, token: String) -> impl Future<Output = Result<()>> + Send;

    /// Token of the current session, if any.
    fn current_token(&self) -> impl Future<Output = Option<String>> + Send;

    /// Store a freshly fetched user profile.
    ///
    /// # Errors
    ///
    /// Returns error if the backend refuses the write.
    fn store_profile(&self, profile: UserProfile) -> impl Future<Output = Result<()>> + Send;
}
