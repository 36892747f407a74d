//! Mock session store for testing.

use crate::error::{AuthError, Result};
use crate::providers::{SessionStore, UserProfile};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Inner {
    token: Option<String>,
    profiles: Vec<UserProfile>,
}

/// In-memory [`SessionStore`].
///
/// Clones share state. Writes can be made to fail with
/// [`MockSessionStore::fail_writes`]. A poisoned lock is recovered, as in
/// [`CookieSession`](crate::providers::CookieSession).
#[derive(Debug, Clone, Default)]
pub struct MockSessionStore {
    inner: Arc<Mutex<Inner>>,
    failing: Arc<AtomicBool>,
}

impl MockSessionStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store already holding `token`.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::default();
        store.lock().token = Some(token.into());
        store
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Token stored so far.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    /// Profiles stored so far, oldest first.
    #[must_use]
    pub fn profiles(&self) -> Vec<UserProfile> {
        self.lock().profiles.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, apply: impl FnOnce(&mut Inner)) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AuthError::SessionStorage("writes disabled".to_string()));
        }
        apply(&mut self.lock());
        Ok(())
    }
}

impl SessionStore for MockSessionStore {
    fn store_token(&self, token: String) -> impl Future<Output = Result<()>> + Send {
        let result = self.write(|inner| inner.token = Some(token));
        async move { result }
    }

    fn current_token(&self) -> impl Future<Output = Option<String>> + Send {
        let token = self.token();
        async move { token }
    }

    fn store_profile(&self, profile: UserProfile) -> impl Future<Output = Result<()>> + Send {
        let result = self.write(|inner| inner.profiles.push(profile));
        async move { result }
    }
}
