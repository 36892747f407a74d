//! Mutation configuration.
//!
//! Values should be provided by the application, not hardcoded.

use crate::providers::SameSitePolicy;

/// Default session cookie name.
pub const DEFAULT_SESSION_COOKIE: &str = "session";

/// Configuration for the login and email-verification mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Where to send the user after a successful login.
    ///
    /// Default: `/`
    pub login_redirect: String,

    /// Where to send the user after a successful email verification.
    ///
    /// Default: `/`
    pub verify_redirect: String,

    /// Name of the cookie holding the session token.
    ///
    /// Default: `session`
    pub session_cookie: String,

    /// Whether the session cookie is marked `Secure`.
    ///
    /// Default: `false` (development over plain HTTP)
    pub cookie_secure: bool,

    /// `SameSite` policy of the session cookie.
    ///
    /// Default: `Lax`
    pub cookie_same_site: SameSitePolicy,
}

impl AuthConfig {
    /// Create configuration with default redirects and cookie settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            login_redirect: "/".to_string(),
            verify_redirect: "/".to_string(),
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            cookie_secure: false,
            cookie_same_site: SameSitePolicy::Lax,
        }
    }

    /// Set the post-login redirect target.
    #[must_use]
    pub fn with_login_redirect(mut self, target: impl Into<String>) -> Self {
        self.login_redirect = target.into();
        self
    }

    /// Set the post-verification redirect target.
    #[must_use]
    pub fn with_verify_redirect(mut self, target: impl Into<String>) -> Self {
        self.verify_redirect = target.into();
        self
    }

    /// Set the session cookie name.
    #[must_use]
    pub fn with_session_cookie(mut self, name: impl Into<String>) -> Self {
        self.session_cookie = name.into();
        self
    }

    /// Mark the session cookie `Secure`.
    #[must_use]
    pub const fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    /// Set the session cookie's `SameSite` policy.
    #[must_use]
    pub const fn with_cookie_same_site(mut self, policy: SameSitePolicy) -> Self {
        self.cookie_same_site = policy;
        self
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}
