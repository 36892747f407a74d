//! Cookie-backed session for HTTP handlers.
//!
//! The token itself lives in the browser. A [`CookieSession`] is built per
//! request from the incoming `Cookie` header, and whatever a mutation stores
//! into it is turned into a `Set-Cookie` header by the handler afterwards.

use crate::error::Result;
use crate::providers::session::{SessionStore, UserProfile};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

/// `SameSite` cookie policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSitePolicy {
    /// Strict (same-site only).
    Strict,

    /// Lax (cross-site GET allowed).
    Lax,

    /// None (cross-site allowed, requires Secure).
    None,
}

impl SameSitePolicy {
    /// Attribute value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        }
    }
}

impl FromStr for SameSitePolicy {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lax" => Ok(Self::Lax),
            "none" => Ok(Self::None),
            _ => Err(format!("unknown SameSite policy {value:?}")),
        }
    }
}

/// A `Set-Cookie` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    /// Cookie name.
    pub name: String,

    /// Cookie value.
    pub value: String,

    /// Cookie path.
    pub path: String,

    /// HTTP-only flag.
    pub http_only: bool,

    /// Secure flag.
    pub secure: bool,

    /// `SameSite` policy.
    pub same_site: SameSitePolicy,
}

impl SessionCookie {
    /// HTTP-only, `SameSite=Lax` cookie scoped to `/`.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: "/".to_string(),
            http_only: true,
            secure: false,
            same_site: SameSitePolicy::Lax,
        }
    }

    /// Set the secure flag.
    #[must_use]
    pub const fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set the `SameSite` policy.
    #[must_use]
    pub const fn with_same_site(mut self, same_site: SameSitePolicy) -> Self {
        self.same_site = same_site;
        self
    }

    /// Render as a `Set-Cookie` header value.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        let mut header = format!(
            "{}={}; Path={}",
            self.name,
            urlencoding::encode(&self.value),
            self.path
        );
        if self.http_only {
            header.push_str("; HttpOnly");
        }
        if self.secure {
            header.push_str("; Secure");
        }
        header.push_str("; SameSite=");
        header.push_str(self.same_site.as_str());
        header
    }
}

/// Find `name` in a `Cookie` request header.
#[must_use]
pub fn find_cookie(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| {
            urlencoding::decode(value).map_or_else(|_| value.to_string(), |v| v.into_owned())
        })
    })
}

/// Per-request session.
///
/// The slots only ever hold a complete value, so a poisoned lock is
/// recovered rather than reported. Clones share state, so the handler can keep one clone and inspect what the
/// mutation stored.
#[derive(Debug, Clone, Default)]
pub struct CookieSession {
    incoming: Option<String>,
    issued: Arc<Mutex<Option<String>>>,
    profile: Arc<Mutex<Option<UserProfile>>>,
}

impl CookieSession {
    /// Session without an incoming token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session seeded from the request's `Cookie` header.
    #[must_use]
    pub fn from_cookie_header(header: Option<&str>, cookie_name: &str) -> Self {
        Self {
            incoming: header.and_then(|h| find_cookie(h, cookie_name)),
            ..Self::default()
        }
    }

    /// Token stored during this request, if any.
    #[must_use]
    pub fn issued_token(&self) -> Option<String> {
        self.issued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Profile stored during this request, if any.
    #[must_use]
    pub fn profile(&self) -> Option<UserProfile> {
        self.profile
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SessionStore for CookieSession {
    fn store_token(&self, token: String) -> impl Future<Output = Result<()>> + Send {
        let issued = Arc::clone(&self.issued);

        async move {
            let mut guard = issued.lock().unwrap_or_else(PoisonError::into_inner);
            *guard = Some(token);
            Ok(())
        }
    }

    fn current_token(&self) -> impl Future<Output = Option<String>> + Send {
        let current = self.issued_token().or_else(|| self.incoming.clone());
        async move { current }
    }

    fn store_profile(&self, profile: UserProfile) -> impl Future<Output = Result<()>> + Send {
        let slot = Arc::clone(&self.profile);

        async move {
            let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
            *guard = Some(profile);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_header_value() {
        let cookie = SessionCookie::new("session", "tok 1");
        assert_eq!(
            cookie.to_header_value(),
            "session=tok%201; Path=/; HttpOnly; SameSite=Lax"
        );

        let cookie = cookie
            .with_secure(true)
            .with_same_site(SameSitePolicy::Strict);
        assert_eq!(
            cookie.to_header_value(),
            "session=tok%201; Path=/; HttpOnly; Secure; SameSite=Strict"
        );
    }

    #[test]
    fn test_same_site_from_str() {
        assert_eq!("Strict".parse(), Ok(SameSitePolicy::Strict));
        assert_eq!("none".parse(), Ok(SameSitePolicy::None));
        assert!("sometimes".parse::<SameSitePolicy>().is_err());
    }

    #[tokio::test]
    #[allow(clippy::panic)]
    async fn test_poisoned_session_still_accepts_writes() {
        let session = CookieSession::new();
        let issued = Arc::clone(&session.issued);
        let _ = std::thread::spawn(move || {
            let _guard = issued.lock();
            std::panic::panic_any("poison");
        })
        .join();

        assert!(session.store_token("t".to_string()).await.is_ok());
        assert_eq!(session.issued_token().as_deref(), Some("t"));
    }

    #[test]
    fn test_find_cookie() {
        let header = "theme=dark; session=abc%3D; other=1";
        assert_eq!(find_cookie(header, "session").as_deref(), Some("abc="));
        assert_eq!(find_cookie(header, "theme").as_deref(), Some("dark"));
        assert_eq!(find_cookie(header, "missing"), None);
        assert_eq!(find_cookie("", "session"), None);
    }

    #[tokio::test]
    async fn test_issued_token_wins_over_incoming() {
        let session = CookieSession::from_cookie_header(Some("session=old"), "session");
        assert_eq!(session.current_token().await.as_deref(), Some("old"));
        assert!(session.issued_token().is_none());

        let shared = session.clone();
        assert!(shared.store_token("new".to_string()).await.is_ok());

        assert_eq!(session.current_token().await.as_deref(), Some("new"));
        assert_eq!(session.issued_token().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_store_profile() {
        let session = CookieSession::new();
        assert!(
            session
                .store_profile(serde_json::json!({"email": "a@b.c"}))
                .await
                .is_ok()
        );
        assert_eq!(session.profile(), Some(serde_json::json!({"email": "a@b.c"})));
    }
}
