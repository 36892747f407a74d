//! Session providers.
//!
//! Mutations only talk to session storage through the [`SessionStore`] trait;
//! the runtime injects a concrete implementation.
//!
//! This enables:
//! - **Testing**: in-memory mocks, deterministic
//! - **HTTP**: a per-request [`CookieSession`] that turns a stored token into a
//!   `Set-Cookie` header

pub mod cookie;
pub mod session;

pub use cookie::{CookieSession, SameSitePolicy, SessionCookie};
pub use session::{SessionStore, UserProfile};
