//! # Backoffice Remote Mutations
//!
//! Form submissions that run on the server: one HTTP call against the remote
//! API, failures normalized into an
//! [`ActionOutcome`](backoffice_core::ActionOutcome), and a side effect plus a
//! redirect on success.
//!
//! ## Architecture
//!
//! A mutation is a small state machine driven by a reducer:
//!
//! ```text
//! Idle ─Submit─▶ InFlight ─Responded(Err)──────────────────▶ Failed
//!                    │
//!                    └─Responded(Ok)─▶ side effect ─Finished─▶ Succeeded | Failed
//! ```
//!
//! [`RemoteMutation::invoke`] runs a fresh store per submission, so every
//! invocation makes exactly one network attempt.
//!
//! ## Example: Login
//!
//! ```rust,ignore
//! use backoffice_auth::*;
//!
//! let login = RemoteMutation::new(
//!     Login::new(&AuthConfig::default()),
//!     MutationEnvironment::new(client, CookieSession::new()),
//! );
//!
//! match login.invoke(payload).await {
//!     MutationResult::Redirect { to } => println!("go to {to}"),
//!     MutationResult::Rejected { outcome } => println!("{:?}", outcome.message()),
//! }
//! ```

pub mod actions;
pub mod config;
pub mod environment;
pub mod error;
pub mod mutations;
pub mod providers;
pub mod reducers;
pub mod remote;
pub mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

#[cfg(feature = "axum")]
pub mod handlers;

#[cfg(feature = "axum")]
pub mod router;

pub use actions::MutationAction;
pub use config::AuthConfig;
pub use environment::MutationEnvironment;
pub use error::{AuthError, Result};
pub use mutations::{Login, Mutation, VerifyEmail};
pub use providers::{CookieSession, SessionCookie, SessionStore};
pub use reducers::MutationReducer;
pub use remote::RemoteMutation;
pub use state::{MutationResult, MutationState, Redirect};

#[cfg(feature = "axum")]
pub use handlers::AuthAppState;

#[cfg(feature = "axum")]
pub use router::auth_router;
