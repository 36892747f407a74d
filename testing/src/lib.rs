//! # Backoffice Testing
//!
//! Test doubles and helpers for the back-office console.
//!
//! - [`StubTransport`]: scripted [`HttpTransport`](backoffice_core::HttpTransport)
//!   that records every request
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`strategies`]: proptest strategies for statuses, addresses and forms
//!
//! ## Example
//!
//! ```ignore
//! use backoffice_testing::StubTransport;
//!
//! #[tokio::test]
//! async fn test_login_rejected() {
//!     let transport = StubTransport::new();
//!     transport.respond_err(Method::Post, "/auth/login", TransportFailure::http(401, body));
//!
//!     let result = RemoteMutation::new(login, environment(transport)).invoke(payload).await;
//!     assert_eq!(result.outcome().map(ActionOutcome::code), Some(Some(401)));
//! }
//! ```

pub mod reducer_test;
pub mod strategies;
pub mod transport;

pub use reducer_test::{ReducerTest, assertions, collect_feedback};
pub use transport::StubTransport;
