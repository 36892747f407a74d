//! Axum integration for the back-office console.
//!
//! The functional core (address validation, query-state binding, outcome
//! classification) stays in `backoffice-core`; this crate is the imperative
//! shell around it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Imperative Shell (Axum)         │  ← HTTP, JSON, cookies
//! │  - Query decoding                       │  ← Correlation IDs
//! │  - Response serialization               │  ← Logging
//! ├─────────────────────────────────────────┤
//! │         Functional Core                 │
//! │  - Search schema, query-state binding   │  ← Testable at memory speed
//! │  - Outcome classification               │  ← No I/O
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler
//! 2. **Decode** the query into address parameters
//! 3. **Validate** through the search schema (hard failure on a broken link)
//! 4. **Call** the remote API through the injected transport
//! 5. **Normalize** the result into an `ActionOutcome`
//! 6. **Return** JSON to the client
//!
//! # Example
//!
//! ```ignore
//! use backoffice_web::{AppState, correlation_id_layer, handlers};
//! use axum::{Router, routing::get};
//!
//! let app = Router::new()
//!     .route("/health", get(handlers::health_check))
//!     .merge(handlers::list_router(AppState::new(client)))
//!     .layer(correlation_id_layer());
//! ```

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod outcome;
pub mod state;

pub use error::{AppError, INVALID_QUERY, INVALID_SEARCH_PARAMS, IssueResponse};
pub use extractors::{AddressQuery, CorrelationId};
pub use middleware::{CORRELATION_ID_HEADER, CorrelationIdLayer, correlation_id_layer};
pub use outcome::outcome_status;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
