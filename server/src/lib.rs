//! # Backoffice Server
//!
//! Composition root of the console: configuration, the HTTP router and the
//! optional Prometheus endpoint. The binary in `main.rs` wires these to a
//! listener and handles shutdown.
//!
//! ## Routes
//!
//! - `GET /health` - liveness
//! - `GET /{products,customers,orders,analytics}` - list views
//! - `POST /login`, `POST /verify-email` - remote mutations

pub mod app;
pub mod config;

pub use app::{app, metrics_router};
pub use config::{ConfigError, ServerConfig};
