//! # Backoffice API Client
//!
//! [`HttpTransport`](backoffice_core::HttpTransport) implementation for the
//! remote back-office API, built on `reqwest`.
//!
//! ## Example
//!
//! ```no_run
//! use backoffice_client::ApiClient;
//! use backoffice_core::{ApiRequest, HttpTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // BACKOFFICE_API_URL, BACKOFFICE_API_TIMEOUT_SECS
//!     let client = ApiClient::from_env()?;
//!
//!     let response = client.request(ApiRequest::get("/orders?page=1&per_page=10")).await?;
//!
//!     println!("{}", response.data);
//!     Ok(())
//! }
//! ```
//!
//! ## Behavior
//!
//! - 2xx answers are `Ok`; the body is parsed as JSON, an empty body is `null`
//! - Other answers fail with their status and the `message`/`errors` of a JSON object body
//! - Connection errors and timeouts fail without a status
//! - One attempt per call, no retries

pub mod client;
pub mod config;
pub mod error;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::ClientError;
