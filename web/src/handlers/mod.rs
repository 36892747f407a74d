//! HTTP request handlers.

pub mod health;
pub mod list;

pub use health::health_check;
pub use list::{ListLinks, ListResponse, list_router, list_view};
