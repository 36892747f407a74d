//! Liveness endpoint.

use axum::http::StatusCode;

/// `GET /health`: `200 ok` while the process serves requests.
///
/// The remote API is deliberately not probed; a remote outage already shows
/// up as `502` on the list views.
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
