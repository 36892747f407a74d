//! Router composition.

use axum::{Router, routing::get};
use backoffice_auth::{AuthAppState, AuthConfig, auth_router};
use backoffice_core::HttpTransport;
use backoffice_runtime::metrics::MetricsServer;
use backoffice_web::handlers::{health_check, list_router};
use backoffice_web::{AppState, correlation_id_layer};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

/// The console's HTTP application.
///
/// Every request runs inside the correlation-id span, so request traces and
/// handler logs share the same `correlation_id`.
pub fn app<T>(transport: T, auth: AuthConfig) -> Router
where
    T: HttpTransport + Clone + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .merge(list_router(AppState::new(transport.clone())))
        .merge(auth_router(AuthAppState::new(transport, auth)))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
}

/// `GET /metrics` in Prometheus text format.
///
/// Answers with an empty body when `metrics` did not install the recorder.
pub fn metrics_router(metrics: Arc<MetricsServer>) -> Router {
    Router::new().route(
        "/metrics",
        get(move || {
            let metrics = Arc::clone(&metrics);
            async move { metrics.render().unwrap_or_default() }
        }),
    )
}
