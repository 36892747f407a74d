//! Correlation-ID middleware.
//!
//! For every request the layer:
//!
//! 1. Reuses the incoming correlation header when it holds a UUID, otherwise
//!    generates one
//! 2. Stores it as a [`CorrelationId`] extension for handlers
//! 3. Runs the rest of the stack inside an `http_request` span
//! 4. Echoes it on the response
//!
//! ```ignore
//! let app = Router::new()
//!     .merge(list_router(state))
//!     .layer(correlation_id_layer());
//! ```

use crate::extractors::CorrelationId;
use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    response::Response,
};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::Instrument;

/// Default correlation header.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Layer using [`CORRELATION_ID_HEADER`].
#[must_use]
pub fn correlation_id_layer() -> CorrelationIdLayer {
    CorrelationIdLayer::default()
}

/// Tower layer attaching a correlation ID to each request.
#[derive(Clone, Debug)]
pub struct CorrelationIdLayer {
    header: HeaderName,
}

impl CorrelationIdLayer {
    /// Read and echo `header` instead of the default.
    #[must_use]
    pub fn with_header(mut self, header: HeaderName) -> Self {
        self.header = header;
        self
    }
}

impl Default for CorrelationIdLayer {
    fn default() -> Self {
        Self {
            header: HeaderName::from_static("x-correlation-id"),
        }
    }
}

impl<S> Layer<S> for CorrelationIdLayer {
    type Service = CorrelationIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CorrelationIdService {
            inner,
            header: self.header.clone(),
        }
    }
}

/// Service produced by [`CorrelationIdLayer`].
#[derive(Clone, Debug)]
pub struct CorrelationIdService<S> {
    inner: S,
    header: HeaderName,
}

type BoxFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send>>;

impl<S> Service<Request> for CorrelationIdService<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<Response, S::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request) -> Self::Future {
        let id = CorrelationId::from_header(request.headers().get(&self.header));
        request.extensions_mut().insert(id);

        let span = tracing::info_span!(
            "http_request",
            correlation_id = %id.0,
            method = %request.method(),
            path = %request.uri().path(),
        );
        let header = self.header.clone();
        let response = self.inner.call(request).instrument(span);

        Box::pin(async move {
            let mut response = response.await?;
            if let Ok(value) = HeaderValue::try_from(id.0.to_string()) {
                response.headers_mut().insert(header, value);
            }
            Ok(response)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, routing::get};
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app(layer: CorrelationIdLayer) -> Router {
        Router::new()
            .route("/orders", get(|id: CorrelationId| async move { id.0.to_string() }))
            .layer(layer)
    }

    fn get_orders(header: Option<(&str, &str)>) -> Request {
        let mut builder = Request::builder().uri("/orders");
        if let Some((name, value)) = header {
            builder = builder.header(name, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_incoming_id_reaches_handler_and_response() {
        let incoming = Uuid::new_v4().to_string();

        let response = app(correlation_id_layer())
            .oneshot(get_orders(Some((CORRELATION_ID_HEADER, &incoming))))
            .await
            .unwrap();

        assert_eq!(response.headers()[CORRELATION_ID_HEADER], incoming.as_str());
        assert_eq!(body_text(response).await, incoming);
    }

    #[tokio::test]
    async fn test_missing_or_invalid_id_is_replaced() {
        for header in [None, Some((CORRELATION_ID_HEADER, "not-a-uuid"))] {
            let response = app(correlation_id_layer())
                .oneshot(get_orders(header))
                .await
                .unwrap();

            let echoed = response.headers()[CORRELATION_ID_HEADER].to_str().unwrap().to_string();
            assert!(Uuid::parse_str(&echoed).is_ok());
            assert_eq!(body_text(response).await, echoed);
        }
    }

    #[tokio::test]
    async fn test_custom_header() {
        let incoming = Uuid::new_v4().to_string();
        let layer = correlation_id_layer().with_header(HeaderName::from_static("x-request-id"));

        let response = app(layer)
            .oneshot(get_orders(Some(("x-request-id", &incoming))))
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], incoming.as_str());
        assert!(response.headers().get(CORRELATION_ID_HEADER).is_none());
    }
}
