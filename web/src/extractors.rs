//! Request extractors.

use crate::error::AppError;
use crate::middleware::CORRELATION_ID_HEADER;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{HeaderValue, request::Parts},
};
use backoffice_core::AddressParameters;
use std::convert::Infallible;
use uuid::Uuid;

/// Correlation ID of the current request.
///
/// Set by the correlation middleware; handlers mounted without it fall back
/// to the request header, then to a fresh ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationId(pub Uuid);

impl CorrelationId {
    /// ID carried by `value` when it is a UUID, a fresh one otherwise.
    #[must_use]
    pub fn from_header(value: Option<&HeaderValue>) -> Self {
        value
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .map_or_else(|| Self(Uuid::new_v4()), Self)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(match parts.extensions.get::<Self>() {
            Some(id) => *id,
            None => Self::from_header(parts.headers.get(CORRELATION_ID_HEADER)),
        })
    }
}

/// The request's query string as [`AddressParameters`].
///
/// Repeated keys become multi-valued. An undecodable query is a `400`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressQuery(pub AddressParameters);

#[async_trait]
impl<S> FromRequestParts<S> for AddressQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        AddressParameters::from_query(query)
            .map(Self)
            .map_err(|err| {
                tracing::warn!(error = %err, path = %parts.uri.path(), "Rejected undecodable query string");
                err.into()
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;
    use backoffice_core::ParamValue;

    fn parts(uri: &str, correlation: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = correlation {
            builder = builder.header(CORRELATION_ID_HEADER, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_from_header() {
        let id = Uuid::new_v4();
        let value = HeaderValue::from_str(&format!(" {id} ")).unwrap();

        assert_eq!(CorrelationId::from_header(Some(&value)).0, id);
        assert_ne!(CorrelationId::from_header(None).0, Uuid::nil());
        let garbage = HeaderValue::from_static("abc");
        assert_ne!(CorrelationId::from_header(Some(&garbage)).0.to_string(), "abc");
    }

    #[tokio::test]
    async fn test_extension_wins_over_header() {
        let from_middleware = CorrelationId(Uuid::new_v4());
        let mut parts = parts("/orders", Some(&Uuid::new_v4().to_string()));
        parts.extensions.insert(from_middleware);

        let id = CorrelationId::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(id, from_middleware);
    }

    #[tokio::test]
    async fn test_address_query_keeps_repeated_keys() {
        let mut parts = parts(
            "/orders?created_at=2024-01-01T00%3A00%3A00.000Z&created_at=2024-02-01T00%3A00%3A00.000Z&page=2",
            None,
        );

        let AddressQuery(params) = AddressQuery::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(params.get("page"), Some(&ParamValue::One("2".to_string())));
        assert_eq!(params.get("created_at").map(|v| v.as_slice().len()), Some(2));
    }

    #[tokio::test]
    async fn test_address_query_without_query() {
        let mut parts = parts("/orders", None);

        let AddressQuery(params) = AddressQuery::from_request_parts(&mut parts, &()).await.unwrap();

        assert!(params.is_empty());
    }
}
