//! Remote API client implementation

use crate::config::ClientConfig;
use crate::error::ClientError;
use backoffice_core::{
    ApiRequest, ApiResponse, CodeType, FailureBody, FieldErrors, HttpTransport, Method,
    TransportFailure,
};
use backoffice_runtime::metrics::RemoteMetrics;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use std::future::Future;
use std::time::Instant;

/// Remote back-office API client
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
}

impl ApiClient {
    /// Create a client from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidEnv` for malformed variables and
    /// `ClientError::Build` if the HTTP client cannot be created.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a client with explicit configuration
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidBaseUrl` unless the base URL is an
    /// absolute http(s) URL, and `ClientError::Build` if the HTTP client
    /// cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        if !(config.base_url.starts_with("http://") || config.base_url.starts_with("https://")) {
            return Err(ClientError::InvalidBaseUrl(config.base_url));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl HttpTransport for ApiClient {
    fn request(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportFailure>> + Send {
        let client = self.client.clone();
        let url = self.config.url(&request.path);

        async move {
            let started = Instant::now();
            let method = request.method;

            let mut builder = client.request(reqwest_method(method), &url);
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            if let Some(token) = &request.bearer {
                builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let response = match builder.send().await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(%method, %url, error = %e, "Remote call failed without a response");
                    RemoteMetrics::record_request(CodeType::Unknown, started.elapsed());
                    return Err(TransportFailure::network());
                }
            };

            let status = response.status().as_u16();
            let bytes = match response.bytes().await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(%method, %url, status, error = %e, "Failed to read response body");
                    RemoteMetrics::record_request(CodeType::Unknown, started.elapsed());
                    return Err(TransportFailure::network());
                }
            };
            RemoteMetrics::record_request(CodeType::from_status(Some(status)), started.elapsed());

            let data = parse_body(&bytes);
            tracing::debug!(%method, %url, status, "Remote call completed");

            if (200..300).contains(&status) {
                Ok(ApiResponse::new(status, data))
            } else {
                Err(TransportFailure::http(status, failure_body(&data)))
            }
        }
    }
}

const fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Empty bodies become `null`; non-JSON bodies are kept as a string.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Extract `message` and `errors` from an error body.
///
/// Only JSON objects are inspected. Field errors may be a list of strings or a
/// single string; anything else is dropped.
fn failure_body(data: &Value) -> FailureBody {
    let Some(object) = data.as_object() else {
        return FailureBody::default();
    };

    let message = object
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string);

    let errors = object.get("errors").and_then(Value::as_object).map(|fields| {
        fields
            .iter()
            .filter_map(|(field, value)| {
                let messages: Vec<String> = match value {
                    Value::String(single) => vec![single.clone()],
                    Value::Array(items) => items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect(),
                    _ => return None,
                };
                Some((field.clone(), messages))
            })
            .collect::<FieldErrors>()
    });

    FailureBody { message, errors }
}
