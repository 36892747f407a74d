//! Scripted HTTP transport.

use backoffice_core::{
    ApiRequest, ApiResponse, FailureBody, HttpTransport, Method, TransportFailure,
};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Scripted = Result<ApiResponse, TransportFailure>;

#[derive(Debug, Default)]
struct Inner {
    routes: HashMap<(Method, String), VecDeque<Scripted>>,
    requests: Vec<ApiRequest>,
}

/// In-memory [`HttpTransport`] answering from a script.
///
/// Responses are registered per method and path (query string ignored) and
/// consumed in order; the last one registered for a route keeps answering
/// once the others are used up. Every request is recorded. Clones share the
/// script and the record.
///
/// An unscripted request fails with `404` and a message naming the route.
///
/// # Example
///
/// ```
/// use backoffice_core::{ApiRequest, HttpTransport, Method};
/// use backoffice_testing::StubTransport;
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let transport = StubTransport::new();
/// transport.respond_ok(Method::Get, "/orders", 200, json!({"data": []}));
///
/// let response = transport.request(ApiRequest::get("/orders?page=2")).await;
/// assert_eq!(response.map(|r| r.status), Ok(200));
/// assert_eq!(transport.requests()[0].path, "/orders?page=2");
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct StubTransport {
    inner: Arc<Mutex<Inner>>,
}

impl StubTransport {
    /// Transport with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script an answer for `method path`.
    pub fn respond(&self, method: Method, path: &str, result: Scripted) -> &Self {
        self.lock()
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(result);
        self
    }

    /// Script a successful answer.
    pub fn respond_ok(&self, method: Method, path: &str, status: u16, data: Value) -> &Self {
        self.respond(method, path, Ok(ApiResponse::new(status, data)))
    }

    /// Script a failure.
    pub fn respond_err(&self, method: Method, path: &str, failure: TransportFailure) -> &Self {
        self.respond(method, path, Err(failure))
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().requests.clone()
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn answer(&self, request: ApiRequest) -> Scripted {
        let route_path = request
            .path
            .split_once('?')
            .map_or(request.path.as_str(), |(path, _)| path)
            .to_string();
        let key = (request.method, route_path);

        let mut inner = self.lock();
        inner.requests.push(request);

        let Some(queue) = inner.routes.get_mut(&key) else {
            tracing::debug!(method = %key.0, path = %key.1, "No stub for request");
            return Err(TransportFailure::http(
                404,
                FailureBody {
                    message: Some(format!("no stub for {} {}", key.0, key.1)),
                    errors: None,
                },
            ));
        };

        if queue.len() > 1 {
            queue.pop_front().unwrap_or_else(|| Err(TransportFailure::network()))
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err(TransportFailure::network()))
        }
    }
}

impl HttpTransport for StubTransport {
    fn request(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportFailure>> + Send {
        let result = self.answer(request);
        async move { result }
    }
}
