//! Prometheus metrics for the console.
//!
//! Covered:
//! - Store actions
//! - Remote mutation outcomes, by status family
//! - Remote API calls
//! - Rejected list-view searches
//!
//! # Example
//!
//! ```rust,no_run
//! use backoffice_runtime::metrics::MetricsServer;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut server = MetricsServer::new("0.0.0.0:9090".parse()?);
//! server.start()?;
//!
//! let body = server.render();
//! # Ok(())
//! # }
//! ```

use backoffice_core::CodeType;
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

pub use metrics::{counter, histogram};

/// Actions reduced by stores.
pub const STORE_ACTIONS: &str = "backoffice_store_actions_total";
/// Remote mutation outcomes.
pub const MUTATION_OUTCOMES: &str = "backoffice_mutation_outcomes_total";
/// Searches rejected by the schema.
pub const SEARCH_REJECTIONS: &str = "backoffice_search_rejections_total";
/// Remote API calls.
pub const REMOTE_REQUESTS: &str = "backoffice_remote_requests_total";
/// Remote API latency.
pub const REMOTE_REQUEST_DURATION: &str = "backoffice_remote_request_duration_seconds";

const LATENCY_BUCKETS: [f64; 10] = [0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Recorder setup failure.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// The exporter rejected its configuration.
    #[error("invalid metrics exporter configuration: {0}")]
    Config(#[source] BuildError),
    /// Another recorder could not be replaced.
    #[error("cannot install metrics recorder: {0}")]
    Install(#[source] BuildError),
}

/// Prometheus recorder plus the address its scrape endpoint belongs on.
///
/// Only the instance that installed the global recorder can render it; the
/// HTTP listener itself belongs to the binary.
pub struct MetricsServer {
    addr: SocketAddr,
    handle: Option<PrometheusHandle>,
}

impl MetricsServer {
    /// Recorder for `addr`, not yet installed.
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self { addr, handle: None }
    }

    /// Scrape address.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Describe the console's metrics and install the global recorder.
    ///
    /// Losing the race to a recorder installed elsewhere is not an error;
    /// this instance then renders nothing.
    ///
    /// # Errors
    ///
    /// [`MetricsError::Config`] for rejected buckets, [`MetricsError::Install`]
    /// for any other installation failure.
    pub fn start(&mut self) -> Result<(), MetricsError> {
        describe();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(REMOTE_REQUEST_DURATION.to_string()),
                &LATENCY_BUCKETS,
            )
            .map_err(MetricsError::Config)?;

        match builder.install_recorder() {
            Ok(handle) => {
                tracing::info!(addr = %self.addr, "Metrics recorder installed");
                self.handle = Some(handle);
            }
            Err(BuildError::FailedToSetGlobalRecorder(_)) => {
                tracing::warn!("Metrics recorder already installed elsewhere");
            }
            Err(e) => return Err(MetricsError::Install(e)),
        }
        Ok(())
    }

    /// Handle of the installed recorder, if this instance owns it.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Prometheus text exposition, `None` unless this instance owns the recorder.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle().map(PrometheusHandle::render)
    }
}

fn describe() {
    describe_counter!(STORE_ACTIONS, "Actions reduced by stores");
    describe_counter!(MUTATION_OUTCOMES, "Remote mutation outcomes by mutation and code type");
    describe_counter!(SEARCH_REJECTIONS, "List-view addresses rejected by the search schema");
    describe_counter!(REMOTE_REQUESTS, "Remote API calls by code type");
    describe_histogram!(REMOTE_REQUEST_DURATION, "Remote API call latency");
}

/// Remote mutation metrics recorder.
pub struct MutationMetrics;

impl MutationMetrics {
    /// Record the outcome of one mutation invocation.
    pub fn record_outcome(mutation: &'static str, code_type: CodeType) {
        counter!(
            MUTATION_OUTCOMES,
            "mutation" => mutation,
            "code_type" => code_type.as_str()
        )
        .increment(1);
    }
}

/// Remote API metrics recorder.
pub struct RemoteMetrics;

impl RemoteMetrics {
    /// Record one remote call and its latency.
    pub fn record_request(code_type: CodeType, duration: Duration) {
        counter!(REMOTE_REQUESTS, "code_type" => code_type.as_str())
            .increment(1);
        histogram!(REMOTE_REQUEST_DURATION).record(duration.as_secs_f64());
    }
}
