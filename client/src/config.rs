//! Remote API client configuration.

use crate::error::ClientError;
use std::time::Duration;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Variable holding the API base URL.
pub const API_URL_VAR: &str = "BACKOFFICE_API_URL";

/// Variable holding the per-call timeout in seconds.
pub const API_TIMEOUT_VAR: &str = "BACKOFFICE_API_TIMEOUT_SECS";

/// Remote API client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every request path is appended to (no trailing slash).
    pub base_url: String,

    /// Per-call timeout. A call exceeding it fails without a status.
    ///
    /// Default: 30 seconds
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create configuration for `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the per-call timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `BACKOFFICE_API_URL` and `BACKOFFICE_API_TIMEOUT_SECS` from the
    /// process environment.
    ///
    /// # Errors
    ///
    /// See [`from_lookup`](Self::from_lookup).
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the client variables through `lookup`. Unset and blank variables
    /// both mean "use the default".
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEnv`] if the timeout is not a whole
    /// number of seconds.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut config = Self::new(
            var(API_URL_VAR).map_or_else(|| DEFAULT_BASE_URL.to_string(), |url| url.trim().to_string()),
        );
        if let Some(raw) = var(API_TIMEOUT_VAR) {
            let secs = raw.trim().parse::<u64>().map_err(|_| ClientError::InvalidEnv {
                name: API_TIMEOUT_VAR,
                value: raw.clone(),
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Absolute URL for a request path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name: &str| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
        }
    }

    #[test]
    fn test_blank_variables_use_defaults() {
        let config =
            ClientConfig::from_lookup(lookup(&[(API_URL_VAR, ""), (API_TIMEOUT_VAR, "  ")])).unwrap();

        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_lookup_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            (API_URL_VAR, "https://api.example.com/"),
            (API_TIMEOUT_VAR, "5"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_bad_timeout_is_an_error() {
        let err = ClientConfig::from_lookup(lookup(&[(API_TIMEOUT_VAR, "soon")])).unwrap_err();
        assert!(matches!(err, ClientError::InvalidEnv { name: API_TIMEOUT_VAR, .. }));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ClientConfig::new("http://api.test/v1/");
        assert_eq!(config.base_url, "http://api.test/v1");
        assert_eq!(config.url("/orders?page=1"), "http://api.test/v1/orders?page=1");
        assert_eq!(config.url("orders"), "http://api.test/v1/orders");
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);

        let config = config.with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
