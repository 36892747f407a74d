//! Server configuration.
//!
//! Loaded from `BACKOFFICE_*` environment variables with sensible defaults.
//! A variable that is set but cannot be parsed is an error, never a silent
//! fallback to the default.

use backoffice_auth::AuthConfig;
use backoffice_auth::providers::SameSitePolicy;
use backoffice_auth::config::DEFAULT_SESSION_COOKIE;
use backoffice_client::config::API_URL_VAR;
use backoffice_client::{ClientConfig, ClientError};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default graceful shutdown window.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Invalid configuration value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid value {value:?} for {name}: expected {expected}")]
pub struct ConfigError {
    /// Variable name.
    pub name: &'static str,
    /// Value found.
    pub value: String,
    /// What would have been accepted.
    pub expected: &'static str,
}

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Remote API client settings.
    pub client: ClientConfig,
    /// Prometheus endpoint address; no exporter when unset.
    pub metrics_addr: Option<SocketAddr>,
    /// Mutation redirects and session cookie.
    pub auth: AuthConfig,
    /// How long in-flight requests get to finish after a shutdown signal.
    pub shutdown_timeout: Duration,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for the first variable that does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for the first variable that does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let client = ClientConfig::from_lookup(&var).map_err(|err| match err {
            ClientError::InvalidEnv { name, value } => ConfigError {
                name,
                value,
                expected: "a number of seconds",
            },
            other => ConfigError {
                name: API_URL_VAR,
                value: other.to_string(),
                expected: "an absolute URL",
            },
        })?;

        let auth = AuthConfig::new()
            .with_session_cookie(
                var("BACKOFFICE_SESSION_COOKIE").unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string()),
            )
            .with_cookie_secure(flag(&var, "BACKOFFICE_COOKIE_SECURE")?.unwrap_or(false))
            .with_cookie_same_site(
                parse(&var, "BACKOFFICE_COOKIE_SAME_SITE", "Strict, Lax or None")?
                    .unwrap_or(SameSitePolicy::Lax),
            )
            .with_login_redirect(var("BACKOFFICE_LOGIN_REDIRECT").unwrap_or_else(|| "/".to_string()))
            .with_verify_redirect(var("BACKOFFICE_VERIFY_REDIRECT").unwrap_or_else(|| "/".to_string()));

        Ok(Self {
            host: var("BACKOFFICE_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse(&var, "BACKOFFICE_PORT", "a port number")?.unwrap_or(3000),
            client,
            metrics_addr: parse(&var, "BACKOFFICE_METRICS_ADDR", "a socket address")?,
            auth,
            shutdown_timeout: parse::<u64>(&var, "BACKOFFICE_SHUTDOWN_TIMEOUT_SECS", "a number of seconds")?
                .map_or(DEFAULT_SHUTDOWN_TIMEOUT, Duration::from_secs),
        })
    }

    /// `host:port` to bind the HTTP listener to.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    var(name)
        .map(|value| {
            value.trim().parse().map_err(|_| ConfigError {
                name,
                value,
                expected,
            })
        })
        .transpose()
}

fn flag(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<bool>, ConfigError> {
    var(name)
        .map(|value| match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError {
                name,
                value,
                expected: "a boolean",
            }),
        })
        .transpose()
}
