//! TeamCity REST transport.
//!
//! [`TeamCityClient`] wraps a blocking `reqwest` client and adds the
//! authentication and content-negotiation headers every call carries.
//! The typed resource accessors live in [`TeamCityApi`], implemented for
//! the client in the `resources` submodule.

mod resources;

pub use resources::TeamCityApi;

use crate::config::TeamCityConfig;
use crate::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client settings for TeamCity requests.
#[derive(Debug, Clone, Copy)]
pub struct HttpConfig {
    /// Request timeout in milliseconds (0 to disable).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 to disable).
    pub connect_timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            connect_timeout_ms: 3_000,
        }
    }
}

impl HttpConfig {
    /// Loads HTTP configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var("TEAMCITY_HTTP_TIMEOUT_MS") {
            if let Ok(timeout_ms) = v.parse::<u64>() {
                self.timeout_ms = timeout_ms;
            }
        }
        if let Ok(v) = std::env::var("TEAMCITY_HTTP_CONNECT_TIMEOUT_MS") {
            if let Ok(connect_timeout_ms) = v.parse::<u64>() {
                self.connect_timeout_ms = connect_timeout_ms;
            }
        }
        self
    }
}

/// Builds a blocking HTTP client with configured timeouts.
#[must_use]
fn build_http_client(config: HttpConfig) -> reqwest::blocking::Client {
    let mut builder = reqwest::blocking::Client::builder();
    if config.timeout_ms > 0 {
        builder = builder.timeout(Duration::from_millis(config.timeout_ms));
    }
    if config.connect_timeout_ms > 0 {
        builder = builder.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
    }

    builder.build().unwrap_or_else(|err| {
        tracing::warn!("Failed to build HTTP client: {err}");
        reqwest::blocking::Client::new()
    })
}

/// Authenticated client for the TeamCity REST API.
pub struct TeamCityClient {
    /// Base URL without a trailing slash.
    base_url: String,
    /// Bearer token.
    token: String,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl TeamCityClient {
    /// Creates a new client for the given connection settings.
    #[must_use]
    pub fn new(config: &TeamCityConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            token: config.token.clone(),
            client: build_http_client(HttpConfig::from_env()),
        }
    }

    /// Sets HTTP client timeouts.
    #[must_use]
    pub fn with_http_config(mut self, config: HttpConfig) -> Self {
        self.client = build_http_client(config);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn send(
        &self,
        operation: &'static str,
        request: reqwest::blocking::RequestBuilder,
    ) -> Result<reqwest::blocking::Response> {
        request
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
            .send()
            .map_err(|e| {
                let error_kind = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connect"
                } else if e.is_request() {
                    "request"
                } else {
                    "unknown"
                };
                tracing::error!(
                    operation = operation,
                    error = %e,
                    error_kind = error_kind,
                    "TeamCity request failed"
                );
                Error::OperationFailed {
                    operation: operation.to_string(),
                    cause: format!("{error_kind} error: {e}"),
                }
            })
    }

    fn check_status(
        operation: &'static str,
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().unwrap_or_default();
        tracing::error!(
            operation = operation,
            status = %status,
            body = %body,
            "TeamCity API returned error status"
        );
        Err(Error::OperationFailed {
            operation: operation.to_string(),
            cause: format!("API returned status: {status} - {body}"),
        })
    }

    fn parse_json<T: DeserializeOwned>(
        operation: &'static str,
        response: reqwest::blocking::Response,
    ) -> Result<T> {
        response.json().map_err(|e| {
            tracing::error!(operation = operation, error = %e, "Failed to parse response");
            Error::OperationFailed {
                operation: operation.to_string(),
                cause: e.to_string(),
            }
        })
    }

    /// Issues a GET and deserializes the JSON response.
    pub(crate) fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
    ) -> Result<T> {
        let response = self.send(operation, self.client.get(self.url(path)))?;
        let response = Self::check_status(operation, response)?;
        Self::parse_json(operation, response)
    }

    /// Issues a GET, mapping a 404 response to `None`.
    pub(crate) fn get_json_optional<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
    ) -> Result<Option<T>> {
        let response = self.send(operation, self.client.get(self.url(path)))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check_status(operation, response)?;
        Self::parse_json(operation, response).map(Some)
    }

    /// Issues a PUT with a JSON body, requiring a 2xx response.
    pub(crate) fn put_json<B: Serialize>(
        &self,
        operation: &'static str,
        path: &str,
        body: &B,
    ) -> Result<()> {
        let request = self.client.put(self.url(path)).json(body);
        let response = self.send(operation, request)?;
        Self::check_status(operation, response).map(|_| ())
    }

    /// Issues a POST with a JSON body, requiring a 2xx response.
    pub(crate) fn post_json<B: Serialize>(
        &self,
        operation: &'static str,
        path: &str,
        body: &B,
    ) -> Result<()> {
        let request = self.client.post(self.url(path)).json(body);
        let response = self.send(operation, request)?;
        Self::check_status(operation, response).map(|_| ())
    }
}
