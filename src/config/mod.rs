//! Configuration management.
//!
//! All configuration comes from the environment, read once at process
//! entry and passed into the client by reference. There is no config file.

use crate::{Error, Result};

/// Connection settings for the TeamCity REST API.
#[derive(Debug, Clone)]
pub struct TeamCityConfig {
    /// Base URL of the REST API, without a trailing slash.
    pub base_url: String,
    /// Access token sent as a bearer credential on every request.
    pub token: String,
}

impl TeamCityConfig {
    /// Placeholder base URL used when `TEAMCITY_BASE_URL` is unset.
    pub const DEFAULT_BASE_URL: &'static str = "http://your-teamcity-server.local/app/rest";

    /// Builds the configuration from environment variables.
    ///
    /// Reads `TEAMCITY_BASE_URL` (optional, defaults to
    /// [`Self::DEFAULT_BASE_URL`]) and `TEAMCITY_ACCESS_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `TEAMCITY_ACCESS_TOKEN` is unset
    /// or blank. This is checked before any request is made.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("TEAMCITY_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string());

        let token = std::env::var("TEAMCITY_ACCESS_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                Error::InvalidInput(
                    "TEAMCITY_ACCESS_TOKEN environment variable is required".to_string(),
                )
            })?;

        Ok(Self::new(base_url, token))
    }

    /// Creates a configuration from explicit values.
    ///
    /// Trailing slashes are trimmed from the base URL so endpoint paths
    /// can always be joined with a single `/`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = TeamCityConfig::new("https://ci.example.com/app/rest/", "tok");
        assert_eq!(config.base_url, "https://ci.example.com/app/rest");
    }

    #[test]
    fn test_new_keeps_plain_url() {
        let config = TeamCityConfig::new("https://ci.example.com/app/rest", "tok");
        assert_eq!(config.base_url, "https://ci.example.com/app/rest");
        assert_eq!(config.token, "tok");
    }
}
