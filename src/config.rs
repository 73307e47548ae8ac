//! Startup configuration for the answering service client.
//!
//! The configuration is resolved once, before any request is made, and is
//! passed by value into the client. Nothing re-reads the environment later.

use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

/// Default base URL of the answering service.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Environment variable holding the base URL.
pub const BASE_URL_ENV: &str = "QANDA_API_URL";

/// Fallback environment variable for the base URL, shared with the web front-end.
pub const LEGACY_BASE_URL_ENV: &str = "VITE_API_URL";

/// Environment variable holding the optional request timeout, in whole seconds.
pub const TIMEOUT_ENV: &str = "QANDA_TIMEOUT_SECS";

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The base URL could not be parsed or cannot carry a path.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The timeout value is not a positive whole number of seconds.
    #[error("Invalid timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),
}

/// Process-wide client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    base_url: Url,
    request_timeout: Option<Duration>,
}

impl Config {
    /// Creates a configuration for the given base URL with no request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if `base_url` is not an absolute
    /// http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            request_timeout: None,
        })
    }

    /// Resolves configuration from the process environment.
    ///
    /// `override_url` (usually a CLI flag) wins over `QANDA_API_URL`, which
    /// wins over `VITE_API_URL`. When none is set, `DEFAULT_BASE_URL` is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen URL or `QANDA_TIMEOUT_SECS` is malformed.
    pub fn from_env(override_url: Option<&str>) -> Result<Self, ConfigError> {
        let base_url = match override_url {
            Some(url) => url.to_string(),
            None => env_value(BASE_URL_ENV)
                .or_else(|| env_value(LEGACY_BASE_URL_ENV))
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        };

        let request_timeout = env_value(TIMEOUT_ENV)
            .map(|raw| parse_timeout(&raw))
            .transpose()?;

        Ok(Self {
            base_url: parse_base_url(&base_url)?,
            request_timeout,
        })
    }

    /// Sets the request timeout. `None` means requests may wait forever.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Returns the base URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the request timeout, if one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// Builds the absolute URL of an endpoint below the base URL.
    ///
    /// A base URL with a path prefix (e.g. `http://host/qa`) keeps that prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be joined onto the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ConfigError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Reads an environment variable, treating empty values as unset.
fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be used as a base".to_string()));
    }

    // Url::join replaces the last path segment unless the path ends with '/'
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}
