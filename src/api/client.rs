/// Answering service client implementation.
///
/// This module provides `AskClient` for making async HTTP requests to the answering
/// service, along with the error type and builder used to configure it.
use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use super::types::{AskRequest, AskResponse, ErrorBody, HealthStatus};
use crate::config::{Config, ConfigError};

/// Path of the question endpoint, relative to the base URL.
const ASK_PATH: &str = "/api/ask";

/// Path of the health endpoint, relative to the base URL.
const HEALTH_PATH: &str = "/api/health";

/// Message shown for every failure that is not a server-reported error.
pub const FALLBACK_ERROR_MESSAGE: &str = "An unknown error occurred. Please try again.";

/// Errors that can occur when talking to the answering service.
#[derive(Debug, Error)]
pub enum AskError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// Non-2xx response, with the message extracted from the body
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Response body was not the expected JSON
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// 2xx response whose body carried no string `answer`
    #[error("Response is missing the 'answer' field")]
    MissingAnswer,

    /// Invalid base URL or other configuration problem
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AskError {
    /// Returns the message to show the user for this error.
    ///
    /// Server-reported errors keep their message; everything else collapses to
    /// [`FALLBACK_ERROR_MESSAGE`].
    pub fn user_message(&self) -> String {
        match self {
            Self::Server { message, .. } => message.clone(),
            _ => FALLBACK_ERROR_MESSAGE.to_string(),
        }
    }

    /// Returns the HTTP status for server-reported errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Sorts a reqwest failure into the timeout or network bucket.
fn transport_error(error: reqwest::Error) -> AskError {
    if error.is_timeout() {
        AskError::Timeout(error)
    } else {
        AskError::Network(error)
    }
}

/// Builder for constructing `AskClient` instances.
///
/// # Examples
///
/// ```
/// use qanda::api::AskClientBuilder;
///
/// let client = AskClientBuilder::new()
///     .base_url("http://localhost:8000")
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.base_url(), "http://localhost:8000/");
/// ```
#[derive(Debug, Default)]
pub struct AskClientBuilder {
    base_url: Option<String>,
    request_timeout: Option<std::time::Duration>,
}

impl AskClientBuilder {
    /// Creates a new `AskClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL of the answering service.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets a request timeout. Without one, a request may wait indefinitely.
    pub fn request_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Builds the `AskClient`.
    ///
    /// If `base_url()` was not called, configuration is resolved from the
    /// environment (see [`Config::from_env`]).
    pub fn build(self) -> Result<AskClient, AskError> {
        let config = match self.base_url {
            Some(url) => Config::new(&url)?,
            None => Config::from_env(None)?,
        };
        let config = match self.request_timeout {
            Some(timeout) => config.with_request_timeout(Some(timeout)),
            None => config,
        };
        AskClient::from_config(config)
    }
}

/// Async HTTP client for the answering service.
#[derive(Debug, Clone)]
pub struct AskClient {
    http: reqwest::Client,
    config: Config,
}

/// Trait for the question-answering operation.
///
/// The controller depends on this trait rather than on `AskClient`, so tests can
/// substitute a scripted implementation.
#[async_trait]
pub trait AskService: Send + Sync {
    /// Sends `request` and returns the answer text.
    async fn ask(&self, request: &AskRequest) -> Result<String, AskError>;
}

impl AskClient {
    /// Creates a client from resolved configuration.
    pub fn from_config(config: Config) -> Result<Self, AskError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(AskError::Network)?;

        Ok(Self { http, config })
    }

    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        self.config.base_url().as_str()
    }

    /// Returns the configuration this client was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Queries the service health endpoint.
    pub async fn health(&self) -> Result<HealthStatus, AskError> {
        let url = self.config.endpoint(HEALTH_PATH)?;
        log::debug!("GET {url}");

        let response = self.http.get(url).send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(error_response(status, response).await);
        }

        let body = response.bytes().await.map_err(transport_error)?;
        serde_json::from_slice(&body).map_err(AskError::Serialization)
    }

    async fn ask_internal(&self, request: &AskRequest) -> Result<String, AskError> {
        let url = self.config.endpoint(ASK_PATH)?;
        log::debug!("POST {url}");

        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_response(status, response).await);
        }

        let body = response.bytes().await.map_err(transport_error)?;
        log::debug!("answering service replied {status} ({} bytes)", body.len());

        interpret_ask_response(status, &body)
    }
}

/// Converts a non-2xx response into a `Server` error.
///
/// The status alone decides the error kind: a body that fails to arrive is
/// treated as empty, which yields the synthesized status line.
async fn error_response(status: StatusCode, response: reqwest::Response) -> AskError {
    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => {
            log::warn!("failed to read {status} response body: {e}");
            Default::default()
        }
    };
    server_error(status, &body)
}

#[async_trait]
impl AskService for AskClient {
    async fn ask(&self, request: &AskRequest) -> Result<String, AskError> {
        self.ask_internal(request).await
    }
}

/// Turns a raw `/api/ask` response into the answer or an error.
pub(crate) fn interpret_ask_response(status: StatusCode, body: &[u8]) -> Result<String, AskError> {
    if !status.is_success() {
        return Err(server_error(status, body));
    }

    let response: AskResponse =
        serde_json::from_slice(body).map_err(AskError::Serialization)?;

    response.answer.ok_or(AskError::MissingAnswer)
}

/// Builds a `Server` error, preferring the body's `detail` over the status line.
fn server_error(status: StatusCode, body: &[u8]) -> AskError {
    let synthesized = match status.canonical_reason() {
        Some(reason) => format!("Error: {} {}", status.as_u16(), reason),
        None => format!("Error: {}", status.as_u16()),
    };

    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message())
        .unwrap_or(synthesized);

    AskError::Server {
        status: status.as_u16(),
        message,
    }
}
