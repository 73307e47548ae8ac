/// Answering service HTTP client module.
///
/// This module provides an async HTTP client for the answering service,
/// the wire types it exchanges, and the error type surfaced to the controller.
mod client;
mod types;

pub use client::{AskClient, AskClientBuilder, AskError, AskService, FALLBACK_ERROR_MESSAGE};
pub use types::{AskRequest, AskResponse, ErrorBody, HealthStatus};
