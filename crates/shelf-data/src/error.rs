//! HTTP client error types.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when making outbound requests.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request could not be constructed or handed to the transport.
    #[error("Request failed: {0}")]
    Request(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Network-level failure (DNS, connect, reset).
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Client-side abort after the configured deadline.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Non-2xx response without a structured error body.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Non-2xx response carrying a Notion error envelope.
    #[error("API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Failed to parse a response body.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// A redirect pointed at a destination the caller does not allow.
    #[error("Redirect to {0} refused")]
    RedirectRefused(String),
}

impl FetchError {
    /// Stable variant name, safe to surface in health reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Request(_) => "RequestError",
            Self::InvalidUrl(_) => "InvalidUrl",
            Self::Connection(_) => "ConnectionError",
            Self::Timeout(_) => "TimeoutError",
            Self::Http { .. } => "HttpError",
            Self::Api { .. } => "APIResponseError",
            Self::Parse(_) => "ParseError",
            Self::RedirectRefused(_) => "RedirectRefused",
        }
    }

    /// Upstream status code, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } | Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Failure happened before any response arrived.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout(_))
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Parse(e.to_string())
    }
}

impl From<url::ParseError> for FetchError {
    fn from(e: url::ParseError) -> Self {
        FetchError::InvalidUrl(e.to_string())
    }
}

/// The error envelope returned by the Notion API on non-2xx responses.
#[derive(Error, Debug, Clone, PartialEq, Eq, Deserialize)]
#[error("{code}: {message}")]
pub struct NotionError {
    #[serde(default)]
    pub object: String,
    pub status: u16,
    pub code: String,
    pub message: String,
}

impl NotionError {
    /// Parse an envelope, ignoring bodies that are not one.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        serde_json::from_slice::<NotionError>(body)
            .ok()
            .filter(|e| e.object == "error")
    }
}

impl From<NotionError> for FetchError {
    fn from(e: NotionError) -> Self {
        FetchError::Api {
            status: e.status,
            code: e.code,
            message: e.message,
        }
    }
}
