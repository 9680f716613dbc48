//! Asset resolution errors.

use shelf_data::FetchError;
use thiserror::Error;

/// Why an asset could not be served.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("Missing image URL")]
    MissingUrl,

    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    #[error("Image origin not allowed: {0}")]
    OriginNotAllowed(String),

    /// The upstream answered with a failure status and no refresh applied.
    #[error("Failed to fetch image: {status}")]
    Upstream { status: u16 },

    /// A refresh was attempted but no fresh URL could be obtained.
    #[error("Failed to fetch image and could not refresh URL")]
    RefreshUnavailable,

    #[error("Failed to fetch image")]
    Fetch(#[source] FetchError),

    #[error("Timed out fetching image")]
    Timeout(#[source] FetchError),
}

impl ResolveError {
    pub fn from_fetch(err: FetchError) -> Self {
        match err {
            FetchError::RedirectRefused(host) => Self::OriginNotAllowed(host),
            err if err.is_timeout() => Self::Timeout(err),
            err => Self::Fetch(err),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingUrl | Self::InvalidUrl(_) | Self::OriginNotAllowed(_) => 400,
            Self::Upstream { status } => *status,
            Self::RefreshUnavailable | Self::Fetch(_) => 500,
            Self::Timeout(_) => 504,
        }
    }

    /// Stable name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MissingUrl => "MissingUrl",
            Self::InvalidUrl(_) => "InvalidUrl",
            Self::OriginNotAllowed(_) => "OriginNotAllowed",
            Self::Upstream { .. } => "UpstreamStatus",
            Self::RefreshUnavailable => "RefreshUnavailable",
            Self::Fetch(_) => "FetchFailed",
            Self::Timeout(_) => "Timeout",
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.to_string() })
    }
}
