//! Error types for the API client
//!
//! Remote 4xx/5xx answers are not errors here: they come back as
//! [`Outcome::Failed`](crate::response::Outcome::Failed). Only local
//! failures (admission, transport, configuration, malformed success
//! payloads) are reported through [`ApiError`].

use crate::config::ApiVariant;
use crate::routes::Route;
use mcule_core::RateLimitError;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing environment variable
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// The local rate gate rejected the request before it was sent
    #[error("Rate limited: {0}")]
    RateLimited(#[from] RateLimitError),

    /// The endpoint does not exist on this API variant
    #[error("{route} is not available on the {variant} API")]
    UnsupportedEndpoint {
        /// Endpoint that was requested
        route: Route,
        /// Variant the client talks to
        variant: ApiVariant,
    },

    /// A successful response did not have the expected shape
    #[error("Malformed response payload: {0}")]
    MalformedPayload(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a missing env var error
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnvVar(var.into())
    }

    /// Create a malformed payload error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedPayload(msg.into())
    }

    /// Check if the local rate gate rejected the request
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }

    /// How long to wait before retrying, when the rate gate rejected the request
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited(e) => e.retry_after(),
            _ => None,
        }
    }

    /// Check if the transport timed out
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_conversion() {
        let err: ApiError = RateLimitError::RequestsPerMinuteExceeded {
            limit: 100,
            retry_after: Duration::from_secs(12),
        }
        .into();

        assert!(err.is_rate_limited());
        assert_eq!(err.retry_after(), Some(Duration::from_secs(12)));
        assert!(err.to_string().starts_with("Rate limited"));
    }

    #[test]
    fn test_unsupported_endpoint_message() {
        let err = ApiError::UnsupportedEndpoint {
            route: Route::Pricing,
            variant: ApiVariant::Standard,
        };
        assert_eq!(err.to_string(), "pricing is not available on the standard API");
        assert!(err.retry_after().is_none());
    }

    #[test]
    fn test_constructors() {
        assert!(matches!(ApiError::config("x"), ApiError::Config(m) if m == "x"));
        assert!(matches!(
            ApiError::missing_env("MCULE_API_TOKEN"),
            ApiError::MissingEnvVar(v) if v == "MCULE_API_TOKEN"
        ));
        assert!(!ApiError::malformed("empty").is_rate_limited());
    }
}
