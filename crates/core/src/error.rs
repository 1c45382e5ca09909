//! Admission errors raised by the rate limiter
//!
//! Every rejection carries the numbers a caller needs to back off:
//! - Error codes for programmatic handling
//! - The limit that was hit
//! - How long until the request would be admitted

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Admission errors (1xxx)
    /// Minimum spacing between requests not yet elapsed
    RequestTimeoutNotElapsed = 1001,
    /// Per-minute quota used up
    RequestsPerMinuteExceeded = 1002,
    /// Per-day quota used up
    RequestsPerDayExceeded = 1003,

    // Configuration errors (3xxx)
    /// Rate limit configuration rejected
    InvalidConfigValue = 3004,
}

impl ErrorCode {
    /// Get the numeric code
    #[must_use]
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "Admission",
            3 => "Configuration",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Rejections returned by [`RateLimiter::gate`](crate::rate_limit::RateLimiter::gate)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RateLimitError {
    /// Consecutive requests were issued closer together than allowed
    #[error("request issued {elapsed:?} after the previous one, minimum spacing is {minimum:?}")]
    RequestTimeoutNotElapsed {
        /// Time since the last admitted request
        elapsed: Duration,
        /// Configured minimum spacing
        minimum: Duration,
    },

    /// The per-minute quota is used up
    #[error("per-minute quota of {limit} requests exhausted, window resets in {retry_after:?}")]
    RequestsPerMinuteExceeded {
        /// Configured per-minute maximum
        limit: u32,
        /// Time until the current window closes
        retry_after: Duration,
    },

    /// The per-day quota is used up
    #[error("per-day quota of {limit} requests exhausted, window resets in {retry_after:?}")]
    RequestsPerDayExceeded {
        /// Configured per-day maximum
        limit: u32,
        /// Time until the current window closes
        retry_after: Duration,
    },

    /// The limiter configuration cannot admit anything
    #[error("invalid rate limit configuration: {0}")]
    InvalidConfig(String),
}

impl RateLimitError {
    /// Error code for this rejection
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::RequestTimeoutNotElapsed { .. } => ErrorCode::RequestTimeoutNotElapsed,
            Self::RequestsPerMinuteExceeded { .. } => ErrorCode::RequestsPerMinuteExceeded,
            Self::RequestsPerDayExceeded { .. } => ErrorCode::RequestsPerDayExceeded,
            Self::InvalidConfig(_) => ErrorCode::InvalidConfigValue,
        }
    }

    /// How long the caller should wait before the same request could pass
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RequestTimeoutNotElapsed { elapsed, minimum } => {
                Some(minimum.saturating_sub(*elapsed))
            }
            Self::RequestsPerMinuteExceeded { retry_after, .. }
            | Self::RequestsPerDayExceeded { retry_after, .. } => Some(*retry_after),
            Self::InvalidConfig(_) => None,
        }
    }

    /// Whether a quota (rather than spacing or configuration) rejected the request
    #[must_use]
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(
            self,
            Self::RequestsPerMinuteExceeded { .. } | Self::RequestsPerDayExceeded { .. }
        )
    }

    /// Recovery suggestion shown alongside the error
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::RequestTimeoutNotElapsed { .. } => "Space consecutive requests further apart",
            Self::RequestsPerMinuteExceeded { .. } => "Wait for the minute window to reset",
            Self::RequestsPerDayExceeded { .. } => {
                "Daily quota reached, wait for the window to reset or raise the limit"
            }
            Self::InvalidConfig(_) => "Use quotas of at least one request",
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, RateLimitError>;
