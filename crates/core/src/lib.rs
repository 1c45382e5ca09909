//! Core utilities for the MCule API clients
//!
//! This crate provides the pieces shared by every API variant:
//!
//! - **Rate limiting**: a single admission gate combining minimum request
//!   spacing, a per-minute quota and an optional per-day quota
//! - **Error handling**: admission errors with codes and back-off hints
//!
//! # Example
//!
//! ```rust
//! use mcule_core::rate_limit::{RateLimitConfig, RateLimiter};
//! use mcule_core::RateLimitError;
//!
//! let limiter = RateLimiter::new(RateLimitConfig::per_minute(1));
//! limiter.gate().expect("first request is always admitted");
//!
//! match limiter.gate() {
//!     Err(err @ RateLimitError::RequestsPerMinuteExceeded { .. })
//!     | Err(err @ RateLimitError::RequestTimeoutNotElapsed { .. }) => {
//!         eprintln!("backing off for {:?}", err.retry_after());
//!     }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod rate_limit;

pub use error::{ErrorCode, RateLimitError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{ErrorCode, RateLimitError, Result};
    pub use crate::rate_limit::{RateLimitConfig, RateLimitStatus, RateLimiter};
}
