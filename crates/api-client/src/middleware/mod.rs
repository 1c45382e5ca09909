//! Admission control applied before every request
//!
//! This module re-exports the rate limiter from `mcule-core`.

pub use mcule_core::rate_limit::{RateLimitConfig, RateLimitStatus, RateLimiter};
pub use mcule_core::RateLimitError;
