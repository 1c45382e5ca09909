//! Rate limiting for MCule API calls
//!
//! A single admission gate evaluated right before every request:
//! - Minimum spacing between consecutive requests
//! - Requests per rolling minute
//! - Requests per rolling day (optional)
//!
//! The gate never sleeps. An inadmissible request is rejected with a
//! [`RateLimitError`] that tells the caller how long to back off.
//!
//! # Example
//!
//! ```rust
//! use mcule_core::rate_limit::{RateLimitConfig, RateLimiter};
//!
//! let limiter = RateLimiter::new(RateLimitConfig::per_minute(2));
//!
//! assert!(limiter.gate().is_ok());
//! ```

use crate::error::{RateLimitError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Length of the per-minute window
pub const MINUTE: Duration = Duration::from_secs(60);

/// Length of the per-day window
pub const DAY: Duration = Duration::from_secs(86_400);

static PROCESS_WIDE: Lazy<Arc<RateLimiter>> =
    Lazy::new(|| Arc::new(RateLimiter::new(RateLimitConfig::default())));

/// Rate limiter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per rolling minute
    pub max_per_minute: u32,
    /// Maximum requests per rolling day, `None` to disable the daily quota
    pub max_per_day: Option<u32>,
    /// Minimum time between consecutive requests
    pub min_interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_per_minute: 100,
            max_per_day: Some(1000),
            min_interval: Duration::from_micros(10),
        }
    }
}

impl RateLimitConfig {
    /// Per-minute quota only, no daily cap
    #[must_use]
    pub fn per_minute(max: u32) -> Self {
        Self {
            max_per_minute: max,
            max_per_day: None,
            ..Self::default()
        }
    }

    /// Builder-style method to set the daily quota
    #[must_use]
    pub fn with_daily_limit(mut self, max: u32) -> Self {
        self.max_per_day = Some(max);
        self
    }

    /// Builder-style method to drop the daily quota
    #[must_use]
    pub fn without_daily_limit(mut self) -> Self {
        self.max_per_day = None;
        self
    }

    /// Builder-style method to set the minimum spacing
    #[must_use]
    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_per_minute == 0 {
            return Err(RateLimitError::InvalidConfig(
                "max_per_minute must be at least 1".to_string(),
            ));
        }
        if self.max_per_day == Some(0) {
            return Err(RateLimitError::InvalidConfig(
                "max_per_day must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fixed window that opens on its first admission
#[derive(Debug, Default, Clone, Copy)]
struct Window {
    started: Option<Instant>,
    count: u32,
}

impl Window {
    /// Drop the window once `length` has passed since it opened
    fn expire(&mut self, now: Instant, length: Duration) {
        if let Some(started) = self.started {
            if now.saturating_duration_since(started) >= length {
                *self = Self::default();
            }
        }
    }

    fn remaining(&self, now: Instant, length: Duration) -> Duration {
        self.started.map_or(Duration::ZERO, |started| {
            length.saturating_sub(now.saturating_duration_since(started))
        })
    }

    fn record(&mut self, now: Instant) {
        if self.started.is_none() {
            self.started = Some(now);
        }
        self.count = self.count.saturating_add(1);
    }
}

/// Everything the gate reads and writes, guarded by one lock
#[derive(Debug, Default)]
struct RateState {
    last_request: Option<Instant>,
    minute: Window,
    day: Window,
}

impl RateState {
    /// Check and commit in one step; a rejection leaves the counters untouched
    fn admit(&mut self, config: &RateLimitConfig, now: Instant) -> Result<()> {
        if let Some(last) = self.last_request {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < config.min_interval {
                return Err(RateLimitError::RequestTimeoutNotElapsed {
                    elapsed,
                    minimum: config.min_interval,
                });
            }
        }

        self.minute.expire(now, MINUTE);
        if self.minute.count >= config.max_per_minute {
            return Err(RateLimitError::RequestsPerMinuteExceeded {
                limit: config.max_per_minute,
                retry_after: self.minute.remaining(now, MINUTE),
            });
        }

        if let Some(max_per_day) = config.max_per_day {
            self.day.expire(now, DAY);
            if self.day.count >= max_per_day {
                return Err(RateLimitError::RequestsPerDayExceeded {
                    limit: max_per_day,
                    retry_after: self.day.remaining(now, DAY),
                });
            }
        }

        self.last_request = Some(now);
        self.minute.record(now);
        self.day.record(now);
        Ok(())
    }
}

/// Admission gate shared by every request that goes through it
///
/// Cloning is not supported; share it behind an `Arc` so that every client
/// holding the same instance draws from the same quotas.
#[derive(Debug)]
pub struct RateLimiter {
    state: Mutex<RateState>,
    config: RateLimitConfig,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

impl RateLimiter {
    /// Create a new rate limiter
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            state: Mutex::new(RateState::default()),
            config,
        }
    }

    /// Create a rate limiter after validating its configuration
    pub fn try_new(config: RateLimitConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Limiter shared by every caller in the process, with default quotas
    #[must_use]
    pub fn process_wide() -> Arc<Self> {
        Arc::clone(&PROCESS_WIDE)
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Admit or reject a request about to be sent now
    ///
    /// The clock is read while holding the lock, so concurrent callers are
    /// serialized in the order they acquire it.
    pub fn gate(&self) -> Result<()> {
        let mut state = self.lock();
        state.admit(&self.config, Instant::now())
    }

    /// Admit or reject a request at an explicit instant
    pub fn gate_at(&self, now: Instant) -> Result<()> {
        self.lock().admit(&self.config, now)
    }

    /// Snapshot of the current counters
    #[must_use]
    pub fn status(&self) -> RateLimitStatus {
        self.status_at(Instant::now())
    }

    /// Snapshot of the counters as seen at `now`
    #[must_use]
    pub fn status_at(&self, now: Instant) -> RateLimitStatus {
        let state = self.lock();
        let mut minute = state.minute;
        minute.expire(now, MINUTE);
        let mut day = state.day;
        day.expire(now, DAY);

        RateLimitStatus {
            minute_count: minute.count,
            max_per_minute: self.config.max_per_minute,
            day_count: day.count,
            max_per_day: self.config.max_per_day,
            minute_resets_in: minute.remaining(now, MINUTE),
        }
    }

    /// Forget every admitted request
    pub fn reset(&self) {
        *self.lock() = RateState::default();
    }

    fn lock(&self) -> MutexGuard<'_, RateState> {
        // Counters stay meaningful after a panic elsewhere, so recover them
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Rate limit status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitStatus {
    /// Requests admitted in the current minute window
    pub minute_count: u32,
    /// Per-minute maximum
    pub max_per_minute: u32,
    /// Requests admitted in the current day window
    pub day_count: u32,
    /// Per-day maximum, if any
    pub max_per_day: Option<u32>,
    /// Time until the minute window closes
    pub minute_resets_in: Duration,
}

impl RateLimitStatus {
    /// Admissions left in the current minute window
    #[must_use]
    pub fn remaining_this_minute(&self) -> u32 {
        self.max_per_minute.saturating_sub(self.minute_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Barrier;
    use std::thread;

    fn config(max_per_minute: u32) -> RateLimitConfig {
        RateLimitConfig::per_minute(max_per_minute).with_min_interval(Duration::from_micros(10))
    }

    #[test]
    fn test_first_call_never_blocks() {
        let limiter = RateLimiter::default();
        assert!(limiter.gate().is_ok());
        assert_eq!(limiter.status().minute_count, 1);
    }

    #[test]
    fn test_min_interval_rejects_without_counting() {
        let limiter = RateLimiter::new(config(10));
        let start = Instant::now();

        assert!(limiter.gate_at(start).is_ok());
        let err = limiter.gate_at(start + Duration::from_micros(5)).unwrap_err();

        assert!(matches!(
            err,
            RateLimitError::RequestTimeoutNotElapsed { minimum, .. } if minimum == Duration::from_micros(10)
        ));
        assert_eq!(limiter.status_at(start).minute_count, 1);

        assert!(limiter.gate_at(start + Duration::from_micros(10)).is_ok());
        assert_eq!(limiter.status_at(start).minute_count, 2);
    }

    #[test]
    fn test_minute_quota_and_reset() {
        let limiter = RateLimiter::new(config(3));
        let start = Instant::now();

        for i in 0..3 {
            assert!(limiter.gate_at(start + Duration::from_millis(i)).is_ok());
        }

        let err = limiter.gate_at(start + Duration::from_secs(10)).unwrap_err();
        match err {
            RateLimitError::RequestsPerMinuteExceeded { limit, retry_after } => {
                assert_eq!(limit, 3);
                assert_eq!(retry_after, Duration::from_secs(50));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let later = start + Duration::from_secs(60);
        assert!(limiter.gate_at(later).is_ok());
        assert_eq!(limiter.status_at(later).minute_count, 1);
    }

    #[test]
    fn test_daily_quota() {
        let limiter = RateLimiter::new(config(100).with_daily_limit(2));
        let start = Instant::now();

        assert!(limiter.gate_at(start).is_ok());
        assert!(limiter.gate_at(start + Duration::from_secs(61)).is_ok());

        let err = limiter.gate_at(start + Duration::from_secs(122)).unwrap_err();
        assert!(matches!(err, RateLimitError::RequestsPerDayExceeded { limit: 2, .. }));
        assert_eq!(err.retry_after(), Some(DAY - Duration::from_secs(122)));

        let next_day = start + DAY;
        assert!(limiter.gate_at(next_day).is_ok());
        assert_eq!(limiter.status_at(next_day).day_count, 1);
    }

    #[test]
    fn test_daily_quota_disabled() {
        let limiter = RateLimiter::new(config(1000).without_daily_limit());
        let start = Instant::now();

        for i in 0..1000 {
            assert!(limiter.gate_at(start + Duration::from_millis(i)).is_ok());
        }
        assert_eq!(limiter.status_at(start).day_count, 1000);
    }

    #[test]
    fn test_concurrent_callers_single_slot() {
        let limiter = Arc::new(RateLimiter::new(
            RateLimitConfig::per_minute(5).with_min_interval(Duration::ZERO),
        ));
        for _ in 0..4 {
            limiter.gate().unwrap();
        }

        let callers = 8;
        let barrier = Arc::new(Barrier::new(callers));
        let handles: Vec<_> = (0..callers)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    limiter.gate().is_ok()
                })
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(admitted, 1);
        assert_eq!(limiter.status().minute_count, 5);
    }

    #[test]
    fn test_reset() {
        let limiter = RateLimiter::new(config(1));
        assert!(limiter.gate().is_ok());
        assert!(limiter.gate().is_err());

        limiter.reset();
        assert!(limiter.gate().is_ok());
    }

    #[test]
    fn test_status_remaining() {
        let limiter = RateLimiter::new(config(10));
        let start = Instant::now();
        limiter.gate_at(start).unwrap();

        let status = limiter.status_at(start + Duration::from_secs(15));
        assert_eq!(status.remaining_this_minute(), 9);
        assert_eq!(status.minute_resets_in, Duration::from_secs(45));
        assert_eq!(status.max_per_day, None);
    }

    #[test]
    fn test_validation() {
        assert!(RateLimitConfig::default().validate().is_ok());
        assert!(RateLimiter::try_new(RateLimitConfig::per_minute(0)).is_err());
        assert!(RateLimitConfig::default()
            .with_daily_limit(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_process_wide_is_shared() {
        let a = RateLimiter::process_wide();
        let b = RateLimiter::process_wide();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.config(), &RateLimitConfig::default());
    }

    proptest! {
        #[test]
        fn proptest_spaced_calls_within_quota_all_admitted(
            max in 1u32..=200,
            calls in 1u32..=200,
            spacing_us in 10u64..=5_000,
        ) {
            let n = calls.min(max);
            let limiter = RateLimiter::new(config(max));
            let start = Instant::now();

            for i in 0..n {
                let at = start + Duration::from_micros(spacing_us * u64::from(i));
                prop_assert!(limiter.gate_at(at).is_ok());
            }
            prop_assert_eq!(limiter.status_at(start).minute_count, n);
        }
    }
}
