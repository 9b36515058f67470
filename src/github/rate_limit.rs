//! Rate limit information and backoff for GitHub API calls.
//!
//! GitHub signals primary and secondary rate limits with 403/429 responses.
//! The gateway maps those to [`DigestError::RateLimited`]; the intake
//! facades wrap each listing call in [`with_retry`] so that transient
//! backpressure is absorbed before a failure is reported.

use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::error::DigestError;

/// Rate limit information extracted from the GitHub `/rate_limit` endpoint.
///
/// # Example
///
/// ```
/// use prdigest::github::rate_limit::RateLimitInfo;
///
/// let info = RateLimitInfo::new(5000, 4999, 1700000000);
/// assert!(!info.is_exhausted());
/// assert_eq!(info.remaining(), 4999);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Maximum requests allowed in the current window.
    limit: u32,
    /// Remaining requests in the current window.
    remaining: u32,
    /// Unix timestamp when the rate limit resets.
    reset_at: u64,
}

impl RateLimitInfo {
    /// Creates a new rate limit info instance.
    #[must_use]
    pub const fn new(limit: u32, remaining: u32, reset_at: u64) -> Self {
        Self {
            limit,
            remaining,
            reset_at,
        }
    }

    /// Returns the maximum requests allowed in the current window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the remaining requests in the current window.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Returns the Unix timestamp when the rate limit resets.
    #[must_use]
    pub const fn reset_at(&self) -> u64 {
        self.reset_at
    }

    /// Returns true if the rate limit has been exhausted.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Calculates seconds until the rate limit resets.
    ///
    /// Returns 0 if the reset time has already passed or if the system time
    /// cannot be determined.
    #[must_use]
    pub fn seconds_until_reset(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_secs())
            .unwrap_or(0);

        self.reset_at.saturating_sub(now)
    }
}

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);

/// Bounded exponential backoff applied to rate-limited calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy retrying up to `max_retries` times, doubling
    /// `base_delay` after each attempt.
    #[must_use]
    pub const fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }

    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Caps any single backoff delay.
    #[must_use]
    pub const fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Number of retries after the first attempt.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before retry number `attempt` (0-based).
    ///
    /// When GitHub reported a reset time that falls inside the cap, waiting
    /// for the reset is preferred over the exponential schedule.
    #[must_use]
    pub fn delay_for(&self, attempt: u32, rate_limit: Option<&RateLimitInfo>) -> Duration {
        let reset_wait = rate_limit
            .map(RateLimitInfo::seconds_until_reset)
            .filter(|seconds| *seconds > 0)
            .map(Duration::from_secs);

        let exponential = self
            .base_delay
            .saturating_mul(2_u32.saturating_pow(attempt));

        reset_wait.unwrap_or(exponential).min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_BASE_DELAY)
    }
}

/// Runs `attempt` until it succeeds, fails with a non rate-limit error, or
/// the policy's retries are exhausted.
///
/// The final rate-limit error is returned unchanged so callers can still
/// tell backpressure apart from other failures.
///
/// # Errors
///
/// Returns the last error produced by `attempt`.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut attempt: F,
) -> Result<T, DigestError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DigestError>>,
{
    let mut retries = 0_u32;
    loop {
        match attempt().await {
            Err(DigestError::RateLimited {
                rate_limit,
                message,
            }) if retries < policy.max_retries => {
                let delay = policy.delay_for(retries, rate_limit.as_ref());
                tracing::warn!(
                    operation,
                    retry = retries + 1,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "rate limited ({message}), backing off"
                );
                tokio::time::sleep(delay).await;
                retries += 1;
            }
            other => return other,
        }
    }
}
