//! Retry with exponential backoff
//!
//! Wraps idempotent reads against external services. Only errors that
//! report themselves as transient through [`Retryable`] are retried; the
//! delay grows by `multiplier` per attempt, is capped at `max_delay_ms` and
//! carries random jitter.

use std::future::Future;
use std::time::{Duration, Instant};

use integration_foursquare::FoursquareError;
use integration_regions::{CaseDataError, GeocodingError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Backoff policy (`[retry]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Delay before the first retry in milliseconds (default: 100)
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    /// Upper bound of a single delay in milliseconds (default: 10000)
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    /// Growth factor per attempt (default: 2.0)
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Retries after the first attempt (default: 3)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Relative jitter, 0.0 to 1.0 (default: 0.1)
    #[serde(default = "default_jitter_factor")]
    pub jitter_factor: f64,
}

const fn default_initial_delay() -> u64 {
    100
}

const fn default_max_delay() -> u64 {
    10_000
}

const fn default_multiplier() -> f64 {
    2.0
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_jitter_factor() -> f64 {
    0.1
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            multiplier: default_multiplier(),
            max_retries: default_max_retries(),
            jitter_factor: default_jitter_factor(),
        }
    }
}

impl RetryConfig {
    /// Create a policy with default jitter
    #[must_use]
    pub const fn new(
        initial_delay_ms: u64,
        max_delay_ms: u64,
        multiplier: f64,
        max_retries: u32,
    ) -> Self {
        Self {
            initial_delay_ms,
            max_delay_ms,
            multiplier,
            max_retries,
            jitter_factor: 0.1,
        }
    }

    /// Policy that never retries
    #[must_use]
    pub const fn disabled() -> Self {
        Self::new(0, 0, 1.0, 0).without_jitter()
    }

    /// Disable jitter
    #[must_use]
    pub const fn without_jitter(mut self) -> Self {
        self.jitter_factor = 0.0;
        self
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        if self.multiplier < 1.0 {
            return Err("multiplier must be at least 1.0".to_string());
        }
        if !(0.0..=1.0).contains(&self.jitter_factor) {
            return Err("jitter_factor must be between 0.0 and 1.0".to_string());
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err("initial_delay_ms must not exceed max_delay_ms".to_string());
        }
        Ok(())
    }

    /// Delay before retry number `attempt` (0-indexed)
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(64) as i32;
        let base = (self.initial_delay_ms as f64) * self.multiplier.powi(exponent);
        let capped = base.min(self.max_delay_ms as f64);

        let delay = if self.jitter_factor > 0.0 && capped > 0.0 {
            let range = capped * self.jitter_factor;
            (capped + rand::rng().random_range(-range..=range)).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(delay as u64)
    }
}

/// Errors that know whether a retry can help
pub trait Retryable {
    /// Whether the failure is transient
    fn is_retryable(&self) -> bool;
}

impl Retryable for FoursquareError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

impl Retryable for GeocodingError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

impl Retryable for CaseDataError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

impl Retryable for application::ApplicationError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

/// Run `operation` until it succeeds, fails permanently or runs out of
/// retries
///
/// `operation_name` labels the log events.
///
/// # Errors
///
/// Returns the last error of the operation.
#[allow(clippy::cast_possible_truncation)]
pub async fn retry<F, Fut, T, E>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    let start = Instant::now();
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(
                        operation = operation_name,
                        attempts = attempt + 1,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Operation succeeded after retries"
                    );
                }
                return Ok(value);
            },
            Err(err) if !err.is_retryable() => {
                debug!(operation = operation_name, error = %err, "Non-retryable failure");
                return Err(err);
            },
            Err(err) if attempt >= config.max_retries => {
                warn!(
                    operation = operation_name,
                    attempts = attempt + 1,
                    error = %err,
                    "Giving up after max retries"
                );
                return Err(err);
            },
            Err(err) => {
                let delay = config.delay_for_attempt(attempt);
                warn!(
                    operation = operation_name,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn fast() -> RetryConfig {
        RetryConfig::new(1, 5, 2.0, 3).without_jitter()
    }

    #[test]
    fn defaults() {
        let config = RetryConfig::default();
        assert_eq!(config.initial_delay_ms, 100);
        assert_eq!(config.max_delay_ms, 10_000);
        assert!((config.multiplier - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.max_retries, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn exponential_delays() {
        let config = RetryConfig::default().without_jitter();
        assert_eq!(config.delay_for_attempt(0).as_millis(), 100);
        assert_eq!(config.delay_for_attempt(1).as_millis(), 200);
        assert_eq!(config.delay_for_attempt(2).as_millis(), 400);
    }

    #[test]
    fn delay_is_capped() {
        let config = RetryConfig::new(1000, 2000, 2.0, 5).without_jitter();
        assert_eq!(config.delay_for_attempt(1).as_millis(), 2000);
        assert_eq!(config.delay_for_attempt(50).as_millis(), 2000);
    }

    #[test]
    fn jitter_stays_in_range() {
        let config = RetryConfig::new(1000, 1000, 1.0, 3);
        for _ in 0..20 {
            let ms = config.delay_for_attempt(0).as_millis();
            assert!((900..=1100).contains(&ms), "delay {ms} out of range");
        }
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(RetryConfig::new(100, 10, 2.0, 3).validate().is_err());
        assert!(RetryConfig::new(1, 10, 0.5, 3).validate().is_err());
    }

    #[test]
    fn integration_errors_are_classified() {
        assert!(Retryable::is_retryable(&FoursquareError::Timeout { timeout_secs: 1 }));
        assert!(!Retryable::is_retryable(&FoursquareError::ParseError("x".into())));
        assert!(Retryable::is_retryable(&GeocodingError::RateLimitExceeded));
        assert!(!Retryable::is_retryable(&CaseDataError::RegionNotFound("x".into())));
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = retry(&fast(), "test", || {
            let calls = Arc::clone(&calls);
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(FoursquareError::ServiceUnavailable("503".into()))
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_failure_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let result: Result<(), _> = retry(&fast(), "test", || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(GeocodingError::RequestDenied("bad key".into()))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let result: Result<(), _> = retry(&fast(), "test", || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(CaseDataError::ConnectionFailed("refused".into()))
            }
        })
        .await;

        assert!(matches!(result, Err(CaseDataError::ConnectionFailed(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn disabled_policy_tries_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let _: Result<(), _> = retry(&RetryConfig::disabled(), "test", || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FoursquareError::Timeout { timeout_secs: 1 })
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
