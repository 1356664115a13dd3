//! Backoff strategies for connection retry
//!
//! A strategy is a pure function from attempt number to wait duration. No
//! wait is used before the first attempt, so `delay(0)` is conventionally
//! unused; the retry loop asks for `delay(attempt)` after attempt number
//! `attempt` (zero-based) has failed.

use std::time::Duration;

/// Wait policy between failed connect attempts.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use wireup_connect::BackoffStrategy;
///
/// let backoff = BackoffStrategy::exponential(
///     Duration::from_millis(10),
///     Duration::from_secs(1),
///     2.0,
/// );
/// assert_eq!(backoff.delay(1), Duration::from_millis(10));
/// assert_eq!(backoff.delay(2), Duration::from_millis(20));
/// assert_eq!(backoff.delay(20), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone)]
pub enum BackoffStrategy {
    /// Always wait the same fixed duration
    Constant { wait: Duration },
    /// Wait `min(max, initial * factor^(attempt-1))`
    Exponential {
        initial: Duration,
        max: Duration,
        factor: f64,
    },
}

impl BackoffStrategy {
    /// A strategy that always waits the same duration, ignoring the
    /// attempt number.
    pub fn constant(wait: Duration) -> Self {
        Self::Constant { wait }
    }

    /// A strategy whose wait grows as `min(max, initial * factor^(attempt-1))`.
    ///
    /// For attempt 1 the exponent is 0, so the wait is `min(max, initial)`.
    /// The parameters are not validated: callers must keep `max >= initial`
    /// or the ceiling silently becomes the bound from attempt 1 onward, and
    /// a `factor < 1` produces a decreasing backoff.
    pub fn exponential(initial: Duration, max: Duration, factor: f64) -> Self {
        Self::Exponential {
            initial,
            max,
            factor,
        }
    }

    /// Calculate the wait duration for the given attempt number.
    ///
    /// Pure and deterministic; never blocks.
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            Self::Constant { wait } => *wait,
            Self::Exponential {
                initial,
                max,
                factor,
            } => {
                let wait = initial.as_secs_f64() * factor.powi(attempt as i32 - 1);
                Duration::from_secs_f64(wait.clamp(0.0, max.as_secs_f64()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_ignores_attempt_number() {
        let backoff = BackoffStrategy::constant(Duration::from_millis(250));
        for attempt in [0, 1, 100] {
            assert_eq!(backoff.delay(attempt), Duration::from_millis(250));
        }
    }

    #[test]
    fn test_exponential_growth_and_ceiling() {
        let backoff = BackoffStrategy::exponential(
            Duration::from_millis(10),
            Duration::from_secs(1),
            2.0,
        );
        assert_eq!(backoff.delay(1), Duration::from_millis(10));
        assert_eq!(backoff.delay(2), Duration::from_millis(20));
        assert_eq!(backoff.delay(5), Duration::from_millis(160));
        assert_eq!(backoff.delay(20), Duration::from_secs(1));
    }

    #[test]
    fn test_exponential_is_monotonic_for_factor_above_one() {
        let backoff = BackoffStrategy::exponential(
            Duration::from_millis(100),
            Duration::from_secs(30),
            1.5,
        );
        let mut previous = Duration::ZERO;
        for attempt in 1..30 {
            let delay = backoff.delay(attempt);
            assert!(delay >= previous, "attempt {attempt}: {delay:?} < {previous:?}");
            previous = delay;
        }
    }

    #[test]
    fn test_exponential_factor_below_one_decreases() {
        // Allowed, not validated: the caller asked for a shrinking backoff.
        let backoff = BackoffStrategy::exponential(
            Duration::from_millis(100),
            Duration::from_secs(1),
            0.5,
        );
        assert!(backoff.delay(2) < backoff.delay(1));
    }
}
