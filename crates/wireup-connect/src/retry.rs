//! The retry-connect loop

use crate::backoff::BackoffStrategy;
use std::future::Future;
use wireup_core::{Result, WireupError};

/// Run `connect` up to `attempts` times, sleeping per the backoff strategy
/// between failed attempts.
///
/// An `attempts` of zero or less is treated as one, so exactly one real
/// attempt is always made. The backoff delay is applied after a failed
/// attempt and before the next one, never after the final attempt, so an
/// exhausted budget returns without a pointless wait. The delay for the
/// failure of attempt `n` (zero-based) is `backoff.delay(n)`.
///
/// On exhaustion the error from the last attempt is surfaced; earlier
/// attempt errors are only logged.
pub async fn connect_with_retries<T, F, Fut>(
    kind: &str,
    attempts: i32,
    backoff: &BackoffStrategy,
    mut connect: F,
) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = attempts.max(1) as u32;
    let mut last_err = None;
    for attempt in 0..attempts {
        match connect(attempt).await {
            Ok(handle) => {
                if attempt > 0 {
                    tracing::info!(kind, attempt = attempt + 1, "connected after retrying");
                }
                return Ok(handle);
            }
            Err(err) => {
                tracing::warn!(
                    kind,
                    attempt = attempt + 1,
                    attempts,
                    error = %err,
                    "unable to connect",
                );
                last_err = Some(err);
                if attempt + 1 < attempts {
                    tokio::time::sleep(backoff.delay(attempt)).await;
                }
            }
        }
    }
    tracing::error!(kind, attempts, "giving up after exhausting connect attempts");
    Err(last_err
        .unwrap_or_else(|| WireupError::Internal(format!("{kind}: retry loop made no attempts"))))
}
