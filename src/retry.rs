//! Retry budget execution with exponential backoff.
//!
//! A budget of N permits up to N additional attempts after the first (total
//! attempts ≤ N+1). Attempts are numbered from 1; the backoff before
//! retrying attempt *n* is `2^(n-1)` seconds: 1s, 2s, 4s, 8s, …

use std::time::Duration;

use crate::error::TransportError;
use crate::response::Response;

/// HTTP statuses retried with backoff while budget remains.
pub const RETRYABLE_STATUS: [u16; 6] = [408, 429, 500, 502, 503, 504];

pub(crate) fn is_retryable_status(status: u16) -> bool {
    RETRYABLE_STATUS.contains(&status)
}

/// Backoff slept before retrying attempt `n` (counted from 1).
pub(crate) fn backoff_delay(attempt: u32) -> Duration {
    // Cap the exponent so the shift cannot overflow; budgets never get close.
    let exponent = attempt.saturating_sub(1).min(16);
    Duration::from_secs(1_u64 << exponent)
}

/// Run `attempt_fn` up to `max_retries + 1` times.
///
/// An attempt that returns a retryable status or a retryable error is
/// followed by a backoff sleep and another attempt while budget remains. The
/// final attempt's outcome is returned as-is: a retryable status comes back
/// as an ordinary response, a retryable error as the error. Non-retryable
/// outcomes short-circuit immediately with no sleep.
pub(crate) fn run_with_retry<F>(
    max_retries: u32,
    sleep: &dyn Fn(Duration),
    mut attempt_fn: F,
) -> Result<Response, TransportError>
where
    F: FnMut() -> Result<Response, TransportError>,
{
    let total = max_retries + 1;
    for attempt in 1..=max_retries {
        let delay = backoff_delay(attempt);
        match attempt_fn() {
            Ok(response) if is_retryable_status(response.status) => {
                log::warn!(
                    "[retry] HTTP {} (attempt {attempt}/{total}), retrying in {}s",
                    response.status,
                    delay.as_secs()
                );
            }
            Err(e) if e.is_retryable() => {
                log::warn!("[retry] {e} (attempt {attempt}/{total}), retrying in {}s",
                    delay.as_secs()
                );
            }
            outcome => return outcome,
        }
        sleep(delay);
    }
    attempt_fn()
}
