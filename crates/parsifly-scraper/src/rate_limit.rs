//! Retry with exponential back-off and jitter for Apify requests.
//!
//! Transient failures (HTTP 429, 5xx, network errors) are retried. Everything
//! else is returned immediately: a failed actor run or a malformed body will
//! not improve on a second attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Upper bound for a single back-off sleep.
const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - [`ScraperError::RateLimited`]: HTTP 429.
/// - [`ScraperError::Http`]: connection reset, timeout, DNS failure.
/// - [`ScraperError::UnexpectedStatus`] with a 5xx status.
///
/// **Not retriable:** 4xx statuses, deserialization failures, failed runs and
/// a missing token.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } | ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => *status >= 500,
        ScraperError::Deserialize { .. }
        | ScraperError::RunFailed { .. }
        | ScraperError::MissingToken => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Back-off schedule with `backoff_base_ms = 1_000`:
///
/// | Attempt | Sleep before next attempt       |
/// |---------|---------------------------------|
/// | 1       | 1 000 ms × 2⁰ ± 25 % jitter    |
/// | 2       | 1 000 ms × 2¹ ± 25 % jitter    |
/// | 3       | 1 000 ms × 2² ± 25 % jitter    |
///
/// A 429 that names a `Retry-After` longer than the computed delay waits for
/// the server's value instead. Delays are capped at 60 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let jittered = (computed as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                let server_hint = match &err {
                    ScraperError::RateLimited { retry_after_secs } if backoff_base_ms > 0 => {
                        retry_after_secs.saturating_mul(1_000)
                    }
                    _ => 0,
                };
                let delay_ms = jittered.max(server_hint).min(MAX_DELAY_MS);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient Apify error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
