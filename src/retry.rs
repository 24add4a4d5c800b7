/*!
 * Policy-driven retry with exponential backoff.
 *
 * Outbound calls to the generation and speech APIs go through
 * `retry_with_policy`, an explicit higher-order wrapper: the caller supplies
 * the operation as a closure and a predicate deciding which errors are worth
 * retrying. Backoff is exponential from a base delay, capped at four times
 * the base, with no jitter.
 */

use std::future::Future;
use std::time::Duration;

use log::warn;

/// Retry policy for outbound API calls
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,

    /// Base delay for exponential backoff
    pub base_delay: Duration,

    /// Upper bound for a single backoff delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

impl RetryPolicy {
    /// Create a policy with the given attempt cap and base delay.
    ///
    /// The delay cap is fixed at 4x the base delay.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: base_delay * 4,
        }
    }

    /// Backoff delay before the given retry (1-based: delay after attempt n).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exp = retry.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << exp)
            .min(self.max_delay)
    }
}

/// Run an operation with retries according to the policy.
///
/// The operation is retried only while `is_retryable` returns true for the
/// error; other errors propagate immediately. When attempts are exhausted,
/// the final error is returned to the caller.
pub async fn retry_with_policy<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    is_retryable: P,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if is_retryable(&e) && attempt < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                warn!(
                    "Attempt {}/{} failed ({}), retrying in {:?}",
                    attempt, policy.max_attempts, e, delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
