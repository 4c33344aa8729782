//! Bounded retries with capped exponential backoff.

use crate::domain::collection::CollectionName;
use crate::error::{CmsError, CmsResult};
use crate::infra::config::CmsConfig;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Bound on a single attempt.
    pub timeout: Duration,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            timeout: Duration::from_secs(15),
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(5000),
        }
    }
}

impl RetryPolicy {
    /// Policy for a section: required sections get the full attempt budget
    /// and the long timeout, everything else one attempt less.
    pub fn for_section(config: &CmsConfig, required: bool) -> Self {
        let (max_attempts, timeout) = if required {
            (config.max_attempts.max(1), config.request_timeout)
        } else {
            (config.max_attempts.saturating_sub(1).max(1), config.secondary_timeout)
        };
        Self {
            max_attempts,
            timeout,
            base_delay: config.base_delay,
            max_delay: config.max_delay,
        }
    }

    /// Delay after failed attempt `attempt` (1-based):
    /// `min(base * 2^(attempt-1), max)`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        let factor = 1u32 << exponent;
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// Runs `fetch` until it succeeds, fails with a non-retryable error, or the
/// attempt budget is spent. Each attempt is bounded by `policy.timeout`; an
/// elapsed attempt counts as a retryable failure.
pub async fn fetch_with_retry<T, F, Fut>(
    collection: CollectionName,
    policy: &RetryPolicy,
    mut fetch: F,
) -> CmsResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = CmsResult<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        let outcome = match tokio::time::timeout(policy.timeout, fetch()).await {
            Ok(result) => result,
            Err(_) => Err(CmsError::Timeout {
                after: policy.timeout,
            }),
        };

        match outcome {
            Ok(value) => {
                if attempt > 1 {
                    info!(%collection, attempt, "CMS fetch succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) if err.is_retryable() && attempt < max_attempts => {
                let delay = policy.backoff_delay(attempt);
                warn!(
                    %collection,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "CMS fetch failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => {
                warn!(
                    %collection,
                    attempt,
                    retryable = err.is_retryable(),
                    error = %err,
                    "CMS fetch failed"
                );
                return Err(err);
            }
        }
    }
}
