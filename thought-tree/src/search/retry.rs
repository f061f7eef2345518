//! Retry and timeout handling for generator/evaluator callbacks.
//!
//! A callback that still fails after the policy's attempts (or times out on every attempt)
//! surfaces as a [`CallbackError`], which the executor turns into a dead end.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CallbackError;

/// Retry policy for failed callbacks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RetryPolicy {
    /// Fail on the first error.
    #[default]
    None,
    /// Retry with a constant delay between attempts.
    Fixed {
        /// Retries after the first attempt.
        max_attempts: usize,
        interval: Duration,
    },
    /// Retry with exponentially growing delays, capped at `max_interval`.
    Exponential {
        max_attempts: usize,
        initial_interval: Duration,
        max_interval: Duration,
        /// e.g. 2.0 doubles the delay each time.
        multiplier: f64,
    },
}

impl RetryPolicy {
    /// Creates a policy that never retries.
    pub fn none() -> Self {
        RetryPolicy::None
    }

    /// Creates a fixed interval retry policy.
    pub fn fixed(max_attempts: usize, interval: Duration) -> Self {
        RetryPolicy::Fixed {
            max_attempts,
            interval,
        }
    }

    /// Creates an exponential backoff retry policy.
    pub fn exponential(
        max_attempts: usize,
        initial_interval: Duration,
        max_interval: Duration,
        multiplier: f64,
    ) -> Self {
        RetryPolicy::Exponential {
            max_attempts,
            initial_interval,
            max_interval,
            multiplier,
        }
    }

    /// True when attempt number `attempt` (0-based retry count) may be retried.
    pub fn should_retry(&self, attempt: usize) -> bool {
        attempt < self.max_attempts()
    }

    /// Delay before retry number `attempt`.
    pub fn delay(&self, attempt: usize) -> Duration {
        match self {
            RetryPolicy::None => Duration::ZERO,
            RetryPolicy::Fixed { interval, .. } => *interval,
            RetryPolicy::Exponential {
                initial_interval,
                max_interval,
                multiplier,
                ..
            } => {
                let secs = initial_interval.as_secs_f64() * multiplier.powi(attempt as i32);
                if !secs.is_finite() || secs >= max_interval.as_secs_f64() {
                    *max_interval
                } else {
                    Duration::from_secs_f64(secs.max(0.0))
                }
            }
        }
    }

    /// Number of retries allowed after the first attempt.
    pub fn max_attempts(&self) -> usize {
        match self {
            RetryPolicy::None => 0,
            RetryPolicy::Fixed { max_attempts, .. } => *max_attempts,
            RetryPolicy::Exponential { max_attempts, .. } => *max_attempts,
        }
    }
}

/// Runs `call` under `timeout`, retrying per `policy`. Returns the last error when retries run out.
pub(crate) async fn call_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    timeout: Option<Duration>,
    mut call: F,
) -> Result<T, CallbackError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CallbackError>>,
{
    let mut attempt = 0;
    loop {
        let result = match timeout {
            Some(limit) => match tokio::time::timeout(limit, call()).await {
                Ok(r) => r,
                Err(_) => Err(CallbackError::Timeout(limit)),
            },
            None => call().await,
        };
        match result {
            Ok(v) => return Ok(v),
            Err(e) if policy.should_retry(attempt) => {
                tracing::debug!(attempt, error = %e, "callback failed, retrying");
                let delay = policy.delay(attempt);
                if delay > Duration::ZERO {
                    tokio::time::sleep(delay).await;
                }
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
