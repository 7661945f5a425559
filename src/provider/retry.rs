use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::pacing::Clock;

use super::FetchError;

/// How the wait after a rate-limit response grows with the attempt number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    /// `base` every time.
    Fixed,
    /// `base × attempt`.
    Linear,
    /// `base × 2^(attempt − 1)`.
    Exponential,
}

impl Backoff {
    /// Delay after the given 1-based attempt.
    pub fn delay(&self, base: Duration, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        match self {
            Backoff::Fixed => base,
            Backoff::Linear => base.saturating_mul(attempt),
            Backoff::Exponential => base.saturating_mul(2u32.saturating_pow(attempt - 1)),
        }
    }
}

/// Bounded retry for a single provider fetch.
///
/// Rate-limit responses back off and retry, transport errors retry after a
/// fixed delay, anything else stops immediately. No sleep follows the final
/// attempt.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
    pub rate_limit_base: Duration,
    pub error_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::Linear,
            rate_limit_base: Duration::from_millis(2000),
            error_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub async fn run<T, F, Fut>(&self, clock: &dyn Clock, mut op: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut last_err = FetchError::RateLimited;

        for attempt in 1..=attempts {
            let wait = match op().await {
                Ok(value) => return Ok(value),
                Err(FetchError::RateLimited) => {
                    warn!(attempt, max_attempts = attempts, "rate limited by provider");
                    last_err = FetchError::RateLimited;
                    self.backoff.delay(self.rate_limit_base, attempt)
                }
                Err(err @ FetchError::Transport(_)) => {
                    warn!(attempt, max_attempts = attempts, error = %err, "fetch failed");
                    last_err = err;
                    self.error_delay
                }
                Err(err) => return Err(err),
            };
            if attempt < attempts {
                clock.sleep(wait).await;
            }
        }

        Err(FetchError::Exhausted {
            attempts,
            last: Box::new(last_err),
        })
    }
}
