pub mod clock;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::debug;

pub use clock::{Clock, ManualClock, SystemClock};

/// Token bucket refilled at one token per `interval`, up to `capacity`.
///
/// Kept in GCRA form: `tat` is the theoretical arrival time of the next
/// token, so a reservation made while the bucket is empty takes a token from
/// the future and later reservations queue behind it.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    interval: Duration,
    burst: Duration,
    tat: Duration,
}

impl TokenBucket {
    pub fn new(capacity: u32, interval: Duration) -> Self {
        Self {
            interval,
            burst: interval * capacity.saturating_sub(1),
            tat: Duration::ZERO,
        }
    }

    /// Take one token at time `now`. Returns how long the caller must wait
    /// before using it (zero when a token was already available).
    pub fn reserve(&mut self, now: Duration) -> Duration {
        if self.interval.is_zero() {
            return Duration::ZERO;
        }
        let tat = self.tat.max(now);
        let wait = tat.saturating_sub(self.burst).saturating_sub(now);
        self.tat = tat + self.interval;
        wait
    }
}

/// Paces calls to the provider against an injected clock.
pub struct Pacer {
    label: &'static str,
    bucket: Mutex<TokenBucket>,
    clock: Arc<dyn Clock>,
}

impl Pacer {
    pub fn new(label: &'static str, bucket: TokenBucket, clock: Arc<dyn Clock>) -> Self {
        Self {
            label,
            bucket: Mutex::new(bucket),
            clock,
        }
    }

    /// One call every `interval`, no burst.
    pub fn every(label: &'static str, interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self::new(label, TokenBucket::new(1, interval), clock)
    }

    /// Wait until the next call is allowed.
    pub async fn acquire(&self) {
        let wait = {
            let mut bucket = self.bucket.lock().await;
            bucket.reserve(self.clock.now())
        };
        if !wait.is_zero() {
            debug!(pacer = self.label, wait_ms = wait.as_millis() as u64, "pacing");
            self.clock.sleep(wait).await;
        }
    }
}
