use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

/// Time source for pacing, retries and day counting.
///
/// `now` is monotonic and only meaningful relative to other readings of the
/// same clock.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;

    /// Current calendar date (UTC).
    fn today(&self) -> NaiveDate;

    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by tokio timers.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Clock that only moves when told to. `sleep` returns immediately,
/// records the requested duration and advances `now` by it.
pub struct ManualClock {
    inner: Mutex<ManualState>,
}

struct ManualState {
    elapsed: Duration,
    today: NaiveDate,
    sleeps: Vec<Duration>,
}

impl ManualClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            inner: Mutex::new(ManualState {
                elapsed: Duration::ZERO,
                today,
                sleeps: Vec::new(),
            }),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.state().elapsed += by;
    }

    pub fn set_today(&self, today: NaiveDate) {
        self.state().today = today;
    }

    /// Every sleep requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state().sleeps.clone()
    }

    pub fn total_slept(&self) -> Duration {
        self.state().sleeps.iter().sum()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, ManualState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.state().elapsed
    }

    fn today(&self) -> NaiveDate {
        self.state().today
    }

    async fn sleep(&self, duration: Duration) {
        let mut state = self.state();
        state.elapsed += duration;
        state.sleeps.push(duration);
    }
}
