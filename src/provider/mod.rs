pub mod retry;
pub mod yahoo;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{ChainSnapshot, OptionChain, Quote};

pub use retry::{Backoff, RetryPolicy};
pub use yahoo::YahooClient;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("rate limited by provider")]
    RateLimited,

    #[error("provider returned HTTP {0}")]
    Status(u16),

    #[error("malformed provider payload: {0}")]
    Decode(String),

    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: Box<FetchError> },
}

/// Market-data source for quotes and option chains.
///
/// `Ok(None)` means the provider answered but had nothing for the symbol
/// (unknown ticker, empty result array).
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Current price and display name, for ticker validation.
    async fn quote(&self, symbol: &str) -> Result<Option<Quote>, FetchError>;

    /// Spot, expiration list and the nearest chain in one round-trip.
    async fn snapshot(&self, symbol: &str) -> Result<Option<ChainSnapshot>, FetchError>;

    /// Chain for one expiration (unix seconds, as listed in the snapshot).
    async fn chain(&self, symbol: &str, expiration: i64)
    -> Result<Option<OptionChain>, FetchError>;
}
