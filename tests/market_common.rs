#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Days, NaiveDate};

use options_screener::config::PacingConfig;
use options_screener::model::{ChainSnapshot, OptionChain, OptionContract, Quote};
use options_screener::pacing::ManualClock;
use options_screener::provider::{FetchError, MarketData};
use options_screener::screener::Analyzer;

// ── Scripted replies ────────────────────────────────────────────────

/// What the fake provider answers for one call.
#[derive(Clone)]
pub enum Reply<T> {
    Data(T),
    Empty,
    Status(u16),
    Exhausted,
    Panic,
}

impl<T: Clone> Reply<T> {
    fn resolve(&self, what: &str) -> Result<Option<T>, FetchError> {
        match self {
            Reply::Data(v) => Ok(Some(v.clone())),
            Reply::Empty => Ok(None),
            Reply::Status(code) => Err(FetchError::Status(*code)),
            Reply::Exhausted => Err(FetchError::Exhausted {
                attempts: 3,
                last: Box::new(FetchError::RateLimited),
            }),
            Reply::Panic => panic!("provider blew up on {what}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Quote(String),
    Snapshot(String),
    Chain(String, i64),
}

// ── Fake provider ───────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeMarket {
    quotes: HashMap<String, Reply<Quote>>,
    snapshots: HashMap<String, Reply<ChainSnapshot>>,
    chains: HashMap<(String, i64), Reply<OptionChain>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeMarket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote(mut self, symbol: &str, reply: Reply<Quote>) -> Self {
        self.quotes.insert(symbol.to_string(), reply);
        self
    }

    pub fn with_snapshot(mut self, symbol: &str, reply: Reply<ChainSnapshot>) -> Self {
        self.snapshots.insert(symbol.to_string(), reply);
        self
    }

    pub fn with_chain(mut self, symbol: &str, expiration: i64, reply: Reply<OptionChain>) -> Self {
        self.chains.insert((symbol.to_string(), expiration), reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn chain_calls(&self) -> Vec<(String, i64)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Chain(s, ts) => Some((s, ts)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MarketData for FakeMarket {
    async fn quote(&self, symbol: &str) -> Result<Option<Quote>, FetchError> {
        self.record(Call::Quote(symbol.to_string()));
        match self.quotes.get(symbol) {
            Some(reply) => reply.resolve(symbol),
            None => Ok(None),
        }
    }

    async fn snapshot(&self, symbol: &str) -> Result<Option<ChainSnapshot>, FetchError> {
        self.record(Call::Snapshot(symbol.to_string()));
        match self.snapshots.get(symbol) {
            Some(reply) => reply.resolve(symbol),
            None => Err(FetchError::Status(404)),
        }
    }

    async fn chain(
        &self,
        symbol: &str,
        expiration: i64,
    ) -> Result<Option<OptionChain>, FetchError> {
        self.record(Call::Chain(symbol.to_string(), expiration));
        match self.chains.get(&(symbol.to_string(), expiration)) {
            Some(reply) => reply.resolve(symbol),
            None => Err(FetchError::Status(404)),
        }
    }
}

// ── Fixtures ────────────────────────────────────────────────────────

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

/// Unix timestamp of the expiration `days` calendar days after `today()`,
/// at midnight UTC like the provider lists them.
pub fn expiration(days: u64) -> i64 {
    (today() + Days::new(days))
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp()
}

pub fn contract(strike: f64, bid: f64, ask: f64) -> OptionContract {
    OptionContract {
        strike,
        bid,
        ask,
        last_price: 0.0,
        implied_volatility: 0.3,
        volume: 10,
        open_interest: 100,
    }
}

pub fn puts(contracts: Vec<OptionContract>) -> OptionChain {
    OptionChain {
        calls: Vec::new(),
        puts: contracts,
    }
}

pub fn calls(contracts: Vec<OptionContract>) -> OptionChain {
    OptionChain {
        calls: contracts,
        puts: Vec::new(),
    }
}

pub fn snapshot(price: f64, expirations: Vec<i64>, first_chain: Option<OptionChain>) -> ChainSnapshot {
    ChainSnapshot {
        price: Some(price),
        expirations,
        first_chain,
    }
}

pub fn default_pacing() -> PacingConfig {
    PacingConfig::default()
}

pub fn no_pacing() -> PacingConfig {
    PacingConfig {
        call_interval_ms: 0,
        ticker_gap_ms: 0,
    }
}

/// Analyzer over `market` with a manual clock pinned to `today()`.
pub fn analyzer(market: Arc<FakeMarket>, pacing: &PacingConfig) -> (Analyzer, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(today()));
    let analyzer = Analyzer::new(market, clock.clone(), pacing);
    (analyzer, clock)
}
