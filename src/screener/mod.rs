pub mod expiry;
pub mod scoring;

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::PacingConfig;
use crate::model::{AnalysisResult, TickerConfig};
use crate::pacing::{Clock, Pacer};
use crate::provider::MarketData;

pub use expiry::{DayWindow, Expiry};

/// Request-level problems. Nothing is fetched when one of these is returned.
#[derive(Debug, Error, PartialEq)]
pub enum AnalyzeError {
    #[error("No tickers provided")]
    NoTickers,
}

#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub tickers: Vec<TickerConfig>,
    pub window: DayWindow,
}

impl AnalyzeRequest {
    pub fn new(tickers: Vec<TickerConfig>, min_days: i64, max_days: i64) -> Self {
        Self {
            tickers,
            window: DayWindow::new(min_days, max_days),
        }
    }
}

/// Runs the fetch → filter → score → rank pipeline over a batch of tickers.
///
/// Tickers and expirations are processed one at a time. Every provider call
/// (snapshot or chain) takes a slot from the shared call pacer, and a fixed
/// gap separates consecutive tickers. The call pacer lives here, so
/// concurrent requests sharing one analyzer share the provider budget.
pub struct Analyzer {
    provider: Arc<dyn MarketData>,
    clock: Arc<dyn Clock>,
    call_pacer: Pacer,
    ticker_gap: Duration,
}

impl Analyzer {
    pub fn new(provider: Arc<dyn MarketData>, clock: Arc<dyn Clock>, pacing: &PacingConfig) -> Self {
        Self {
            call_pacer: Pacer::every("provider", pacing.call_interval(), clock.clone()),
            ticker_gap: pacing.ticker_gap(),
            provider,
            clock,
        }
    }

    /// Only an empty ticker list is rejected. An inverted day window is not
    /// an error; it simply matches no expiration.
    pub fn check(&self, request: &AnalyzeRequest) -> Result<(), AnalyzeError> {
        if request.tickers.is_empty() {
            return Err(AnalyzeError::NoTickers);
        }
        Ok(())
    }

    /// Score every qualifying contract across all tickers, best return first.
    ///
    /// Provider failures only drop the affected ticker or expiration; the
    /// returned error is always a request-level one.
    pub async fn analyze(
        &self,
        request: &AnalyzeRequest,
    ) -> Result<Vec<AnalysisResult>, AnalyzeError> {
        self.check(request)?;

        let today = self.clock.today();
        let mut results = Vec::new();

        for (i, ticker) in request.tickers.iter().enumerate() {
            if i > 0 && !self.ticker_gap.is_zero() {
                debug!(gap_ms = self.ticker_gap.as_millis() as u64, "pause between tickers");
                self.clock.sleep(self.ticker_gap).await;
            }
            let found = self
                .analyze_ticker(ticker, request.window, today, &mut results)
                .await;
            info!(
                symbol = %ticker.normalized_symbol(),
                option_type = %ticker.option_type,
                contracts = found,
                "ticker analyzed"
            );
        }

        scoring::rank(&mut results);
        info!(
            tickers = request.tickers.len(),
            results = results.len(),
            "analysis complete"
        );
        Ok(results)
    }

    async fn analyze_ticker(
        &self,
        ticker: &TickerConfig,
        window: DayWindow,
        today: NaiveDate,
        out: &mut Vec<AnalysisResult>,
    ) -> usize {
        let symbol = ticker.normalized_symbol();

        self.call_pacer.acquire().await;
        let snapshot = match self.provider.snapshot(&symbol).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                warn!(%symbol, "no options data, skipping ticker");
                return 0;
            }
            Err(e) => {
                warn!(%symbol, error = %e, "options fetch failed, skipping ticker");
                return 0;
            }
        };

        let Some(spot) = snapshot.spot() else {
            warn!(%symbol, "no underlying price, skipping ticker");
            return 0;
        };
        let Some(&nearest) = snapshot.expirations.first() else {
            warn!(%symbol, "no listed expirations, skipping ticker");
            return 0;
        };

        let expiries = window.qualifying(today, &snapshot.expirations);
        debug!(
            %symbol,
            listed = snapshot.expirations.len(),
            qualifying = expiries.len(),
            "expirations filtered"
        );

        let mut found = 0;
        for expiry in &expiries {
            let preloaded = if expiry.timestamp == nearest {
                snapshot.first_chain.as_ref()
            } else {
                None
            };

            found += match preloaded {
                Some(chain) => scoring::score_chain(ticker, &symbol, spot, expiry, chain, out),
                None => self.fetch_and_score(ticker, &symbol, spot, expiry, out).await,
            };
        }
        found
    }

    async fn fetch_and_score(
        &self,
        ticker: &TickerConfig,
        symbol: &str,
        spot: f64,
        expiry: &Expiry,
        out: &mut Vec<AnalysisResult>,
    ) -> usize {
        self.call_pacer.acquire().await;

        match self.provider.chain(symbol, expiry.timestamp).await {
            Ok(Some(chain)) => scoring::score_chain(ticker, symbol, spot, expiry, &chain, out),
            Ok(None) => {
                warn!(%symbol, expiry = %expiry.date, "empty chain, skipping expiration");
                0
            }
            Err(e) => {
                warn!(%symbol, expiry = %expiry.date, error = %e, "chain fetch failed, skipping expiration");
                0
            }
        }
    }
}
