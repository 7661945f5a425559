//! Yahoo Finance adapter.
//!
//! Uses the unauthenticated JSON endpoints behind finance.yahoo.com:
//! `/v7/finance/options/{symbol}` for chains and `/v8/finance/chart/{symbol}`
//! for quotes. Both are undocumented, so every payload field is optional and
//! the decoders below never fail on a missing key.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::model::{ChainSnapshot, OptionChain, OptionContract, Quote};
use crate::pacing::Clock;

use super::{FetchError, MarketData, RetryPolicy};

pub struct YahooClient {
    http: reqwest::Client,
    options_url: Url,
    chart_url: Url,
    retry: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl YahooClient {
    pub fn new(
        config: &ProviderConfig,
        retry: RetryPolicy,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Transport(format!("building HTTP client: {e}")))?;

        Self::with_client(http, config, retry, clock)
    }

    /// Use a prebuilt HTTP client. Only the base URLs are taken from `config`.
    pub fn with_client(
        http: reqwest::Client,
        config: &ProviderConfig,
        retry: RetryPolicy,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            http,
            options_url: base_url(&config.options_url)?,
            chart_url: base_url(&config.chart_url)?,
            retry,
            clock,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let http = &self.http;
        let url = url.as_str();
        self.retry
            .run(self.clock.as_ref(), move || async move {
                debug!(url, "GET");
                let resp = http
                    .get(url)
                    .header(ACCEPT, "application/json")
                    .send()
                    .await
                    .map_err(|e| FetchError::Transport(e.to_string()))?;

                let status = resp.status();
                if status == StatusCode::TOO_MANY_REQUESTS {
                    return Err(FetchError::RateLimited);
                }
                if !status.is_success() {
                    return Err(FetchError::Status(status.as_u16()));
                }

                resp.json::<T>()
                    .await
                    .map_err(|e| FetchError::Decode(e.to_string()))
            })
            .await
    }
}

#[async_trait]
impl MarketData for YahooClient {
    async fn quote(&self, symbol: &str) -> Result<Option<Quote>, FetchError> {
        let mut url = endpoint(&self.chart_url, symbol)?;
        url.query_pairs_mut()
            .append_pair("interval", "1d")
            .append_pair("range", "1d");
        let envelope: ChartEnvelope = self.get_json(url).await?;
        Ok(envelope.into_quote(symbol))
    }

    async fn snapshot(&self, symbol: &str) -> Result<Option<ChainSnapshot>, FetchError> {
        let url = endpoint(&self.options_url, symbol)?;
        let envelope: OptionsEnvelope = self.get_json(url).await?;
        Ok(envelope.into_snapshot())
    }

    async fn chain(
        &self,
        symbol: &str,
        expiration: i64,
    ) -> Result<Option<OptionChain>, FetchError> {
        let mut url = endpoint(&self.options_url, symbol)?;
        url.query_pairs_mut()
            .append_pair("date", &expiration.to_string());
        let envelope: OptionsEnvelope = self.get_json(url).await?;
        Ok(envelope
            .into_snapshot()
            .and_then(|snapshot| snapshot.first_chain))
    }
}

fn base_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| FetchError::Transport(format!("invalid provider URL '{raw}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(FetchError::Transport(format!(
            "provider URL '{raw}' cannot take a path"
        )));
    }
    Ok(url)
}

/// `base/{symbol}`, with the symbol escaped as a single path segment.
fn endpoint(base: &Url, symbol: &str) -> Result<Url, FetchError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| FetchError::Transport(format!("provider URL '{base}' cannot take a path")))?
        .pop_if_empty()
        .push(symbol);
    Ok(url)
}

// ── Options payload ─────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptionsEnvelope {
    option_chain: Option<OptionChainBody>,
}

#[derive(Debug, Default, Deserialize)]
struct OptionChainBody {
    result: Option<Vec<OptionChainResult>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptionChainResult {
    expiration_dates: Option<Vec<i64>>,
    quote: Option<RawQuote>,
    options: Option<Vec<RawOptions>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuote {
    regular_market_price: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawOptions {
    calls: Option<Vec<RawContract>>,
    puts: Option<Vec<RawContract>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContract {
    strike: Option<f64>,
    bid: Option<f64>,
    ask: Option<f64>,
    last_price: Option<f64>,
    implied_volatility: Option<f64>,
    volume: Option<f64>,
    open_interest: Option<f64>,
}

impl OptionsEnvelope {
    fn into_snapshot(self) -> Option<ChainSnapshot> {
        let result = self.option_chain?.result?.into_iter().next()?;
        let first_chain = result
            .options
            .and_then(|options| options.into_iter().next())
            .map(RawOptions::into_chain);

        Some(ChainSnapshot {
            price: result.quote.and_then(|q| q.regular_market_price),
            expirations: result.expiration_dates.unwrap_or_default(),
            first_chain,
        })
    }
}

impl RawOptions {
    fn into_chain(self) -> OptionChain {
        let convert = |raw: Option<Vec<RawContract>>| -> Vec<OptionContract> {
            raw.unwrap_or_default()
                .into_iter()
                .map(RawContract::into_contract)
                .collect()
        };
        OptionChain {
            calls: convert(self.calls),
            puts: convert(self.puts),
        }
    }
}

impl RawContract {
    fn into_contract(self) -> OptionContract {
        OptionContract {
            strike: finite_or_zero(self.strike),
            bid: finite_or_zero(self.bid),
            ask: finite_or_zero(self.ask),
            last_price: finite_or_zero(self.last_price),
            implied_volatility: finite_or_zero(self.implied_volatility),
            volume: count(self.volume),
            open_interest: count(self.open_interest),
        }
    }
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn count(value: Option<f64>) -> u64 {
    let v = finite_or_zero(value);
    if v > 0.0 { v as u64 } else { 0 }
}

// ── Chart payload ───────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct ChartEnvelope {
    chart: Option<ChartBody>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
    short_name: Option<String>,
    long_name: Option<String>,
}

impl ChartEnvelope {
    fn into_quote(self, symbol: &str) -> Option<Quote> {
        let meta = self.chart?.result?.into_iter().next()?.meta?;
        let price = meta
            .regular_market_price
            .filter(|p| p.is_finite() && *p > 0.0)?;
        let name = [meta.short_name, meta.long_name]
            .into_iter()
            .flatten()
            .find(|n| !n.trim().is_empty())
            .unwrap_or_else(|| symbol.to_string());

        Some(Quote {
            symbol: symbol.to_string(),
            price,
            name,
        })
    }
}
