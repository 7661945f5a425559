use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::config::AnalysisConfig;
use crate::model::{AnalysisResult, TickerConfig};
use crate::screener::AnalyzeRequest;

// ── Request types ────────────────────────────────────────────────────

/// Ticker entries stay raw until [`AnalyzeBody::into_request`] so that one
/// malformed row drops only itself.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeBody {
    pub tickers: Option<Vec<Value>>,
    pub min_days: Option<i64>,
    pub max_days: Option<i64>,
}

impl AnalyzeBody {
    /// Fill in the window defaults and decode each ticker entry, skipping the
    /// ones that do not decode or carry a blank symbol. A missing list, or
    /// one with nothing usable left, becomes an empty request and is
    /// rejected by the analyzer's request check.
    pub fn into_request(self, defaults: &AnalysisConfig) -> AnalyzeRequest {
        let tickers = self
            .tickers
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value::<TickerConfig>(entry) {
                Ok(ticker) if !ticker.normalized_symbol().is_empty() => Some(ticker),
                Ok(_) => {
                    warn!(index, "ticker entry has no symbol, skipping");
                    None
                }
                Err(e) => {
                    warn!(index, error = %e, "malformed ticker entry, skipping");
                    None
                }
            })
            .collect();

        AnalyzeRequest::new(
            tickers,
            self.min_days.unwrap_or(defaults.default_min_days),
            self.max_days.unwrap_or(defaults.default_max_days),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ValidateQuery {
    pub ticker: Option<String>,
}

// ── Response types ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub results: Vec<AnalysisResult>,
}
