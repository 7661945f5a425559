use serde::Serialize;
use tracing::warn;

use crate::provider::MarketData;

/// Outcome of a ticker lookup. `valid` is false for unknown symbols and for
/// any provider failure alike.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TickerValidation {
    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            price: None,
            name: None,
            error: Some(error.into()),
        }
    }
}

/// Resolve `ticker` to a live quote. Never fails.
pub async fn validate_ticker(provider: &dyn MarketData, ticker: &str) -> TickerValidation {
    let symbol = ticker.trim().to_uppercase();
    if symbol.is_empty() {
        return TickerValidation::invalid("No ticker provided");
    }

    match provider.quote(&symbol).await {
        Ok(Some(quote)) => TickerValidation {
            valid: true,
            price: Some(quote.price),
            name: Some(quote.name),
            error: None,
        },
        Ok(None) => TickerValidation::invalid("Invalid ticker"),
        Err(e) => {
            warn!(%symbol, error = %e, "ticker validation failed");
            TickerValidation::invalid("Invalid ticker")
        }
    }
}
