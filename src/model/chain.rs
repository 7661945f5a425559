use serde::{Deserialize, Serialize};

use super::ticker::OptionType;

/// A single listed contract as reported by the provider.
///
/// Missing numeric fields are normalized to zero by the provider adapter;
/// a zero strike marks a contract that cannot be scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    pub strike: f64,
    pub bid: f64,
    pub ask: f64,
    pub last_price: f64,
    /// Annualized, as a fraction (0.25 = 25%).
    pub implied_volatility: f64,
    pub volume: u64,
    pub open_interest: u64,
}

/// Calls and puts for one expiration date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionChain {
    pub calls: Vec<OptionContract>,
    pub puts: Vec<OptionContract>,
}

impl OptionChain {
    pub fn side(&self, option_type: OptionType) -> &[OptionContract] {
        match option_type {
            OptionType::Put => &self.puts,
            OptionType::Call => &self.calls,
        }
    }
}

/// The provider's first answer for a symbol: spot, listed expirations and,
/// when the provider includes it, the chain for the nearest expiration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainSnapshot {
    pub price: Option<f64>,
    /// Unix seconds, in provider order (nearest first).
    pub expirations: Vec<i64>,
    /// Chain for `expirations[0]`.
    pub first_chain: Option<OptionChain>,
}

impl ChainSnapshot {
    /// Spot price, treating zero and non-finite values as absent.
    pub fn spot(&self) -> Option<f64> {
        self.price.filter(|p| p.is_finite() && *p > 0.0)
    }
}

/// Live quote used by the ticker validator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub name: String,
}
