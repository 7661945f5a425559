use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ticker::OptionType;

/// One scored contract. Serialized with the snake_case keys clients
/// already consume (`return_30d`, `otm_percent`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub ticker: String,
    #[serde(rename = "type")]
    pub option_type: OptionType,
    pub expiry: NaiveDate,
    pub days_to_expiry: i64,
    pub stock_price: f64,
    pub strike: f64,
    pub otm_percent: f64,
    pub bid: f64,
    pub ask: f64,
    pub premium: f64,
    pub return_30d: f64,
    /// Implied volatility in percent.
    pub iv: f64,
    pub volume: u64,
    pub open_interest: u64,
}
