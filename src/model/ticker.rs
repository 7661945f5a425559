use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Which side of the chain a ticker is screened on. Serialized uppercase,
/// parsed case-insensitively through [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum OptionType {
    Put,
    Call,
}

impl OptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Put => "PUT",
            OptionType::Call => "CALL",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "put" | "p" => Ok(OptionType::Put),
            "call" | "c" => Ok(OptionType::Call),
            other => Err(format!("unknown option type '{other}' (expected put or call)")),
        }
    }
}

impl TryFrom<String> for OptionType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One row of the screening request.
///
/// On the wire: `{"ticker": "AAPL", "optionType": "put", "otmPercent": 10}`.
/// Extra fields sent by form clients are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerConfig {
    #[serde(rename = "ticker")]
    pub symbol: String,
    pub option_type: OptionType,
    /// Upper bound on out-of-the-money distance, in percent of spot.
    #[serde(rename = "otmPercent", deserialize_with = "number_or_string")]
    pub max_otm_percent: f64,
}

impl TickerConfig {
    pub fn new(symbol: impl Into<String>, option_type: OptionType, max_otm_percent: f64) -> Self {
        Self {
            symbol: symbol.into(),
            option_type,
            max_otm_percent,
        }
    }

    /// Provider lookups are always made with the uppercase symbol.
    pub fn normalized_symbol(&self) -> String {
        self.symbol.trim().to_uppercase()
    }
}

/// Parses the CLI form `SYMBOL:TYPE:MAX_OTM`, e.g. `AAPL:put:10`.
impl FromStr for TickerConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [symbol, option_type, otm] = parts.as_slice() else {
            return Err(format!(
                "invalid ticker spec '{s}' (expected SYMBOL:put|call:MAX_OTM)"
            ));
        };
        if symbol.trim().is_empty() {
            return Err(format!("invalid ticker spec '{s}': empty symbol"));
        }
        let option_type = option_type.parse::<OptionType>()?;
        let max_otm_percent = otm
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("invalid ticker spec '{s}': '{otm}' is not a number"))?;
        Ok(TickerConfig::new(symbol.trim(), option_type, max_otm_percent))
    }
}

/// Form clients post the OTM bound either as a number or as a numeric string.
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("otmPercent '{s}' is not a number"))),
    }
}
