//! Runtime configuration: defaults, then an optional TOML file, then
//! `OPTIONS_SCREENER_*` environment variables. CLI flags are applied last by
//! the binary.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::provider::{Backoff, RetryPolicy};

const ENV_PREFIX: &str = "OPTIONS_SCREENER_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("parsing config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("{name} has invalid value '{value}'")]
    Env { name: String, value: String },

    #[error("invalid configuration:\n  {}", .0.join("\n  "))]
    Invalid(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenerConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub pacing: PacingConfig,
    pub retry: RetryConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub options_url: String,
    pub chart_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            options_url: "https://query1.finance.yahoo.com/v7/finance/options".to_string(),
            chart_url: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36"
                .to_string(),
            timeout_secs: 30,
        }
    }
}

/// Provider call spacing and the pause between tickers. Zero disables either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub call_interval_ms: u64,
    pub ticker_gap_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            call_interval_ms: 500,
            ticker_gap_ms: 1000,
        }
    }
}

impl PacingConfig {
    pub fn call_interval(&self) -> Duration {
        Duration::from_millis(self.call_interval_ms)
    }

    pub fn ticker_gap(&self) -> Duration {
        Duration::from_millis(self.ticker_gap_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff: Backoff,
    pub rate_limit_backoff_ms: u64,
    pub error_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::Linear,
            rate_limit_backoff_ms: 2000,
            error_delay_ms: 1000,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            backoff: self.backoff,
            rate_limit_base: Duration::from_millis(self.rate_limit_backoff_ms),
            error_delay: Duration::from_millis(self.error_delay_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub default_min_days: i64,
    pub default_max_days: i64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_min_days: 7,
            default_max_days: 45,
        }
    }
}

impl ScreenerConfig {
    /// Defaults, overlaid with `path` when given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Overlay `OPTIONS_SCREENER_*` variables looked up through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        override_from(&lookup, "HOST", &mut self.server.host)?;
        override_from(&lookup, "PORT", &mut self.server.port)?;
        override_from(&lookup, "OPTIONS_URL", &mut self.provider.options_url)?;
        override_from(&lookup, "CHART_URL", &mut self.provider.chart_url)?;
        override_from(&lookup, "USER_AGENT", &mut self.provider.user_agent)?;
        override_from(&lookup, "TIMEOUT_SECS", &mut self.provider.timeout_secs)?;
        override_from(&lookup, "CALL_INTERVAL_MS", &mut self.pacing.call_interval_ms)?;
        override_from(&lookup, "TICKER_GAP_MS", &mut self.pacing.ticker_gap_ms)?;
        override_from(&lookup, "MAX_ATTEMPTS", &mut self.retry.max_attempts)?;
        override_from(&lookup, "RATE_LIMIT_BACKOFF_MS", &mut self.retry.rate_limit_backoff_ms)?;
        override_from(&lookup, "ERROR_DELAY_MS", &mut self.retry.error_delay_ms)?;
        Ok(())
    }

    /// Check every section, reporting all problems at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut issues = Vec::new();

        if self.provider.options_url.trim().is_empty() {
            issues.push("provider.options_url must not be empty".to_string());
        }
        if self.provider.chart_url.trim().is_empty() {
            issues.push("provider.chart_url must not be empty".to_string());
        }
        if self.provider.timeout_secs == 0 {
            issues.push("provider.timeout_secs must be > 0".to_string());
        }
        if self.retry.max_attempts == 0 {
            issues.push("retry.max_attempts must be > 0".to_string());
        }
        if self.analysis.default_min_days > self.analysis.default_max_days {
            issues.push("analysis.default_min_days must be <= analysis.default_max_days".to_string());
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(issues))
        }
    }
}

fn override_from<T, F>(lookup: &F, key: &str, target: &mut T) -> Result<(), ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let name = format!("{ENV_PREFIX}{key}");
    if let Some(raw) = lookup(&name) {
        *target = raw.trim().parse().map_err(|_| ConfigError::Env {
            name: name.clone(),
            value: raw.clone(),
        })?;
    }
    Ok(())
}
