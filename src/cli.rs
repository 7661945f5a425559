use std::path::PathBuf;

use clap::{Parser, Subcommand};

use options_screener::model::TickerConfig;

/// Options premium screener: ranks puts and calls across tickers by
/// normalized 30-day return.
#[derive(Parser)]
#[command(name = "options-screener", version, about)]
pub struct Cli {
    /// TOML configuration file (defaults apply when omitted)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the HTTP API (/api/validate, /api/analyze)
    Serve {
        /// Interface to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Screen option chains and print the ranked contracts
    Analyze {
        /// Ticker spec SYMBOL:put|call:MAX_OTM, e.g. AAPL:put:10 (repeatable)
        #[arg(long = "ticker", short = 't', required = true)]
        tickers: Vec<TickerConfig>,

        /// Minimum days to expiry (inclusive)
        #[arg(long)]
        min_days: Option<i64>,

        /// Maximum days to expiry (inclusive)
        #[arg(long)]
        max_days: Option<i64>,

        /// Also write the results as CSV (default name: options_analysis_<date>.csv)
        #[arg(long, value_name = "PATH")]
        csv: Option<Option<PathBuf>>,

        /// Print results as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Check that a ticker resolves to a live quote
    Validate {
        /// Ticker symbol
        ticker: String,
    },
}
