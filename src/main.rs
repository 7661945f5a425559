use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use options_screener::api;
use options_screener::config::ScreenerConfig;
use options_screener::pacing::{Clock, SystemClock};
use options_screener::provider::{MarketData, YahooClient};
use options_screener::report;
use options_screener::screener::{AnalyzeRequest, Analyzer};
use options_screener::validator;

mod cli;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "options_screener=info".into()),
        )
        .with_target(true)
        .init();

    let cli = cli::Cli::parse();
    let mut config = ScreenerConfig::load(cli.config.as_deref()).context("loading configuration")?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let provider: Arc<dyn MarketData> = Arc::new(
        YahooClient::new(&config.provider, config.retry.policy(), clock.clone())
            .context("creating market-data client")?,
    );
    let analyzer = Arc::new(Analyzer::new(provider.clone(), clock.clone(), &config.pacing));

    let rt = tokio::runtime::Runtime::new().context("creating async runtime")?;

    match cli.command {
        cli::Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let state = api::state::AppState::new(analyzer, provider, config.analysis.clone());
            rt.block_on(api::serve(&config.server.host, config.server.port, state))
        }

        cli::Command::Analyze {
            tickers,
            min_days,
            max_days,
            csv,
            json,
        } => {
            let request = AnalyzeRequest::new(
                tickers,
                min_days.unwrap_or(config.analysis.default_min_days),
                max_days.unwrap_or(config.analysis.default_max_days),
            );
            let results = rt.block_on(analyzer.analyze(&request))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print!("{}", report::render_table(&results));
            }

            if let Some(path) = csv {
                let path = path
                    .unwrap_or_else(|| PathBuf::from(report::default_csv_name(clock.today())));
                report::write_csv(&path, &results)?;
                info!(path = %path.display(), rows = results.len(), "wrote CSV");
            }
            Ok(())
        }

        cli::Command::Validate { ticker } => {
            let outcome = rt.block_on(validator::validate_ticker(provider.as_ref(), &ticker));
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            if !outcome.valid {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
