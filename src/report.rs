use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use crate::model::AnalysisResult;

const CSV_HEADERS: [&str; 13] = [
    "Ticker",
    "Type",
    "Expiry",
    "Days",
    "Strike",
    "% OTM",
    "Bid",
    "Ask",
    "Premium",
    "30D Return %",
    "IV %",
    "Volume",
    "Open Interest",
];

/// Spreadsheet-friendly row: prices and percents to 2 decimals, IV to 1.
/// Field order matches `CSV_HEADERS`.
#[derive(Serialize)]
struct CsvRow<'a> {
    ticker: &'a str,
    option_type: &'static str,
    expiry: String,
    days: i64,
    strike: String,
    otm_percent: String,
    bid: String,
    ask: String,
    premium: String,
    return_30d: String,
    iv: String,
    volume: u64,
    open_interest: u64,
}

impl<'a> From<&'a AnalysisResult> for CsvRow<'a> {
    fn from(r: &'a AnalysisResult) -> Self {
        CsvRow {
            ticker: &r.ticker,
            option_type: r.option_type.as_str(),
            expiry: r.expiry.to_string(),
            days: r.days_to_expiry,
            strike: format!("{:.2}", r.strike),
            otm_percent: format!("{:.2}", r.otm_percent),
            bid: format!("{:.2}", r.bid),
            ask: format!("{:.2}", r.ask),
            premium: format!("{:.2}", r.premium),
            return_30d: format!("{:.2}", r.return_30d),
            iv: format!("{:.1}", r.iv),
            volume: r.volume,
            open_interest: r.open_interest,
        }
    }
}

/// `options_analysis_YYYY-MM-DD.csv`
pub fn default_csv_name(today: NaiveDate) -> String {
    format!("options_analysis_{today}.csv")
}

/// Header row first, even when `results` is empty.
pub fn write_csv_to<W: Write>(writer: W, results: &[AnalysisResult]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(CSV_HEADERS)?;
    for row in results.iter().map(CsvRow::from) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv(path: &Path, results: &[AnalysisResult]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating CSV file {}", path.display()))?;
    write_csv_to(file, results).with_context(|| format!("writing {}", path.display()))
}

/// Fixed-width table for the terminal.
pub fn render_table(results: &[AnalysisResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<7} {:<4} {:<10} {:>4} {:>9} {:>7} {:>8} {:>8} {:>7} {:>7} {:>10}",
        "TICKER", "TYPE", "EXPIRY", "DAYS", "STRIKE", "OTM%", "PREMIUM", "RET30D%", "IV%", "VOL", "OI"
    );
    for r in results {
        let _ = writeln!(
            out,
            "{:<7} {:<4} {:<10} {:>4} {:>9.2} {:>7.1} {:>8.2} {:>8.2} {:>7.1} {:>7} {:>10}",
            r.ticker,
            r.option_type.as_str(),
            r.expiry,
            r.days_to_expiry,
            r.strike,
            r.otm_percent,
            r.premium,
            r.return_30d,
            r.iv,
            r.volume,
            r.open_interest
        );
    }
    out
}
