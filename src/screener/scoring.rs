use crate::model::{AnalysisResult, OptionChain, OptionContract, OptionType, TickerConfig};

use super::expiry::Expiry;

/// Distance out of the money, in percent of spot. Negative when in the money.
pub fn otm_percent(option_type: OptionType, spot: f64, strike: f64) -> f64 {
    match option_type {
        OptionType::Put => (spot - strike) / spot * 100.0,
        OptionType::Call => (strike - spot) / spot * 100.0,
    }
}

/// Mid price, falling back to the last trade. `None` when neither is positive.
pub fn premium(contract: &OptionContract) -> Option<f64> {
    let mid = (contract.bid + contract.ask) / 2.0;
    if mid > 0.0 {
        Some(mid)
    } else if contract.last_price > 0.0 {
        Some(contract.last_price)
    } else {
        None
    }
}

/// Premium yield rescaled to a 30-day holding period, in percent.
///
/// Puts are measured against the cash set aside net of premium
/// (`strike − premium`); calls against the share price.
pub fn return_30d(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    premium: f64,
    days: i64,
) -> Option<f64> {
    if days < 1 {
        return None;
    }
    let scale = 30.0 / days as f64;
    match option_type {
        OptionType::Put => {
            let capital = strike - premium;
            (capital > 0.0).then(|| premium / capital * scale * 100.0)
        }
        OptionType::Call => Some(premium / spot * scale * 100.0),
    }
}

/// Score one contract, or `None` when it falls outside the filters.
pub fn score_contract(
    ticker: &TickerConfig,
    symbol: &str,
    spot: f64,
    expiry: &Expiry,
    contract: &OptionContract,
) -> Option<AnalysisResult> {
    if contract.strike <= 0.0 {
        return None;
    }

    let otm = otm_percent(ticker.option_type, spot, contract.strike);
    if otm < 0.0 || otm > ticker.max_otm_percent {
        return None;
    }

    let premium = premium(contract)?;
    let return_30d = return_30d(ticker.option_type, spot, contract.strike, premium, expiry.days)?;

    Some(AnalysisResult {
        ticker: symbol.to_string(),
        option_type: ticker.option_type,
        expiry: expiry.date,
        days_to_expiry: expiry.days,
        stock_price: spot,
        strike: contract.strike,
        otm_percent: otm,
        bid: contract.bid,
        ask: contract.ask,
        premium,
        return_30d,
        iv: contract.implied_volatility * 100.0,
        volume: contract.volume,
        open_interest: contract.open_interest,
    })
}

/// Score the configured side of `chain`, appending survivors to `out`.
/// Returns how many were appended.
pub fn score_chain(
    ticker: &TickerConfig,
    symbol: &str,
    spot: f64,
    expiry: &Expiry,
    chain: &OptionChain,
    out: &mut Vec<AnalysisResult>,
) -> usize {
    let before = out.len();
    out.extend(
        chain
            .side(ticker.option_type)
            .iter()
            .filter_map(|contract| score_contract(ticker, symbol, spot, expiry, contract)),
    );
    out.len() - before
}

/// Highest return first. Stable, so ties keep discovery order.
pub fn rank(results: &mut [AnalysisResult]) {
    results.sort_by(|a, b| b.return_30d.total_cmp(&a.return_30d));
}
