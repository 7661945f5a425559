use chrono::{DateTime, NaiveDate, NaiveTime};

const DAY_MS: i64 = 86_400_000;

/// An expiration that passed the day window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    /// Unix seconds, as listed by the provider.
    pub timestamp: i64,
    /// Calendar date of the timestamp (UTC).
    pub date: NaiveDate,
    pub days: i64,
}

/// Inclusive `[min_days, max_days]` window on days to expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub min_days: i64,
    pub max_days: i64,
}

impl DayWindow {
    pub fn new(min_days: i64, max_days: i64) -> Self {
        Self { min_days, max_days }
    }

    /// Day counts below 1 never qualify: the return formula divides by them.
    pub fn contains(&self, days: i64) -> bool {
        days >= 1 && days >= self.min_days && days <= self.max_days
    }

    pub fn resolve(&self, today: NaiveDate, timestamp: i64) -> Option<Expiry> {
        let date = DateTime::from_timestamp(timestamp, 0)?.date_naive();
        let days = days_to_expiry(today, timestamp)?;
        self.contains(days).then_some(Expiry {
            timestamp,
            date,
            days,
        })
    }

    /// Qualifying expirations, in provider order.
    pub fn qualifying(&self, today: NaiveDate, expirations: &[i64]) -> Vec<Expiry> {
        expirations
            .iter()
            .filter_map(|&ts| self.resolve(today, ts))
            .collect()
    }
}

/// `ceil((expiry − today_midnight) / 1 day)`, with today's midnight in UTC.
pub fn days_to_expiry(today: NaiveDate, timestamp: i64) -> Option<i64> {
    let expiry = DateTime::from_timestamp(timestamp, 0)?;
    let midnight = today.and_time(NaiveTime::MIN).and_utc();
    let ms = (expiry - midnight).num_milliseconds();
    let whole = ms.div_euclid(DAY_MS);
    Some(if ms.rem_euclid(DAY_MS) > 0 { whole + 1 } else { whole })
}
