//! Deterministic synthetic prices for offline demos and tests.
//!
//! Each ticker gets its own random walk seeded from a BLAKE3 hash of the
//! ticker, so the same ticker always produces the same series for the same
//! date range. Weekends are skipped.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{DataError, DataProvider, DataSource};
use crate::domain::{PricePoint, PriceSeries};

/// Largest absolute daily return of the walk.
const MAX_DAILY_MOVE: f64 = 0.03;

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    /// Tickers that fail as if the symbol did not exist.
    unknown: Vec<String>,
}

impl SyntheticProvider {
    pub fn new() -> Self {
        Self {
            unknown: Vec::new(),
        }
    }

    /// Make `tickers` fail with `SymbolNotFound`.
    pub fn with_unknown<I, S>(mut self, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unknown.extend(tickers.into_iter().map(Into::into));
        self
    }
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate the walk for `ticker` over `[start, end]`.
pub fn synthetic_series(ticker: &str, start: NaiveDate, end: NaiveDate) -> PriceSeries {
    let seed: [u8; 32] = *blake3::hash(ticker.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    // Starting level varies per ticker so cards don't all read 100.
    let mut price = rng.gen_range(20.0..400.0_f64);
    let mut points = Vec::new();
    let mut current = start;

    while current <= end {
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            let daily_return: f64 = rng.gen_range(-MAX_DAILY_MOVE..MAX_DAILY_MOVE);
            price *= 1.0 + daily_return;
            points.push(PricePoint {
                date: current,
                close: price,
            });
        }
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }

    PriceSeries::new(ticker, points)
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch_closes(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        if self.unknown.iter().any(|t| t == ticker) {
            return Err(DataError::SymbolNotFound {
                symbol: ticker.to_string(),
            });
        }
        let series = synthetic_series(ticker, start, end);
        if series.is_empty() {
            return Err(DataError::EmptySeries {
                symbol: ticker.to_string(),
            });
        }
        Ok(series)
    }

    fn is_available(&self) -> bool {
        true
    }

    fn source(&self) -> DataSource {
        DataSource::Synthetic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn same_ticker_same_series() {
        let a = synthetic_series("NVDA", d(2024, 1, 1), d(2024, 6, 30));
        let b = synthetic_series("NVDA", d(2024, 1, 1), d(2024, 6, 30));
        assert_eq!(a, b);
        let c = synthetic_series("MSFT", d(2024, 1, 1), d(2024, 6, 30));
        assert_ne!(a.points()[0].close, c.points()[0].close);
    }

    #[test]
    fn weekdays_only_and_positive() {
        let s = synthetic_series("SPY", d(2024, 1, 1), d(2024, 1, 14));
        assert_eq!(s.len(), 10);
        assert!(s
            .points()
            .iter()
            .all(|p| !matches!(p.date.weekday(), Weekday::Sat | Weekday::Sun)));
        assert!(s.closes().all(|c| c > 0.0));
    }

    #[test]
    fn weekend_only_range_is_empty_error() {
        let p = SyntheticProvider::new();
        assert!(matches!(
            p.fetch_closes("SPY", d(2024, 1, 6), d(2024, 1, 7)),
            Err(DataError::EmptySeries { .. })
        ));
    }

    #[test]
    fn unknown_tickers_fail() {
        let p = SyntheticProvider::new().with_unknown(["ZZZZ"]);
        assert!(p.fetch_closes("ZZZZ", d(2024, 1, 1), d(2024, 2, 1)).is_err());
        assert!(p.fetch_closes("SPY", d(2024, 1, 1), d(2024, 2, 1)).is_ok());
    }
}
