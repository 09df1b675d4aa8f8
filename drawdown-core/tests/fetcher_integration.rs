//! Fetcher behavior against a scripted provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use drawdown_core::data::{DataError, DataProvider, DataSource, PriceCache, PriceFetcher};
use drawdown_core::domain::PriceSeries;
use drawdown_core::drawdown::{compute, HighWaterMode};

/// Provider that counts calls and fails for tickers starting with `X`.
struct CountingProvider {
    calls: Arc<AtomicUsize>,
}

impl DataProvider for CountingProvider {
    fn name(&self) -> &str {
        "counting"
    }

    fn fetch_closes(
        &self,
        ticker: &str,
        start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if ticker.starts_with('X') {
            return Err(DataError::NetworkUnreachable("scripted".into()));
        }
        if ticker == "EMPTY" {
            return Ok(PriceSeries::new(ticker, Vec::new()));
        }
        Ok(PriceSeries::from_closes(
            ticker,
            start,
            &[100.0, 90.0, 80.0, 95.0],
        ))
    }

    fn is_available(&self) -> bool {
        true
    }

    fn source(&self) -> DataSource {
        DataSource::Synthetic
    }
}

fn fetcher(ttl: Duration) -> (PriceFetcher, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = CountingProvider {
        calls: Arc::clone(&calls),
    };
    (
        PriceFetcher::new(Box::new(provider), PriceCache::new(ttl)),
        calls,
    )
}

fn end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

#[test]
fn one_provider_call_per_ttl_window() {
    let (f, calls) = fetcher(Duration::from_secs(300));
    for _ in 0..3 {
        f.fetch_until("SPY", end());
        f.fetch_until("XBAD", end());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn expired_entries_are_refetched() {
    let (f, calls) = fetcher(Duration::from_millis(5));
    f.fetch_until("SPY", end());
    std::thread::sleep(Duration::from_millis(10));
    f.fetch_until("SPY", end());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn refresh_forces_provider_calls() {
    let (f, calls) = fetcher(Duration::from_secs(300));
    f.fetch_until("SPY", end());
    f.fetch_until("XBAD", end());
    f.refresh();
    f.fetch_until("SPY", end());
    f.fetch_until("XBAD", end());
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[test]
fn empty_result_normalizes_to_absent() {
    let (f, _) = fetcher(Duration::from_secs(300));
    let outcome = f.fetch_until("EMPTY", end());
    assert!(outcome.is_absent());
    assert!(matches!(outcome.error, Some(DataError::EmptySeries { .. })));
}

#[test]
fn fetched_series_feeds_the_calculator() {
    let (f, _) = fetcher(Duration::from_secs(300));
    let outcome = f.fetch_until("SPY", end());
    let r = compute(outcome.series.as_ref(), HighWaterMode::Trailing52w).unwrap();
    assert_eq!(r.current, 95.0);
    assert_eq!(r.high, 100.0);
    assert!((r.drawdown_pct + 5.0).abs() < 1e-12);
}
