//! Cached price fetching.
//!
//! `PriceFetcher` puts a [`PriceCache`] in front of a [`DataProvider`]. It
//! never fails: provider errors and empty results are logged and become an
//! absent series, which is cached like a success for the rest of the TTL.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use super::cache::PriceCache;
use super::provider::{DataError, DataProvider, DataSource};
use crate::domain::PriceSeries;

/// About two years of calendar days.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 730;

/// What one `fetch` produced.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub series: Option<Arc<PriceSeries>>,
    /// Served from the cache without touching the provider.
    pub cached: bool,
    /// `Cache` on a hit, else the provider's source.
    pub source: DataSource,
    /// The provider error, when this call hit the provider and it failed.
    pub error: Option<DataError>,
}

impl FetchOutcome {
    pub fn is_absent(&self) -> bool {
        self.series.is_none()
    }
}

pub struct PriceFetcher {
    provider: Box<dyn DataProvider>,
    cache: PriceCache,
    lookback_days: i64,
}

impl PriceFetcher {
    pub fn new(provider: Box<dyn DataProvider>, cache: PriceCache) -> Self {
        Self {
            provider,
            cache,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }

    pub fn with_lookback_days(mut self, days: i64) -> Self {
        self.lookback_days = days.max(1);
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn cache(&self) -> &PriceCache {
        &self.cache
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache.ttl()
    }

    /// Fetch closes ending today (local date).
    pub fn fetch(&self, ticker: &str) -> FetchOutcome {
        self.fetch_until(ticker, chrono::Local::now().date_naive())
    }

    /// Fetch closes over the lookback window ending at `end`.
    pub fn fetch_until(&self, ticker: &str, end: NaiveDate) -> FetchOutcome {
        if let Some(hit) = self.cache.get(ticker) {
            tracing::debug!(%ticker, age_ms = hit.age.as_millis() as u64, "cache hit");
            return FetchOutcome {
                series: hit.series,
                cached: true,
                source: DataSource::Cache,
                error: None,
            };
        }

        let start = end - chrono::Duration::days(self.lookback_days);
        let (series, error) = match self.provider.fetch_closes(ticker, start, end) {
            Ok(series) if series.is_empty() => {
                let err = DataError::EmptySeries {
                    symbol: ticker.to_string(),
                };
                tracing::warn!(%ticker, error = %err, "fetch failed");
                (None, Some(err))
            }
            Ok(series) => {
                tracing::debug!(
                    %ticker,
                    points = series.len(),
                    provider = self.provider.name(),
                    "fetched closes"
                );
                (Some(Arc::new(series)), None)
            }
            Err(err) => {
                tracing::warn!(%ticker, error = %err, "fetch failed");
                (None, Some(err))
            }
        };

        self.cache.insert(ticker, series.clone());
        FetchOutcome {
            series,
            cached: false,
            source: self.provider.source(),
            error,
        }
    }

    /// Invalidate every cached entry so the next fetch goes to the provider.
    pub fn refresh(&self) {
        tracing::info!(entries = self.cache.len(), "refreshing price cache");
        self.cache.clear();
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SyntheticProvider;

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    #[test]
    fn second_fetch_is_cached() {
        let f = PriceFetcher::new(Box::new(SyntheticProvider::new()), PriceCache::default());
        let first = f.fetch_until("SPY", end());
        assert!(!first.cached);
        assert_eq!(first.source, DataSource::Synthetic);
        assert!(first.series.is_some());
        let second = f.fetch_until("SPY", end());
        assert!(second.cached);
        assert_eq!(second.source, DataSource::Cache);
        assert!(Arc::ptr_eq(
            first.series.as_ref().unwrap(),
            second.series.as_ref().unwrap()
        ));
    }

    #[test]
    fn failure_is_absent_and_cached() {
        let provider = SyntheticProvider::new().with_unknown(["ZZZZ"]);
        let f = PriceFetcher::new(Box::new(provider), PriceCache::default());
        let first = f.fetch_until("ZZZZ", end());
        assert!(first.is_absent());
        assert!(matches!(first.error, Some(DataError::SymbolNotFound { .. })));
        let second = f.fetch_until("ZZZZ", end());
        assert!(second.is_absent());
        assert!(second.cached);
        assert!(second.error.is_none());
    }

    #[test]
    fn refresh_clears_cache() {
        let f = PriceFetcher::new(Box::new(SyntheticProvider::new()), PriceCache::default());
        f.fetch_until("SPY", end());
        f.refresh();
        assert!(f.cache().is_empty());
        assert!(!f.fetch_until("SPY", end()).cached);
    }

    #[test]
    fn lookback_bounds_the_series() {
        let f = PriceFetcher::new(Box::new(SyntheticProvider::new()), PriceCache::default())
            .with_lookback_days(14);
        let s = f.fetch_until("SPY", end()).series.unwrap();
        assert!(s.first_date().unwrap() >= end() - chrono::Duration::days(14));
        assert_eq!(s.last_date(), Some(end()));
    }
}
