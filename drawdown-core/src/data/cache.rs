//! In-memory price cache with a fixed time-to-live.
//!
//! Maps ticker to `(series, fetched_at)`. Failed fetches are stored too, as
//! `None`, so a ticker that failed is not retried until its entry goes stale.
//! An entry is fresh while `now - fetched_at < ttl`. Writers replace whole
//! entries; the last writer wins.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::domain::PriceSeries;

/// Five minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CacheEntry {
    series: Option<Arc<PriceSeries>>,
    fetched_at: Instant,
}

/// A fresh cache hit.
#[derive(Debug, Clone)]
pub struct CachedFetch {
    /// `None` when the cached fetch failed.
    pub series: Option<Arc<PriceSeries>>,
    pub age: Duration,
}

#[derive(Debug)]
pub struct PriceCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl PriceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The fresh entry for `ticker`, if any. Stale entries are dropped.
    pub fn get(&self, ticker: &str) -> Option<CachedFetch> {
        let mut entries = self.lock();
        let age = entries.get(ticker)?.fetched_at.elapsed();
        if age >= self.ttl {
            entries.remove(ticker);
            return None;
        }
        entries.get(ticker).map(|e| CachedFetch {
            series: e.series.clone(),
            age,
        })
    }

    pub fn insert(&self, ticker: &str, series: Option<Arc<PriceSeries>>) {
        self.lock().insert(
            ticker.to_string(),
            CacheEntry {
                series,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut entries = self.lock();
        let dropped = entries.len();
        entries.clear();
        tracing::debug!(dropped, "price cache cleared");
    }

    /// Entries held, fresh or not.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
