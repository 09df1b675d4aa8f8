//! Batch loading of instrument prices with progress reporting.
//!
//! Instruments are fetched one at a time, in order, through the cached
//! [`PriceFetcher`]. A ticker whose fetch comes back absent goes onto the
//! failed list; loading never stops early.

use std::io::Write;
use std::sync::Arc;

use drawdown_core::data::{DataSource, FetchOutcome, PriceFetcher};
use drawdown_core::domain::{Instrument, PriceSeries};
use drawdown_core::drawdown::{compute, DrawdownResult, HighWaterMode};
use drawdown_core::severity::Severity;

/// Callback for per-ticker progress.
pub trait LoadProgress: Send + Sync {
    fn on_start(&self, ticker: &str, index: usize, total: usize);
    fn on_complete(&self, ticker: &str, index: usize, total: usize, outcome: &FetchOutcome);
    fn on_batch_complete(&self, loaded: usize, failed: usize, total: usize);
}

/// Progress sink that reports nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl LoadProgress for SilentProgress {
    fn on_start(&self, _ticker: &str, _index: usize, _total: usize) {}
    fn on_complete(&self, _ticker: &str, _index: usize, _total: usize, _outcome: &FetchOutcome) {}
    fn on_batch_complete(&self, _loaded: usize, _failed: usize, _total: usize) {}
}

/// Progress printed to stdout, one line per ticker.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutProgress;

impl LoadProgress for StdoutProgress {
    fn on_start(&self, ticker: &str, index: usize, total: usize) {
        print!("[{}/{total}] {ticker}...", index + 1);
        let _ = std::io::stdout().flush();
    }

    fn on_complete(&self, _ticker: &str, _index: usize, _total: usize, outcome: &FetchOutcome) {
        match (&outcome.series, &outcome.error) {
            (Some(s), _) if outcome.cached => println!(" cached ({} closes)", s.len()),
            (Some(s), _) => println!(" ok ({} closes, {})", s.len(), outcome.source.label()),
            (None, Some(e)) => println!(" FAILED: {e}"),
            (None, None) => println!(" FAILED (cached)"),
        }
    }

    fn on_batch_complete(&self, loaded: usize, failed: usize, total: usize) {
        println!("\nLoaded {loaded}/{total} tickers, {failed} failed");
    }
}

/// One instrument after loading.
#[derive(Debug, Clone)]
pub struct LoadedInstrument {
    pub instrument: Instrument,
    pub series: Option<Arc<PriceSeries>>,
    pub cached: bool,
    pub source: DataSource,
}

/// A computed drawdown together with the instrument it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentDrawdown {
    pub instrument: Instrument,
    pub drawdown: DrawdownResult,
}

impl InstrumentDrawdown {
    pub fn ticker(&self) -> &str {
        &self.instrument.ticker
    }

    pub fn drawdown_pct(&self) -> f64 {
        self.drawdown.drawdown_pct
    }

    pub fn severity(&self) -> Severity {
        self.drawdown.severity()
    }
}

/// Everything one load pass produced.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Instruments in load order, failed ones included.
    pub entries: Vec<LoadedInstrument>,
    /// Failed tickers in load order.
    pub failed: Vec<String>,
}

impl LoadReport {
    pub fn loaded_count(&self) -> usize {
        self.entries.len() - self.failed.len()
    }

    /// The one-line warning shown when anything failed.
    pub fn failure_warning(&self) -> Option<String> {
        if self.failed.is_empty() {
            None
        } else {
            Some(format!("Failed to load: {}", self.failed.join(", ")))
        }
    }

    /// Drawdowns for every loaded instrument under `mode`, in load order.
    pub fn compute(&self, mode: HighWaterMode) -> Vec<InstrumentDrawdown> {
        self.entries
            .iter()
            .filter_map(|e| {
                compute(e.series.as_ref(), mode).map(|drawdown| InstrumentDrawdown {
                    instrument: e.instrument.clone(),
                    drawdown,
                })
            })
            .collect()
    }
}

/// Fetch every instrument in order and collect the results.
pub fn load_instruments(
    fetcher: &PriceFetcher,
    instruments: &[Instrument],
    progress: &dyn LoadProgress,
) -> LoadReport {
    let total = instruments.len();
    if !fetcher.is_available() {
        tracing::warn!(
            provider = fetcher.provider_name(),
            "provider unavailable, uncached tickers will fail"
        );
    }
    let mut report = LoadReport {
        entries: Vec::with_capacity(total),
        failed: Vec::new(),
    };

    for (i, instrument) in instruments.iter().enumerate() {
        let ticker = instrument.ticker.as_str();
        progress.on_start(ticker, i, total);

        let outcome = fetcher.fetch(ticker);
        progress.on_complete(ticker, i, total, &outcome);

        // A series that is present but yields no drawdown counts as failed too.
        let usable = outcome
            .series
            .as_ref()
            .is_some_and(|s| compute(Some(s), HighWaterMode::AllTimeHigh).is_some());
        if !usable {
            report.failed.push(ticker.to_string());
        }

        report.entries.push(LoadedInstrument {
            instrument: instrument.clone(),
            series: outcome.series,
            cached: outcome.cached,
            source: outcome.source,
        });
    }

    let failed = report.failed.len();
    tracing::info!(
        total,
        loaded = total - failed,
        failed,
        provider = fetcher.provider_name(),
        "load complete"
    );
    if failed > 0 {
        tracing::warn!(tickers = %report.failed.join(","), "some tickers failed to load");
    }
    progress.on_batch_complete(total - failed, failed, total);

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawdown_core::data::{PriceCache, SyntheticProvider};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl LoadProgress for Recorder {
        fn on_start(&self, ticker: &str, index: usize, total: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("start {ticker} {index}/{total}"));
        }
        fn on_complete(&self, ticker: &str, _index: usize, _total: usize, o: &FetchOutcome) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done {ticker} {}", o.series.is_some()));
        }
        fn on_batch_complete(&self, loaded: usize, failed: usize, total: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("batch {loaded} {failed} {total}"));
        }
    }

    fn fetcher() -> PriceFetcher {
        let provider = SyntheticProvider::new().with_unknown(["ZZZZ", "QQQQ"]);
        PriceFetcher::new(Box::new(provider), PriceCache::default())
    }

    #[test]
    fn failed_tickers_in_load_order() {
        let instruments = vec![
            Instrument::custom("QQQQ"),
            Instrument::custom("SPY"),
            Instrument::custom("ZZZZ"),
        ];
        let report = load_instruments(&fetcher(), &instruments, &SilentProgress);
        assert_eq!(report.failed, vec!["QQQQ", "ZZZZ"]);
        assert_eq!(report.loaded_count(), 1);
        assert_eq!(
            report.failure_warning().as_deref(),
            Some("Failed to load: QQQQ, ZZZZ")
        );
        let results = report.compute(HighWaterMode::Trailing52w);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].ticker(), "SPY");
    }

    #[test]
    fn progress_events_in_order() {
        let rec = Recorder::default();
        let instruments = vec![Instrument::custom("SPY"), Instrument::custom("ZZZZ")];
        load_instruments(&fetcher(), &instruments, &rec);
        let events = rec.events.into_inner().unwrap();
        assert_eq!(
            events,
            vec![
                "start SPY 0/2",
                "done SPY true",
                "start ZZZZ 1/2",
                "done ZZZZ false",
                "batch 1 1 2",
            ]
        );
    }

    #[test]
    fn second_load_is_served_from_cache() {
        let f = fetcher();
        let instruments = vec![Instrument::custom("SPY")];
        let first = load_instruments(&f, &instruments, &SilentProgress);
        let second = load_instruments(&f, &instruments, &SilentProgress);
        assert!(!first.entries[0].cached);
        assert!(second.entries[0].cached);
        assert_eq!(first.entries[0].source, DataSource::Synthetic);
        assert_eq!(second.entries[0].source, DataSource::Cache);
    }

    /// Provider whose breaker is open: every fetch is refused.
    struct BlockedProvider;

    impl drawdown_core::data::DataProvider for BlockedProvider {
        fn name(&self) -> &str {
            "blocked"
        }

        fn fetch_closes(
            &self,
            _ticker: &str,
            _start: chrono::NaiveDate,
            _end: chrono::NaiveDate,
        ) -> Result<PriceSeries, drawdown_core::data::DataError> {
            Err(drawdown_core::data::DataError::CircuitBreakerTripped)
        }

        fn is_available(&self) -> bool {
            false
        }

        fn source(&self) -> DataSource {
            DataSource::YahooFinance
        }
    }

    #[test]
    fn unavailable_provider_fails_every_ticker() {
        let f = PriceFetcher::new(Box::new(BlockedProvider), PriceCache::default());
        assert!(!f.is_available());
        let instruments = vec![Instrument::custom("SPY"), Instrument::custom("QQQ")];
        let report = load_instruments(&f, &instruments, &SilentProgress);
        assert_eq!(report.failed, vec!["SPY", "QQQ"]);
        assert_eq!(report.loaded_count(), 0);
        assert!(report.compute(HighWaterMode::AllTimeHigh).is_empty());
    }

    #[test]
    fn mode_changes_recompute_without_refetch() {
        let report = load_instruments(&fetcher(), &[Instrument::custom("SPY")], &SilentProgress);
        let trailing = report.compute(HighWaterMode::Trailing52w);
        let ath = report.compute(HighWaterMode::AllTimeHigh);
        assert!(ath[0].drawdown.high >= trailing[0].drawdown.high);
        assert!(Arc::ptr_eq(&ath[0].drawdown.series, &trailing[0].drawdown.series));
    }
}
