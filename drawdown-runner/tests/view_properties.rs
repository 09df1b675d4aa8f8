//! Property tests for filtering, sorting and summaries.

use std::sync::Arc;

use proptest::prelude::*;

use drawdown_core::domain::{Instrument, PriceSeries};
use drawdown_core::drawdown::{compute, HighWaterMode};
use drawdown_runner::session::{MinDrawdown, SessionFilters, SortOrder, MIN_DRAWDOWN_STOPS};
use drawdown_runner::view::{filter_results, sort_results, View};
use drawdown_runner::InstrumentDrawdown;

fn result(i: usize, current: f64) -> InstrumentDrawdown {
    let ticker = format!("T{i:03}");
    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let series = Arc::new(PriceSeries::from_closes(&ticker, start, &[100.0, current]));
    InstrumentDrawdown {
        instrument: Instrument::custom(&ticker),
        drawdown: compute(Some(&series), HighWaterMode::AllTimeHigh).unwrap(),
    }
}

/// Closes at or below 100 with a deliberate share of exact ties.
fn arb_results() -> impl Strategy<Value = Vec<InstrumentDrawdown>> {
    prop::collection::vec(
        prop_oneof![1.0..=100.0_f64, Just(80.0), Just(50.0)],
        0..40,
    )
    .prop_map(|closes| {
        closes
            .into_iter()
            .enumerate()
            .map(|(i, c)| result(i, c))
            .collect()
    })
}

fn tickers(items: &[&InstrumentDrawdown]) -> Vec<String> {
    items.iter().map(|r| r.ticker().to_string()).collect()
}

proptest! {
    #[test]
    fn best_first_reverses_worst_first(results in arb_results()) {
        let mut worst: Vec<&InstrumentDrawdown> = results.iter().collect();
        let mut best = worst.clone();
        sort_results(&mut worst, SortOrder::WorstFirst);
        sort_results(&mut best, SortOrder::BestFirst);
        let mut reversed = tickers(&worst);
        reversed.reverse();
        prop_assert_eq!(tickers(&best), reversed);
    }

    #[test]
    fn filter_keeps_only_deep_enough(results in arb_results(), stop in 0..MIN_DRAWDOWN_STOPS.len()) {
        let min = MinDrawdown::new(MIN_DRAWDOWN_STOPS[stop]).unwrap();
        let kept = filter_results(&results, min);
        let threshold = -(min.pct() as f64);
        prop_assert!(kept.iter().all(|r| r.drawdown_pct() <= threshold));
        let dropped = results.len() - kept.len();
        prop_assert_eq!(
            dropped,
            results.iter().filter(|r| r.drawdown_pct() > threshold).count()
        );
    }

    #[test]
    fn min_zero_keeps_everything(results in arb_results()) {
        prop_assert_eq!(filter_results(&results, MinDrawdown::default()).len(), results.len());
    }

    #[test]
    fn summary_matches_view(results in arb_results()) {
        let filters = SessionFilters::default();
        let view = View::build(&results, &filters);
        match view.summary {
            None => prop_assert!(results.is_empty()),
            Some(s) => {
                prop_assert_eq!(s.count, results.len());
                prop_assert!(s.worst_drawdown <= s.mean_drawdown + 1e-9);
                prop_assert!(s.mean_drawdown <= s.best_drawdown + 1e-9);
                prop_assert!(s.danger_count <= s.caution_count);
                prop_assert_eq!(view.items[0].drawdown_pct(), s.worst_drawdown);
            }
        }
    }
}
