//! Aggregation for display: filtering, sorting, summary metrics and tabs.

use std::cmp::Ordering;

use drawdown_core::catalog::Catalog;
use drawdown_core::domain::{PricePoint, CUSTOM_CATEGORY};
use drawdown_core::drawdown::DrawdownResult;
use drawdown_core::severity::{Severity, CAUTION_THRESHOLD, DANGER_THRESHOLD};

use crate::loader::InstrumentDrawdown;
use crate::session::{MinDrawdown, SessionFilters, SortOrder};

/// Closes shown in a card's mini chart.
pub const CARD_HISTORY: usize = 90;

/// Cards per grid row.
pub const CARDS_PER_ROW: usize = 3;

/// Horizontal guides on the comparison chart, each drawn in its tier's color.
pub const REFERENCE_LINES: [(f64, Severity); 4] = [
    (-10.0, Severity::Stable),
    (-20.0, Severity::Caution),
    (-35.0, Severity::Alert),
    (-50.0, Severity::Danger),
];

/// Results passing the minimum-drawdown filter, in input order.
pub fn filter_results(
    results: &[InstrumentDrawdown],
    min: MinDrawdown,
) -> Vec<&InstrumentDrawdown> {
    results
        .iter()
        .filter(|r| min.keeps(r.drawdown_pct()))
        .collect()
}

fn worst_first(a: &InstrumentDrawdown, b: &InstrumentDrawdown) -> Ordering {
    a.drawdown_pct()
        .total_cmp(&b.drawdown_pct())
        .then_with(|| a.ticker().cmp(b.ticker()))
}

fn alphabetical(a: &InstrumentDrawdown, b: &InstrumentDrawdown) -> Ordering {
    a.ticker()
        .to_ascii_lowercase()
        .cmp(&b.ticker().to_ascii_lowercase())
        .then_with(|| a.ticker().cmp(b.ticker()))
}

/// Sort in place. `BestFirst` is the exact reverse of `WorstFirst`.
pub fn sort_results(items: &mut [&InstrumentDrawdown], order: SortOrder) {
    match order {
        SortOrder::WorstFirst => items.sort_by(|a, b| worst_first(a, b)),
        SortOrder::BestFirst => items.sort_by(|a, b| worst_first(b, a)),
        SortOrder::Alphabetical => items.sort_by(|a, b| alphabetical(a, b)),
    }
}

/// Headline metrics over a filtered set.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean_drawdown: f64,
    pub worst_ticker: String,
    pub worst_drawdown: f64,
    pub best_ticker: String,
    pub best_drawdown: f64,
    /// Drawdown ≤ -35%.
    pub danger_count: usize,
    /// Drawdown ≤ -20%.
    pub caution_count: usize,
}

impl Summary {
    /// `None` for an empty set. Ties on worst/best go to the first encountered.
    pub fn of(items: &[&InstrumentDrawdown]) -> Option<Self> {
        let first = items.first()?;
        let mut worst = *first;
        let mut best = *first;
        let mut sum = 0.0;
        let mut danger_count = 0;
        let mut caution_count = 0;

        for &item in items {
            let dd = item.drawdown_pct();
            sum += dd;
            if dd < worst.drawdown_pct() {
                worst = item;
            }
            if dd > best.drawdown_pct() {
                best = item;
            }
            if dd <= DANGER_THRESHOLD {
                danger_count += 1;
            }
            if dd <= CAUTION_THRESHOLD {
                caution_count += 1;
            }
        }

        Some(Summary {
            count: items.len(),
            mean_drawdown: sum / items.len() as f64,
            worst_ticker: worst.ticker().to_string(),
            worst_drawdown: worst.drawdown_pct(),
            best_ticker: best.ticker().to_string(),
            best_drawdown: best.drawdown_pct(),
            danger_count,
            caution_count,
        })
    }
}

/// The filtered, sorted set plus its summary.
#[derive(Debug, Clone)]
pub struct View<'a> {
    pub items: Vec<&'a InstrumentDrawdown>,
    /// Absent when nothing matches the filter.
    pub summary: Option<Summary>,
}

impl<'a> View<'a> {
    pub fn build(results: &'a [InstrumentDrawdown], filters: &SessionFilters) -> Self {
        // Summary is taken in load order so ties resolve independently of the sort.
        let mut items = filter_results(results, filters.min_drawdown);
        let summary = Summary::of(&items);
        sort_results(&mut items, filters.sort);
        View { items, summary }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A card tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tab {
    All,
    Category(String),
    Custom,
}

impl Tab {
    pub fn label(&self) -> &str {
        match self {
            Tab::All => "All",
            Tab::Category(name) => name.as_str(),
            Tab::Custom => CUSTOM_CATEGORY,
        }
    }
}

/// `All`, one tab per category in catalog order, then `Custom` when tickers were added.
pub fn tabs(catalog: &Catalog, filters: &SessionFilters) -> Vec<Tab> {
    let mut tabs = vec![Tab::All];
    tabs.extend(
        catalog
            .categories()
            .iter()
            .map(|c| Tab::Category(c.name.clone())),
    );
    if filters.has_extras() {
        tabs.push(Tab::Custom);
    }
    tabs
}

/// Filtered and sorted items for one tab.
pub fn tab_items<'a>(
    tab: &Tab,
    results: &'a [InstrumentDrawdown],
    filters: &SessionFilters,
) -> Vec<&'a InstrumentDrawdown> {
    let mut items: Vec<&InstrumentDrawdown> = match tab {
        Tab::All => filter_results(results, filters.min_drawdown),
        Tab::Category(name) => results
            .iter()
            .filter(|r| r.instrument.category == *name)
            .filter(|r| filters.min_drawdown.keeps(r.drawdown_pct()))
            .collect(),
        // Added tickers in the order they were added, catalog duplicates included.
        Tab::Custom => filters
            .extra_tickers()
            .iter()
            .filter_map(|t| results.iter().find(|r| r.ticker() == t))
            .filter(|r| filters.min_drawdown.keeps(r.drawdown_pct()))
            .collect(),
    };
    sort_results(&mut items, filters.sort);
    items
}

/// Closes for a card's mini chart.
pub fn card_history(result: &DrawdownResult) -> &[PricePoint] {
    result.series.tail(CARD_HISTORY)
}

/// Width of a card's drawdown bar in percent: `min(|dd|, 100)`.
pub fn bar_fill(drawdown_pct: f64) -> f64 {
    drawdown_pct.abs().min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MinDrawdown;
    use drawdown_core::domain::{Instrument, PriceSeries};
    use drawdown_core::drawdown::{compute, HighWaterMode};
    use std::sync::Arc;

    fn result(ticker: &str, category: &str, dd: f64) -> InstrumentDrawdown {
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let current = 100.0 + dd;
        let series = Arc::new(PriceSeries::from_closes(ticker, start, &[100.0, current]));
        InstrumentDrawdown {
            instrument: Instrument::new(ticker, ticker, category, "#000000"),
            drawdown: compute(Some(&series), HighWaterMode::AllTimeHigh).unwrap(),
        }
    }

    fn tickers(items: &[&InstrumentDrawdown]) -> Vec<String> {
        items.iter().map(|r| r.ticker().to_string()).collect()
    }

    fn filters(min: u32, sort: SortOrder) -> SessionFilters {
        SessionFilters::new(
            HighWaterMode::Trailing52w,
            sort,
            MinDrawdown::new(min).unwrap(),
        )
    }

    #[test]
    fn min_twenty_worst_first() {
        let results = vec![
            result("A", "X", -15.0),
            result("B", "X", -25.0),
            result("C", "X", -40.0),
        ];
        let view = View::build(&results, &filters(20, SortOrder::WorstFirst));
        assert_eq!(tickers(&view.items), vec!["C", "B"]);
        let s = view.summary.unwrap();
        assert_eq!(s.count, 2);
        assert!((s.mean_drawdown + 32.5).abs() < 1e-9);
        assert_eq!(s.worst_ticker, "C");
        assert_eq!(s.best_ticker, "B");
        assert_eq!(s.danger_count, 1);
        assert_eq!(s.caution_count, 2);
    }

    #[test]
    fn empty_filter_has_no_summary() {
        let results = vec![result("A", "X", -3.0)];
        let view = View::build(&results, &filters(50, SortOrder::WorstFirst));
        assert!(view.is_empty());
        assert!(view.summary.is_none());
    }

    #[test]
    fn summary_ties_go_to_first_encountered() {
        let results = vec![
            result("B", "X", -10.0),
            result("A", "X", -10.0),
        ];
        let items: Vec<&InstrumentDrawdown> = results.iter().collect();
        let s = Summary::of(&items).unwrap();
        assert_eq!(s.worst_ticker, "B");
        assert_eq!(s.best_ticker, "B");
    }

    #[test]
    fn alphabetical_is_case_insensitive() {
        let results = vec![
            result("b", "X", -1.0),
            result("C", "X", -2.0),
            result("a", "X", -3.0),
        ];
        let view = View::build(&results, &filters(0, SortOrder::Alphabetical));
        assert_eq!(tickers(&view.items), vec!["a", "b", "C"]);
    }

    #[test]
    fn tabs_and_category_items() {
        let catalog = Catalog::builtin();
        let mut f = filters(0, SortOrder::WorstFirst);
        assert_eq!(tabs(&catalog, &f).len(), 7);
        f.add_tickers("UBER, NVDA");
        let t = tabs(&catalog, &f);
        assert_eq!(t.len(), 8);
        assert_eq!(t.last(), Some(&Tab::Custom));

        let results = vec![
            result("NVDA", "Big Tech / AI", -12.0),
            result("MSFT", "Big Tech / AI", -30.0),
            result("JPM", "Financials / Asset Management", -2.0),
            result("UBER", CUSTOM_CATEGORY, -8.0),
        ];
        let big_tech = tab_items(&Tab::Category("Big Tech / AI".into()), &results, &f);
        assert_eq!(tickers(&big_tech), vec!["MSFT", "NVDA"]);
        let custom = tab_items(&Tab::Custom, &results, &f);
        assert_eq!(tickers(&custom), vec!["NVDA", "UBER"]);
        assert_eq!(tab_items(&Tab::All, &results, &f).len(), 4);
    }

    #[test]
    fn bar_fill_is_capped() {
        assert_eq!(bar_fill(-12.5), 12.5);
        assert_eq!(bar_fill(-150.0), 100.0);
        assert_eq!(bar_fill(0.0), 0.0);
    }

    #[test]
    fn card_history_is_last_ninety() {
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let closes: Vec<f64> = (1..=200).map(f64::from).collect();
        let s = Arc::new(PriceSeries::from_closes("X", start, &closes));
        let r = compute(Some(&s), HighWaterMode::AllTimeHigh).unwrap();
        let hist = card_history(&r);
        assert_eq!(hist.len(), CARD_HISTORY);
        assert_eq!(hist[0].close, 111.0);
    }
}
