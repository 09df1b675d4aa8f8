//! Per-session user selections.
//!
//! `SessionFilters` is an explicit value owned by whoever drives the session
//! (TUI app or CLI command) and passed into aggregation. It is only changed
//! by user actions and is never persisted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use drawdown_core::catalog::Catalog;
use drawdown_core::domain::{normalize_ticker, parse_ticker_list, Instrument};
use drawdown_core::drawdown::HighWaterMode;

/// Slider stops for the minimum-drawdown filter, in percent.
pub const MIN_DRAWDOWN_STOPS: [u32; 8] = [0, 5, 10, 15, 20, 30, 40, 50];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("minimum drawdown {0}% is not a slider stop (0, 5, 10, 15, 20, 30, 40, 50)")]
    InvalidMinDrawdown(u32),

    #[error("unknown sort order '{0}' (expected worst_first, best_first or alphabetical)")]
    UnknownSort(String),
}

/// Minimum drawdown filter. Always one of [`MIN_DRAWDOWN_STOPS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct MinDrawdown(u32);

impl MinDrawdown {
    pub fn new(pct: u32) -> Result<Self, SessionError> {
        if MIN_DRAWDOWN_STOPS.contains(&pct) {
            Ok(Self(pct))
        } else {
            Err(SessionError::InvalidMinDrawdown(pct))
        }
    }

    pub fn pct(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        MIN_DRAWDOWN_STOPS
            .iter()
            .position(|&s| s == self.0)
            .unwrap_or(0)
    }

    /// Next stop up, saturating at 50.
    pub fn next(self) -> Self {
        let i = (self.index() + 1).min(MIN_DRAWDOWN_STOPS.len() - 1);
        Self(MIN_DRAWDOWN_STOPS[i])
    }

    /// Next stop down, saturating at 0.
    pub fn prev(self) -> Self {
        Self(MIN_DRAWDOWN_STOPS[self.index().saturating_sub(1)])
    }

    /// Whether a drawdown passes: `dd <= -min`.
    pub fn keeps(self, drawdown_pct: f64) -> bool {
        drawdown_pct <= -(self.0 as f64)
    }

    pub fn label(self) -> String {
        if self.0 == 0 {
            "show all".to_string()
        } else {
            format!("-{}% or worse", self.0)
        }
    }
}

impl TryFrom<u32> for MinDrawdown {
    type Error = SessionError;

    fn try_from(pct: u32) -> Result<Self, Self::Error> {
        Self::new(pct)
    }
}

impl From<MinDrawdown> for u32 {
    fn from(m: MinDrawdown) -> u32 {
        m.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    WorstFirst,
    BestFirst,
    Alphabetical,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [
        SortOrder::WorstFirst,
        SortOrder::BestFirst,
        SortOrder::Alphabetical,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SortOrder::WorstFirst => "worst_first",
            SortOrder::BestFirst => "best_first",
            SortOrder::Alphabetical => "alphabetical",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::WorstFirst => "Worst first",
            SortOrder::BestFirst => "Best first",
            SortOrder::Alphabetical => "Alphabetical",
        }
    }

    /// Cycle worst -> best -> alphabetical -> worst.
    pub fn next(self) -> Self {
        match self {
            SortOrder::WorstFirst => SortOrder::BestFirst,
            SortOrder::BestFirst => SortOrder::Alphabetical,
            SortOrder::Alphabetical => SortOrder::WorstFirst,
        }
    }
}

impl FromStr for SortOrder {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "worst_first" | "worst" => Ok(SortOrder::WorstFirst),
            "best_first" | "best" => Ok(SortOrder::BestFirst),
            "alphabetical" | "alpha" | "ticker" => Ok(SortOrder::Alphabetical),
            _ => Err(SessionError::UnknownSort(s.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Everything the user can change during a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionFilters {
    pub mode: HighWaterMode,
    pub sort: SortOrder,
    pub min_drawdown: MinDrawdown,
    extra_tickers: Vec<String>,
}

impl SessionFilters {
    pub fn new(mode: HighWaterMode, sort: SortOrder, min_drawdown: MinDrawdown) -> Self {
        Self {
            mode,
            sort,
            min_drawdown,
            extra_tickers: Vec::new(),
        }
    }

    /// User-added tickers in the order they were added.
    pub fn extra_tickers(&self) -> &[String] {
        &self.extra_tickers
    }

    pub fn has_extras(&self) -> bool {
        !self.extra_tickers.is_empty()
    }

    /// Add every ticker in a comma-separated input. Returns the ones that were new.
    pub fn add_tickers(&mut self, input: &str) -> Vec<String> {
        let mut added = Vec::new();
        for ticker in parse_ticker_list(input) {
            if !self.extra_tickers.contains(&ticker) {
                self.extra_tickers.push(ticker.clone());
                added.push(ticker);
            }
        }
        added
    }

    /// Remove one added ticker. Returns whether it was present.
    pub fn remove_ticker(&mut self, raw: &str) -> bool {
        let Some(ticker) = normalize_ticker(raw) else {
            return false;
        };
        let before = self.extra_tickers.len();
        self.extra_tickers.retain(|t| *t != ticker);
        self.extra_tickers.len() != before
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggle();
    }

    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
    }

    pub fn raise_min_drawdown(&mut self) {
        self.min_drawdown = self.min_drawdown.next();
    }

    pub fn lower_min_drawdown(&mut self) {
        self.min_drawdown = self.min_drawdown.prev();
    }

    /// Catalog instruments in catalog order, then added tickers not already in
    /// the catalog as custom instruments.
    pub fn instruments(&self, catalog: &Catalog) -> Vec<Instrument> {
        let mut all = catalog.instruments();
        all.extend(
            self.extra_tickers
                .iter()
                .filter(|t| !catalog.contains(t))
                .map(|t| Instrument::custom(t)),
        );
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_drawdown_stops() {
        assert!(MinDrawdown::new(15).is_ok());
        assert_eq!(
            MinDrawdown::new(25),
            Err(SessionError::InvalidMinDrawdown(25))
        );
        let m = MinDrawdown::default();
        assert_eq!(m.prev().pct(), 0);
        assert_eq!(m.next().next().next().next().next().pct(), 30);
        assert_eq!(MinDrawdown::new(50).unwrap().next().pct(), 50);
    }

    #[test]
    fn min_drawdown_keeps() {
        assert!(MinDrawdown::default().keeps(0.0));
        let m = MinDrawdown::new(20).unwrap();
        assert!(m.keeps(-20.0));
        assert!(m.keeps(-25.0));
        assert!(!m.keeps(-15.0));
    }

    #[test]
    fn sort_parsing_and_cycle() {
        assert_eq!("worst-first".parse::<SortOrder>().unwrap(), SortOrder::WorstFirst);
        assert_eq!("ALPHA".parse::<SortOrder>().unwrap(), SortOrder::Alphabetical);
        assert!("random".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::Alphabetical.next(), SortOrder::WorstFirst);
    }

    #[test]
    fn add_dedupes_and_normalizes() {
        let mut f = SessionFilters::default();
        assert_eq!(f.add_tickers(" uber, spot ,,UBER"), vec!["UBER", "SPOT"]);
        assert!(f.add_tickers("spot").is_empty());
        assert_eq!(f.extra_tickers(), ["UBER", "SPOT"]);
        assert!(f.remove_ticker(" uber "));
        assert!(!f.remove_ticker("UBER"));
        assert_eq!(f.extra_tickers(), ["SPOT"]);
    }

    #[test]
    fn instruments_merge_catalog_and_extras() {
        let catalog = Catalog::builtin();
        let mut f = SessionFilters::default();
        f.add_tickers("UBER, NVDA");
        let all = f.instruments(&catalog);
        assert_eq!(all.len(), catalog.ticker_count() + 1);
        let last = all.last().unwrap();
        assert_eq!(last.ticker, "UBER");
        assert!(last.is_custom());
        // NVDA keeps its catalog category.
        let nvda = all.iter().find(|i| i.ticker == "NVDA").unwrap();
        assert_eq!(nvda.category, "Big Tech / AI");
    }

    #[test]
    fn min_drawdown_serde_rejects_off_stop() {
        #[derive(Deserialize)]
        struct W {
            m: MinDrawdown,
        }
        assert!(toml::from_str::<W>("m = 10").is_ok());
        assert!(toml::from_str::<W>("m = 12").is_err());
    }
}
