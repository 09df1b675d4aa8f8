use serde::{Deserialize, Serialize};

/// Category assigned to tickers added at runtime rather than loaded from the catalog.
pub const CUSTOM_CATEGORY: &str = "Custom";

/// Accent color for the custom category (slate).
pub const CUSTOM_COLOR: &str = "#94a3b8";

/// A tracked instrument: ticker plus the display metadata the dashboard needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    pub ticker: String,
    pub display_name: String,
    pub category: String,
    pub category_color: String,
}

impl Instrument {
    pub fn new(
        ticker: impl Into<String>,
        display_name: impl Into<String>,
        category: impl Into<String>,
        category_color: impl Into<String>,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            display_name: display_name.into(),
            category: category.into(),
            category_color: category_color.into(),
        }
    }

    /// Instrument for a user-added ticker: the ticker doubles as the display name.
    pub fn custom(ticker: &str) -> Self {
        Self::new(ticker, ticker, CUSTOM_CATEGORY, CUSTOM_COLOR)
    }

    pub fn is_custom(&self) -> bool {
        self.category == CUSTOM_CATEGORY
    }
}

/// Normalize a user-entered ticker: trim and uppercase. Empty input yields `None`.
///
/// No further validation happens here; an unknown symbol simply fails to fetch.
pub fn normalize_ticker(raw: &str) -> Option<String> {
    let t = raw.trim().to_uppercase();
    if t.is_empty() {
        None
    } else {
        Some(t)
    }
}

/// Split a comma-separated ticker list into normalized tickers, dropping blanks.
pub fn parse_ticker_list(input: &str) -> Vec<String> {
    input.split(',').filter_map(normalize_ticker).collect()
}
