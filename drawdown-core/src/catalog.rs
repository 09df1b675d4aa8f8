//! Instrument catalog: category-organized ticker lists.
//!
//! The catalog groups tickers into named categories, each with an accent
//! color. Category order and ticker order inside a category are preserved
//! exactly as written, since that order drives tab order and tie-breaking
//! in summaries. A built-in catalog ships with the crate; a TOML file can
//! replace it.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Instrument;
use crate::severity::parse_hex_color;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("read catalog file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize catalog: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid catalog: {0}")]
    Invalid(String),
}

/// A ticker and its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub ticker: String,
    pub name: String,
}

/// A named group of tickers sharing an accent color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub color: String,
    #[serde(rename = "tickers")]
    pub entries: Vec<CatalogEntry>,
}

impl Category {
    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.ticker.as_str())
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.entries.iter().any(|e| e.ticker == ticker)
    }

    fn instrument(&self, entry: &CatalogEntry) -> Instrument {
        Instrument::new(&entry.ticker, &entry.name, &self.name, &self.color)
    }
}

/// The complete catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

impl Catalog {
    /// Load a catalog from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a catalog from a TOML string and validate it.
    pub fn from_toml(content: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = toml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Serialize the catalog to TOML.
    pub fn to_toml(&self) -> Result<String, CatalogError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject empty category names, colors that are not `#rrggbb`, and
    /// tickers listed more than once.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(CatalogError::Invalid("category with empty name".into()));
            }
            if parse_hex_color(&category.color).is_none() {
                return Err(CatalogError::Invalid(format!(
                    "category '{}' has color '{}', expected #rrggbb",
                    category.name, category.color
                )));
            }
            for entry in &category.entries {
                if entry.ticker.trim().is_empty() {
                    return Err(CatalogError::Invalid(format!(
                        "empty ticker in category '{}'",
                        category.name
                    )));
                }
                if !seen.insert(entry.ticker.as_str()) {
                    return Err(CatalogError::Invalid(format!(
                        "ticker '{}' listed more than once",
                        entry.ticker
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The category a catalog ticker belongs to.
    pub fn category_of(&self, ticker: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.contains(ticker))
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.category_of(ticker).is_some()
    }

    /// Look up one instrument.
    pub fn instrument(&self, ticker: &str) -> Option<Instrument> {
        self.categories.iter().find_map(|c| {
            c.entries
                .iter()
                .find(|e| e.ticker == ticker)
                .map(|e| c.instrument(e))
        })
    }

    /// Every instrument in catalog order.
    pub fn instruments(&self) -> Vec<Instrument> {
        self.categories
            .iter()
            .flat_map(|c| c.entries.iter().map(move |e| c.instrument(e)))
            .collect()
    }

    /// All tickers in catalog order.
    pub fn all_tickers(&self) -> Vec<&str> {
        self.categories.iter().flat_map(|c| c.tickers()).collect()
    }

    /// Total number of tickers.
    pub fn ticker_count(&self) -> usize {
        self.categories.iter().map(|c| c.entries.len()).sum()
    }

    /// The catalog that ships with the dashboard.
    pub fn builtin() -> Self {
        fn category(name: &str, color: &str, entries: &[(&str, &str)]) -> Category {
            Category {
                name: name.to_string(),
                color: color.to_string(),
                entries: entries
                    .iter()
                    .map(|(ticker, name)| CatalogEntry {
                        ticker: ticker.to_string(),
                        name: name.to_string(),
                    })
                    .collect(),
            }
        }

        let categories = vec![
            category(
                "Quantum / Space / Energy",
                "#a78bfa",
                &[
                    ("IONQ", "IonQ"),
                    ("TEM", "Tempus AI"),
                    ("RKLB", "Rocket Lab"),
                    ("LUNR", "Intuitive Machines"),
                    ("OKLO", "Oklo"),
                    ("SMR", "NuScale Power"),
                    ("UUUU", "Energy Fuels"),
                    ("LEU", "Centrus Energy"),
                    ("FLNC", "Fluence Energy"),
                    ("BE", "Bloom Energy"),
                ],
            ),
            category(
                "Security / Defense / Infrastructure",
                "#34d399",
                &[
                    ("PANW", "Palo Alto Networks"),
                    ("CRWD", "CrowdStrike"),
                    ("LHX", "L3Harris Technologies"),
                    ("FTI", "TechnipFMC"),
                    ("GEV", "GE Vernova"),
                    ("VRT", "Vertiv Holdings"),
                    ("XYL", "Xylem"),
                    ("DE", "Deere & Company"),
                    ("J", "Jacobs Solutions"),
                ],
            ),
            category(
                "Big Tech / AI",
                "#60a5fa",
                &[
                    ("NVDA", "NVIDIA"),
                    ("MSFT", "Microsoft"),
                    ("META", "Meta Platforms"),
                    ("GOOGL", "Alphabet Class A"),
                    ("GOOG", "Alphabet Class C"),
                    ("AMZN", "Amazon"),
                    ("AAPL", "Apple"),
                    ("TSLA", "Tesla"),
                    ("PLTR", "Palantir"),
                    ("ORCL", "Oracle"),
                    ("NFLX", "Netflix"),
                    ("ASTS", "AST SpaceMobile"),
                ],
            ),
            category(
                "Financials / Asset Management",
                "#fbbf24",
                &[
                    ("JPM", "JPMorgan Chase"),
                    ("GS", "Goldman Sachs"),
                    ("AXP", "American Express"),
                    ("V", "Visa"),
                    ("MA", "Mastercard"),
                    ("BLK", "BlackRock"),
                    ("BX", "Blackstone"),
                ],
            ),
            category(
                "Healthcare / Other",
                "#f472b6",
                &[
                    ("JNJ", "Johnson & Johnson"),
                    ("NEE", "NextEra Energy"),
                    ("LIN", "Linde"),
                    ("COST", "Costco"),
                    ("LVMUY", "LVMH ADR"),
                    ("NTLA", "Intellia Therapeutics"),
                    ("CRSP", "CRISPR Therapeutics"),
                    ("BRK-B", "Berkshire Hathaway B"),
                ],
            ),
            category(
                "ETFs & Assets",
                "#fb923c",
                &[
                    ("VOO", "S&P 500 ETF"),
                    ("QQQ", "Nasdaq 100 ETF"),
                    ("XLV", "Health Care Sector ETF"),
                    ("TLT", "20+ Year Treasury ETF"),
                    ("SCHD", "Dividend Growth ETF"),
                    ("GLD", "Gold ETF"),
                    ("SLV", "Silver ETF"),
                    ("CPER", "Copper ETF"),
                    ("LIT", "Lithium ETF"),
                    ("QS", "QuantumScape"),
                    ("COIN", "Coinbase"),
                    ("ETH-USD", "Ethereum"),
                    ("DJT", "Trump Media"),
                ],
            ),
        ];

        Self { categories }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_six_categories() {
        let c = Catalog::builtin();
        assert_eq!(c.categories().len(), 6);
        assert_eq!(c.ticker_count(), 59);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn toml_roundtrip_preserves_order() {
        let c = Catalog::builtin();
        let toml_str = c.to_toml().unwrap();
        let parsed = Catalog::from_toml(&toml_str).unwrap();
        assert_eq!(parsed, c);
        assert_eq!(parsed.all_tickers()[0], "IONQ");
    }

    #[test]
    fn instrument_lookup_carries_category() {
        let c = Catalog::builtin();
        let nvda = c.instrument("NVDA").unwrap();
        assert_eq!(nvda.display_name, "NVIDIA");
        assert_eq!(nvda.category, "Big Tech / AI");
        assert_eq!(nvda.category_color, "#60a5fa");
        assert!(c.instrument("ZZZZ").is_none());
    }

    #[test]
    fn instruments_follow_catalog_order() {
        let c = Catalog::builtin();
        let all = c.instruments();
        assert_eq!(all.len(), c.ticker_count());
        assert_eq!(all.first().unwrap().ticker, "IONQ");
        assert_eq!(all.last().unwrap().ticker, "DJT");
    }

    #[test]
    fn duplicate_ticker_rejected() {
        let src = r##"
[[categories]]
name = "A"
color = "#000000"
tickers = [{ ticker = "X", name = "x" }]

[[categories]]
name = "B"
color = "#ffffff"
tickers = [{ ticker = "X", name = "x again" }]
"##;
        assert!(matches!(
            Catalog::from_toml(src),
            Err(CatalogError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_color_rejected() {
        for color in ["#a\u{20ac}bc", "#12345g", "red", "#fff"] {
            let src = format!(
                "[[categories]]\nname = \"A\"\ncolor = \"{color}\"\n\
                 tickers = [{{ ticker = \"X\", name = \"x\" }}]\n"
            );
            let err = Catalog::from_toml(&src).unwrap_err();
            assert!(matches!(err, CatalogError::Invalid(_)), "{color}: {err}");
        }
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(&path, Catalog::builtin().to_toml().unwrap()).unwrap();
        let loaded = Catalog::from_file(&path).unwrap();
        assert_eq!(loaded.ticker_count(), 59);
        assert!(Catalog::from_file(&dir.path().join("missing.toml")).is_err());
    }
}
