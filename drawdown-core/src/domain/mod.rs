//! Domain types for the drawdown monitor

pub mod instrument;
pub mod series;

pub use instrument::{
    normalize_ticker, parse_ticker_list, Instrument, CUSTOM_CATEGORY, CUSTOM_COLOR,
};
pub use series::{PricePoint, PriceSeries};
