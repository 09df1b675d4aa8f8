//! Drawdown Monitor runner: everything between the price data and the screen.
//!
//! This crate builds on `drawdown-core` to provide:
//! - Session filters (mode, sort, minimum drawdown, added tickers)
//! - Sequential batch loading with progress callbacks
//! - Filtering, sorting, summary metrics and per-category tabs
//! - CSV export
//! - TOML configuration

pub mod config;
pub mod export;
pub mod loader;
pub mod session;
pub mod view;

pub use config::{ConfigError, DashboardConfig, ProviderKind};
pub use export::{export_csv, parse_export, write_export, ExportRow, EXPORT_FILE_NAME};
pub use loader::{
    load_instruments, InstrumentDrawdown, LoadProgress, LoadReport, LoadedInstrument,
    SilentProgress, StdoutProgress,
};
pub use session::{MinDrawdown, SessionError, SessionFilters, SortOrder, MIN_DRAWDOWN_STOPS};
pub use view::{tab_items, tabs, Summary, Tab, View};
