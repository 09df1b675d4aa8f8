//! Application state: single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via channels.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};

use chrono::{DateTime, Local};

use drawdown_core::catalog::Catalog;
use drawdown_core::domain::Instrument;
use drawdown_runner::view::{tab_items, tabs, Tab, View};
use drawdown_runner::{write_export, InstrumentDrawdown, LoadReport, SessionFilters};

use crate::worker::{WorkerCommand, WorkerResponse};

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Body of the screen below the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Cards,
    Table,
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    AddTickers,
    RemoveTicker,
}

/// Progress of the load in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingState {
    pub done: usize,
    pub total: usize,
    pub current: Option<String>,
    /// Tickers served from the price cache so far.
    pub cached: usize,
    /// Most recent ticker that came back without data, with its reason.
    pub last_failure: Option<String>,
}

impl LoadingState {
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.done as f64 / self.total as f64).clamp(0.0, 1.0)
        }
    }
}

/// Top-level application state.
pub struct AppState {
    pub running: bool,

    pub catalog: Catalog,
    pub filters: SessionFilters,
    pub report: LoadReport,
    /// Drawdowns under the current mode, in load order.
    pub results: Vec<InstrumentDrawdown>,
    pub tabs: Vec<Tab>,
    pub tab_index: usize,

    pub show_chart: bool,
    pub view_mode: ViewMode,
    /// First visible card row, or table row.
    pub scroll: usize,

    pub overlay: Overlay,
    pub input: String,
    pub remove_cursor: usize,

    pub loading: Option<LoadingState>,
    pub status_message: Option<(String, StatusLevel)>,
    pub last_updated: Option<DateTime<Local>>,
    pub provider_name: String,
    pub export_dir: PathBuf,

    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,
}

impl AppState {
    pub fn new(
        catalog: Catalog,
        filters: SessionFilters,
        provider_name: impl Into<String>,
        export_dir: PathBuf,
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
    ) -> Self {
        let tabs = tabs(&catalog, &filters);
        Self {
            running: true,
            catalog,
            filters,
            report: LoadReport::default(),
            results: Vec::new(),
            tabs,
            tab_index: 0,
            show_chart: true,
            view_mode: ViewMode::Cards,
            scroll: 0,
            overlay: Overlay::None,
            input: String::new(),
            remove_cursor: 0,
            loading: None,
            status_message: None,
            last_updated: None,
            provider_name: provider_name.into(),
            export_dir,
            worker_tx,
            worker_rx,
        }
    }

    /// Catalog plus added tickers, in load order.
    pub fn instruments(&self) -> Vec<Instrument> {
        self.filters.instruments(&self.catalog)
    }

    fn send(&mut self, cmd: WorkerCommand, total: usize) {
        if self.worker_tx.send(cmd).is_err() {
            self.set_error("background worker is not running");
            return;
        }
        self.loading = Some(LoadingState {
            total,
            ..LoadingState::default()
        });
    }

    pub fn request_load(&mut self) {
        let instruments = self.instruments();
        let total = instruments.len();
        self.send(WorkerCommand::Load { instruments }, total);
    }

    /// Clear the price cache and reload everything.
    pub fn request_refresh(&mut self) {
        let instruments = self.instruments();
        let total = instruments.len();
        self.send(WorkerCommand::Refresh { instruments }, total);
        self.set_status("Refreshing: price cache cleared");
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    pub fn apply_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::TickerStarted {
                ticker,
                index,
                total,
            } => {
                let loading = self.loading.get_or_insert_with(LoadingState::default);
                loading.current = Some(ticker);
                loading.done = index;
                loading.total = total;
            }
            WorkerResponse::TickerDone {
                ticker,
                success,
                cached,
                error,
            } => {
                if !success {
                    tracing::debug!(%ticker, error = ?error, "ticker returned no data");
                }
                if let Some(loading) = self.loading.as_mut() {
                    loading.done += 1;
                    if cached {
                        loading.cached += 1;
                    }
                    if !success {
                        let reason = error.unwrap_or_else(|| "no data".to_string());
                        loading.last_failure = Some(format!("{ticker}: {reason}"));
                    }
                }
            }
            WorkerResponse::LoadDone { report } => {
                self.report = report;
                self.loading = None;
                self.last_updated = Some(Local::now());
                self.recompute();
                if self.failed_tickers().is_empty() {
                    self.set_status(format!("Loaded {} instruments", self.results.len()));
                } else {
                    self.set_warning(format!(
                        "Loaded {} instruments, {} failed",
                        self.results.len(),
                        self.failed_tickers().len()
                    ));
                }
            }
        }
    }

    fn wanted_tickers(&self) -> HashSet<String> {
        self.instruments().into_iter().map(|i| i.ticker).collect()
    }

    /// Rebuild drawdowns and tabs from the loaded series. Never refetches.
    pub fn recompute(&mut self) {
        let wanted = self.wanted_tickers();
        self.results = self
            .report
            .compute(self.filters.mode)
            .into_iter()
            .filter(|r| wanted.contains(r.ticker()))
            .collect();
        self.tabs = tabs(&self.catalog, &self.filters);
        if self.tab_index >= self.tabs.len() {
            self.tab_index = 0;
        }
        self.scroll = 0;
    }

    /// Failed tickers of the last load that are still tracked.
    pub fn failed_tickers(&self) -> Vec<&str> {
        let wanted = self.wanted_tickers();
        self.report
            .failed
            .iter()
            .filter(|t| wanted.contains(*t))
            .map(String::as_str)
            .collect()
    }

    pub fn current_tab(&self) -> &Tab {
        self.tabs.get(self.tab_index).unwrap_or(&Tab::All)
    }

    /// Filtered, sorted items of the selected tab.
    pub fn current_items(&self) -> Vec<&InstrumentDrawdown> {
        tab_items(self.current_tab(), &self.results, &self.filters)
    }

    /// Everything passing the filter; drives the summary row and the chart.
    pub fn overview(&self) -> View<'_> {
        View::build(&self.results, &self.filters)
    }

    pub fn toggle_mode(&mut self) {
        self.filters.toggle_mode();
        self.recompute();
        self.set_status(format!("Reference: {}", self.filters.mode.label()));
    }

    pub fn cycle_sort(&mut self) {
        self.filters.cycle_sort();
        self.scroll = 0;
        self.set_status(format!("Sort: {}", self.filters.sort.label()));
    }

    pub fn raise_min_drawdown(&mut self) {
        self.filters.raise_min_drawdown();
        self.scroll = 0;
    }

    pub fn lower_min_drawdown(&mut self) {
        self.filters.lower_min_drawdown();
        self.scroll = 0;
    }

    pub fn next_tab(&mut self) {
        self.tab_index = (self.tab_index + 1) % self.tabs.len().max(1);
        self.scroll = 0;
    }

    pub fn prev_tab(&mut self) {
        let n = self.tabs.len().max(1);
        self.tab_index = (self.tab_index + n - 1) % n;
        self.scroll = 0;
    }

    pub fn scroll_down(&mut self, max: usize) {
        if self.scroll + 1 < max {
            self.scroll += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn toggle_chart(&mut self) {
        self.show_chart = !self.show_chart;
    }

    pub fn toggle_table(&mut self) {
        self.view_mode = match self.view_mode {
            ViewMode::Cards => ViewMode::Table,
            ViewMode::Table => ViewMode::Cards,
        };
        self.scroll = 0;
    }

    /// Add comma-separated tickers and load them.
    pub fn add_tickers(&mut self, input: &str) {
        let added = self.filters.add_tickers(input);
        if added.is_empty() {
            self.set_warning("No new tickers to add");
            return;
        }
        self.recompute();
        self.request_load();
        self.set_status(format!("Added {}", added.join(", ")));
    }

    /// Remove the added ticker at `index` in the extras list.
    pub fn remove_extra(&mut self, index: usize) {
        let Some(ticker) = self.filters.extra_tickers().get(index).cloned() else {
            return;
        };
        self.filters.remove_ticker(&ticker);
        self.recompute();
        let remaining = self.filters.extra_tickers().len();
        self.remove_cursor = self.remove_cursor.min(remaining.saturating_sub(1));
        if remaining == 0 && self.overlay == Overlay::RemoveTicker {
            self.overlay = Overlay::None;
        }
        self.set_status(format!("Removed {ticker}"));
    }

    /// Write `drawdown.csv` with every computed instrument.
    pub fn export(&mut self) {
        match write_export(&self.results, &self.export_dir) {
            Ok(path) => self.set_status(format!("Exported {}", path.display())),
            Err(e) => {
                tracing::error!(error = %e, "export failed");
                self.set_error(format!("Export failed: {e:#}"));
            }
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }
}
