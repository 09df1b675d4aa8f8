//! Background worker thread: all fetching runs here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. The worker
//! owns the `PriceFetcher`, so the price cache lives as long as the session.
//! There is no cancellation; quitting drops the channels and abandons any
//! load still in flight.

use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use drawdown_core::data::{FetchOutcome, PriceFetcher};
use drawdown_core::domain::Instrument;
use drawdown_runner::{load_instruments, LoadProgress, LoadReport};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    /// Fetch (through the cache) and report every instrument.
    Load { instruments: Vec<Instrument> },
    /// Clear the price cache, then load.
    Refresh { instruments: Vec<Instrument> },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    TickerStarted {
        ticker: String,
        index: usize,
        total: usize,
    },
    TickerDone {
        ticker: String,
        success: bool,
        cached: bool,
        error: Option<String>,
    },
    LoadDone {
        report: LoadReport,
    },
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    fetcher: PriceFetcher,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("drawdown-worker".into())
        .spawn(move || worker_loop(fetcher, rx, tx))
}

fn worker_loop(fetcher: PriceFetcher, rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::Load { instruments }) => handle_load(&fetcher, &instruments, &tx),
            Ok(WorkerCommand::Refresh { instruments }) => {
                fetcher.refresh();
                handle_load(&fetcher, &instruments, &tx);
            }
        }
    }
    tracing::debug!("worker stopped");
}

fn handle_load(fetcher: &PriceFetcher, instruments: &[Instrument], tx: &Sender<WorkerResponse>) {
    let progress = ChannelProgress { tx: tx.clone() };
    let report = load_instruments(fetcher, instruments, &progress);
    let _ = tx.send(WorkerResponse::LoadDone { report });
}

/// LoadProgress implementation that sends messages through a channel.
struct ChannelProgress {
    tx: Sender<WorkerResponse>,
}

impl LoadProgress for ChannelProgress {
    fn on_start(&self, ticker: &str, index: usize, total: usize) {
        let _ = self.tx.send(WorkerResponse::TickerStarted {
            ticker: ticker.to_string(),
            index,
            total,
        });
    }

    fn on_complete(&self, ticker: &str, _index: usize, _total: usize, outcome: &FetchOutcome) {
        let _ = self.tx.send(WorkerResponse::TickerDone {
            ticker: ticker.to_string(),
            success: outcome.series.is_some(),
            cached: outcome.cached,
            error: outcome.error.as_ref().map(|e| e.to_string()),
        });
    }

    // LoadDone carries the full report.
    fn on_batch_complete(&self, _loaded: usize, _failed: usize, _total: usize) {}
}
