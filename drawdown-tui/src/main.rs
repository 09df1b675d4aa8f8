//! Drawdown Monitor TUI: how far each tracked ticker sits below its high.
//!
//! Layout, top to bottom:
//! 1. Header: reference mode, sort, filter, last update, loading gauge
//! 2. Failed-ticker warning
//! 3. Tabs: All, one per category, Custom
//! 4. Summary metrics
//! 5. Comparison bar chart (toggle with `c`)
//! 6. Card grid or data table (toggle with `t`)
//! 7. Status bar

mod app;
mod input;
mod theme;
mod ui;
mod worker;

use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use drawdown_runner::DashboardConfig;

use crate::app::AppState;
use crate::worker::WorkerCommand;

#[derive(Parser)]
#[command(
    name = "drawdown-tui",
    about = "Drawdown Monitor: live drawdown dashboard for a ticker catalog"
)]
struct Args {
    /// Config file. Defaults to <config dir>/drawdown-monitor/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the offline synthetic provider instead of Yahoo Finance.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Comma-separated tickers to add on startup.
    #[arg(long)]
    add: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = DashboardConfig::load(args.config.as_deref())?;
    // The terminal belongs to the dashboard, so logs go to a file.
    if let Some(path) = config.log_file() {
        init_logging(&path)?;
    }

    let catalog = config.load_catalog()?;
    let mut filters = config.initial_filters();
    if let Some(add) = &args.add {
        filters.add_tickers(add);
    }
    let fetcher = config.build_fetcher(args.synthetic)?;
    let provider_name = fetcher.provider_name().to_string();

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    worker::spawn_worker(fetcher, cmd_rx, resp_tx).context("failed to start worker thread")?;

    let mut app = AppState::new(
        catalog,
        filters,
        provider_name,
        config.export.dir.clone(),
        cmd_tx.clone(),
        resp_rx,
    );
    app.request_load();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // The worker may be mid-fetch; it exits once the current ticker
    // returns and the closed channel is seen. Not joined.
    let _ = cmd_tx.send(WorkerCommand::Shutdown);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("dashboard closed");
    result
}

fn init_logging(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            app.apply_response(resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
