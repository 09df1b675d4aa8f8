//! Drawdown Monitor CLI: the dashboard's data without the terminal UI.
//!
//! Commands:
//! - `scan`: load every ticker and print the summary and filtered table
//! - `export`: write `drawdown.csv` with every loaded ticker
//! - `catalog`: list the tracked categories and tickers
//! - `config`: print the effective configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use drawdown_core::drawdown::HighWaterMode;
use drawdown_runner::{
    load_instruments, write_export, DashboardConfig, InstrumentDrawdown, LoadReport, MinDrawdown,
    SessionFilters, SortOrder, StdoutProgress, Summary, View,
};

#[derive(Parser)]
#[command(
    name = "drawdown",
    about = "Drawdown Monitor CLI: how far each ticker sits below its high"
)]
struct Cli {
    /// Config file. Defaults to <config dir>/drawdown-monitor/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use the offline synthetic provider instead of Yahoo Finance.
    #[arg(long, global = true, default_value_t = false)]
    synthetic: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every ticker and print the summary and the filtered table.
    Scan {
        /// Reference high: trailing_52w or all_time_high.
        #[arg(long)]
        mode: Option<HighWaterMode>,

        /// worst_first, best_first or alphabetical.
        #[arg(long)]
        sort: Option<SortOrder>,

        /// Minimum drawdown in percent: 0, 5, 10, 15, 20, 30, 40 or 50.
        #[arg(long)]
        min: Option<u32>,

        /// Extra tickers, comma separated (e.g. PLTR,UBER).
        #[arg(long)]
        add: Option<String>,
    },
    /// Write drawdown.csv with every loaded ticker, ignoring the filter.
    Export {
        /// Reference high: trailing_52w or all_time_high.
        #[arg(long)]
        mode: Option<HighWaterMode>,

        /// Extra tickers, comma separated.
        #[arg(long)]
        add: Option<String>,

        /// Output directory. Defaults to the configured export dir.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List categories and tickers.
    Catalog {
        /// Print the catalog as TOML (usable as `catalog.path`).
        #[arg(long, default_value_t = false)]
        toml: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = DashboardConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Scan {
            mode,
            sort,
            min,
            add,
        } => {
            let mut filters = config.initial_filters();
            if let Some(mode) = mode {
                filters.mode = mode;
            }
            if let Some(sort) = sort {
                filters.sort = sort;
            }
            if let Some(min) = min {
                filters.min_drawdown = MinDrawdown::new(min)?;
            }
            if let Some(add) = add {
                filters.add_tickers(&add);
            }
            run_scan(&config, &filters, cli.synthetic)
        }
        Commands::Export { mode, add, out } => {
            let mut filters = config.initial_filters();
            if let Some(mode) = mode {
                filters.mode = mode;
            }
            if let Some(add) = add {
                filters.add_tickers(&add);
            }
            let dir = out.unwrap_or_else(|| config.export.dir.clone());
            run_export(&config, &filters, cli.synthetic, dir)
        }
        Commands::Catalog { toml } => run_catalog(&config, toml),
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn load(config: &DashboardConfig, filters: &SessionFilters, synthetic: bool) -> Result<LoadReport> {
    let catalog = config.load_catalog()?;
    let fetcher = config.build_fetcher(synthetic)?;
    let instruments = filters.instruments(&catalog);
    println!(
        "Loading {} tickers from {}...",
        instruments.len(),
        fetcher.provider_name()
    );
    Ok(load_instruments(&fetcher, &instruments, &StdoutProgress))
}

fn run_scan(config: &DashboardConfig, filters: &SessionFilters, synthetic: bool) -> Result<()> {
    let report = load(config, filters, synthetic)?;
    let results = report.compute(filters.mode);
    let view = View::build(&results, filters);

    println!();
    println!(
        "Drawdown vs {} | sort: {} | filter: {}",
        filters.mode.label(),
        filters.sort.label(),
        filters.min_drawdown.label()
    );

    match &view.summary {
        Some(summary) => print_summary(summary),
        None => println!("No instruments match the current filter."),
    }

    if !view.is_empty() {
        println!();
        print_table(&view.items);
    }

    if let Some(warning) = report.failure_warning() {
        println!();
        println!("{warning}");
    }
    Ok(())
}

fn print_summary(s: &Summary) {
    println!();
    println!("Instruments:      {}", s.count);
    println!("Average drawdown: {:.2}%", s.mean_drawdown);
    println!("Worst:            {} ({:.2}%)", s.worst_ticker, s.worst_drawdown);
    println!("Best:             {} ({:.2}%)", s.best_ticker, s.best_drawdown);
    println!("Down 35% or more: {}", s.danger_count);
    println!("Down 20% or more: {}", s.caution_count);
}

fn print_table(items: &[&InstrumentDrawdown]) {
    println!(
        "{:<8} {:<28} {:<32} {:>10} {:>10} {:>9} {:>10}  {}",
        "TICKER", "NAME", "CATEGORY", "CURRENT", "HIGH", "DD%", "DIFF", "SEVERITY"
    );
    for r in items {
        let d = &r.drawdown;
        println!(
            "{:<8} {:<28} {:<32} {:>10.2} {:>10.2} {:>8.2}% {:>10.2}  {}",
            r.ticker(),
            truncate(&r.instrument.display_name, 28),
            truncate(&r.instrument.category, 32),
            d.current,
            d.high,
            d.drawdown_pct,
            d.diff,
            r.severity()
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('~');
        out
    }
}

fn run_export(
    config: &DashboardConfig,
    filters: &SessionFilters,
    synthetic: bool,
    dir: PathBuf,
) -> Result<()> {
    let report = load(config, filters, synthetic)?;
    let results = report.compute(filters.mode);
    let path = write_export(&results, &dir)?;
    println!("Wrote {} rows to {}", results.len(), path.display());
    if let Some(warning) = report.failure_warning() {
        println!("{warning}");
    }
    Ok(())
}

fn run_catalog(config: &DashboardConfig, as_toml: bool) -> Result<()> {
    let catalog = config.load_catalog()?;
    if as_toml {
        print!("{}", catalog.to_toml()?);
        return Ok(());
    }
    for category in catalog.categories() {
        println!("{} ({}) [{}]", category.name, category.entries.len(), category.color);
        for entry in &category.entries {
            println!("  {:<8} {}", entry.ticker, entry.name);
        }
    }
    println!("{} tickers", catalog.ticker_count());
    Ok(())
}
