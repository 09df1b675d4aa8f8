//! CSV export of the full drawdown table.
//!
//! Columns: category, ticker, name, current, high, drawdown_pct, diff, severity.
//! Numbers are written with two decimals, rows are sorted by drawdown
//! ascending and the file starts with a UTF-8 byte-order mark so spreadsheet
//! apps pick the right encoding. The export ignores the session filter.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use drawdown_core::severity::Severity;

use crate::loader::InstrumentDrawdown;

pub const EXPORT_FILE_NAME: &str = "drawdown.csv";

const BOM: &str = "\u{feff}";

const HEADER: [&str; 8] = [
    "category",
    "ticker",
    "name",
    "current",
    "high",
    "drawdown_pct",
    "diff",
    "severity",
];

/// One exported row, as read back from a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub category: String,
    pub ticker: String,
    pub name: String,
    pub current: f64,
    pub high: f64,
    pub drawdown_pct: f64,
    pub diff: f64,
    pub severity: Severity,
}

/// Results in export order: stable sort by drawdown ascending.
fn export_order(results: &[InstrumentDrawdown]) -> Vec<&InstrumentDrawdown> {
    let mut rows: Vec<&InstrumentDrawdown> = results.iter().collect();
    rows.sort_by(|a, b| a.drawdown_pct().total_cmp(&b.drawdown_pct()));
    rows
}

/// Render the export as a string, BOM included.
pub fn export_csv(results: &[InstrumentDrawdown]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(HEADER)?;

    for r in export_order(results) {
        let d = &r.drawdown;
        let current = format!("{:.2}", d.current);
        let high = format!("{:.2}", d.high);
        let drawdown_pct = format!("{:.2}", d.drawdown_pct);
        let diff = format!("{:.2}", d.diff);
        wtr.write_record([
            r.instrument.category.as_str(),
            r.ticker(),
            r.instrument.display_name.as_str(),
            current.as_str(),
            high.as_str(),
            drawdown_pct.as_str(),
            diff.as_str(),
            d.severity().label(),
        ])?;
    }

    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    let body = String::from_utf8(bytes).context("CSV output is not valid UTF-8")?;
    Ok(format!("{BOM}{body}"))
}

/// Write `drawdown.csv` into `dir`, creating the directory if needed.
pub fn write_export(results: &[InstrumentDrawdown], dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;
    let path = dir.join(EXPORT_FILE_NAME);
    let csv = export_csv(results)?;
    std::fs::write(&path, csv).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = results.len(), "exported drawdown table");
    Ok(path)
}

/// Parse an export back into rows. Accepts input with or without the BOM.
pub fn parse_export(text: &str) -> Result<Vec<ExportRow>> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut rdr = csv::Reader::from_reader(text.as_bytes());
    rdr.deserialize()
        .map(|row| row.context("malformed export row"))
        .collect()
}
