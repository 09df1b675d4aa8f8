//! Drawdown calculator.
//!
//! Given a closing-price series and a high-water-mark mode, computes the
//! current price, the reference high, the percentage drawdown and the
//! absolute difference. The reference high is always taken over a window
//! that contains the current price, so drawdown and difference are never
//! positive.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::PriceSeries;
use crate::severity::Severity;

/// Trading days in the trailing 52-week window.
pub const TRAILING_WINDOW: usize = 252;

/// Which high the drawdown is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HighWaterMode {
    /// Max over the most recent 252 closes (whole series if shorter).
    #[default]
    #[serde(rename = "trailing_52w")]
    Trailing52w,
    /// Max over the whole fetched series. Bounded by the fetch window,
    /// so this is not a true all-time high.
    #[serde(rename = "all_time_high")]
    AllTimeHigh,
}

impl HighWaterMode {
    pub fn label(self) -> &'static str {
        match self {
            HighWaterMode::Trailing52w => "52-week high",
            HighWaterMode::AllTimeHigh => "All-time high",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            HighWaterMode::Trailing52w => "trailing_52w",
            HighWaterMode::AllTimeHigh => "all_time_high",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            HighWaterMode::Trailing52w => HighWaterMode::AllTimeHigh,
            HighWaterMode::AllTimeHigh => HighWaterMode::Trailing52w,
        }
    }
}

impl FromStr for HighWaterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trailing_52w" | "52w" | "trailing" => Ok(HighWaterMode::Trailing52w),
            "all_time_high" | "ath" | "all_time" => Ok(HighWaterMode::AllTimeHigh),
            other => Err(format!(
                "unknown high-water mode '{other}' (expected trailing_52w or all_time_high)"
            )),
        }
    }
}

impl std::fmt::Display for HighWaterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Drawdown of one ticker against its reference high.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawdownResult {
    pub ticker: String,
    pub current: f64,
    pub high: f64,
    /// `(current - high) / high * 100`, always ≤ 0.
    pub drawdown_pct: f64,
    /// `current - high`, always ≤ 0.
    pub diff: f64,
    pub series: Arc<PriceSeries>,
}

impl DrawdownResult {
    pub fn severity(&self) -> Severity {
        Severity::from_drawdown(self.drawdown_pct)
    }
}

/// Reference high for `series` under `mode`. `None` for an empty series.
pub fn reference_high(series: &PriceSeries, mode: HighWaterMode) -> Option<f64> {
    let window = match mode {
        HighWaterMode::Trailing52w => series.tail(TRAILING_WINDOW),
        HighWaterMode::AllTimeHigh => series.points(),
    };
    window.iter().map(|p| p.close).reduce(f64::max)
}

/// Compute the drawdown for a series. Absent or empty input yields `None`.
pub fn compute(series: Option<&Arc<PriceSeries>>, mode: HighWaterMode) -> Option<DrawdownResult> {
    let series = series?;
    let current = series.last()?.close;
    let high = reference_high(series, mode)?;
    let diff = current - high;
    let drawdown_pct = diff / high * 100.0;

    Some(DrawdownResult {
        ticker: series.ticker().to_string(),
        current,
        high,
        drawdown_pct,
        diff,
        series: Arc::clone(series),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> Arc<PriceSeries> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Arc::new(PriceSeries::from_closes("TEST", start, closes))
    }

    #[test]
    fn four_point_example() {
        let s = series(&[100.0, 90.0, 80.0, 95.0]);
        let r = compute(Some(&s), HighWaterMode::Trailing52w).unwrap();
        assert_eq!(r.current, 95.0);
        assert_eq!(r.high, 100.0);
        assert!((r.drawdown_pct - -5.0).abs() < 1e-12);
        assert!((r.diff - -5.0).abs() < 1e-12);
        assert_eq!(r.severity(), Severity::Stable);
    }

    #[test]
    fn absent_and_empty_yield_none() {
        assert!(compute(None, HighWaterMode::Trailing52w).is_none());
        let empty = series(&[]);
        assert!(compute(Some(&empty), HighWaterMode::AllTimeHigh).is_none());
    }

    #[test]
    fn at_the_high_is_zero_drawdown() {
        let s = series(&[10.0, 20.0, 30.0]);
        let r = compute(Some(&s), HighWaterMode::AllTimeHigh).unwrap();
        assert_eq!(r.drawdown_pct, 0.0);
        assert_eq!(r.diff, 0.0);
    }

    #[test]
    fn trailing_window_ignores_older_high() {
        // Old peak of 500 followed by 300 closes hovering around 100.
        let mut closes = vec![500.0];
        closes.extend((0..300).map(|i| 100.0 + (i % 7) as f64));
        let s = series(&closes);

        let trailing = compute(Some(&s), HighWaterMode::Trailing52w).unwrap();
        let ath = compute(Some(&s), HighWaterMode::AllTimeHigh).unwrap();

        assert_eq!(trailing.high, 106.0);
        assert_eq!(ath.high, 500.0);
        assert!(ath.drawdown_pct < trailing.drawdown_pct);
    }

    #[test]
    fn short_series_trailing_equals_global_max() {
        let s = series(&[5.0, 9.0, 7.0]);
        assert_eq!(reference_high(&s, HighWaterMode::Trailing52w), Some(9.0));
        assert_eq!(reference_high(&s, HighWaterMode::AllTimeHigh), Some(9.0));
    }

    #[test]
    fn mode_parsing_and_toggle() {
        assert_eq!("52w".parse::<HighWaterMode>().unwrap(), HighWaterMode::Trailing52w);
        assert_eq!("ATH".parse::<HighWaterMode>().unwrap(), HighWaterMode::AllTimeHigh);
        assert!("weekly".parse::<HighWaterMode>().is_err());
        assert_eq!(HighWaterMode::Trailing52w.toggle(), HighWaterMode::AllTimeHigh);
        assert_eq!(HighWaterMode::AllTimeHigh.to_string(), "all_time_high");
    }
}
