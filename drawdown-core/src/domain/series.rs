use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Daily closing prices for one ticker, oldest first, newest last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    ticker: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, ordering points by date and dropping non-finite closes.
    pub fn new(ticker: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.retain(|p| p.close.is_finite());
        points.sort_by_key(|p| p.date);
        Self {
            ticker: ticker.into(),
            points,
        }
    }

    /// Series of consecutive calendar days starting at `start`.
    pub fn from_closes(ticker: impl Into<String>, start: NaiveDate, closes: &[f64]) -> Self {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: start + chrono::Duration::days(i as i64),
                close,
            })
            .collect();
        Self::new(ticker, points)
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent point.
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// The most recent `n` points (the whole series if shorter).
    pub fn tail(&self, n: usize) -> &[PricePoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn new_orders_by_date() {
        let s = PriceSeries::new(
            "SPY",
            vec![
                PricePoint {
                    date: d(2024, 1, 3),
                    close: 3.0,
                },
                PricePoint {
                    date: d(2024, 1, 1),
                    close: 1.0,
                },
                PricePoint {
                    date: d(2024, 1, 2),
                    close: 2.0,
                },
            ],
        );
        let closes: Vec<f64> = s.closes().collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
        assert_eq!(s.last_date(), Some(d(2024, 1, 3)));
    }

    #[test]
    fn non_finite_closes_are_dropped() {
        let s = PriceSeries::from_closes("X", d(2024, 1, 1), &[1.0, f64::NAN, 3.0]);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn tail_clamps_to_length() {
        let s = PriceSeries::from_closes("X", d(2024, 1, 1), &[1.0, 2.0, 3.0]);
        assert_eq!(s.tail(2).len(), 2);
        assert_eq!(s.tail(2)[0].close, 2.0);
        assert_eq!(s.tail(10).len(), 3);
    }
}
