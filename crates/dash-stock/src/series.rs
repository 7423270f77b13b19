//! Daily price series

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Daily bars ordered by date, at most one bar per date
///
/// The bars are fixed at construction; there is no way to mutate them
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<DailyBar>,
}

impl PriceSeries {
    /// Build a series, sorting by date and dropping repeated dates
    ///
    /// When a date repeats, the first bar given for it is kept.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<DailyBar>) -> Self {
        bars.sort_by_key(|bar| bar.date);
        bars.dedup_by_key(|bar| bar.date);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    /// Symbol the series was fetched for
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Bars in ascending date order
    pub fn bars(&self) -> &[DailyBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Most recent bar
    pub fn last(&self) -> Option<&DailyBar> {
        self.bars.last()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.bars.iter().map(|bar| bar.date)
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|bar| bar.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, close: f64) -> DailyBar {
        DailyBar {
            date: date.parse().unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn test_new_sorts_by_date() {
        let series = PriceSeries::new(
            "AAPL",
            vec![bar("2024-03-05", 3.0), bar("2024-03-01", 1.0), bar("2024-03-04", 2.0)],
        );

        let closes: Vec<f64> = series.closes().collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
        assert_eq!(series.last().unwrap().date.to_string(), "2024-03-05");
        assert_eq!(series.symbol(), "AAPL");
    }

    #[test]
    fn test_new_drops_duplicate_dates() {
        let series = PriceSeries::new(
            "AAPL",
            vec![bar("2024-03-01", 1.0), bar("2024-03-01", 9.0), bar("2024-03-02", 2.0)],
        );

        assert_eq!(series.len(), 2);
        assert_eq!(series.bars()[0].close, 1.0);
        assert!(series.dates().zip(series.dates().skip(1)).all(|(a, b)| a < b));
    }

    #[test]
    fn test_empty_series() {
        let series = PriceSeries::new("AAPL", Vec::new());
        assert!(series.is_empty());
        assert!(series.last().is_none());
    }
}
