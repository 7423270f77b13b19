//! Linear trend forecasting
//!
//! Closing prices are regressed on their position in the series
//! (`0..n-1`). The position is standardized before fitting, then an
//! ordinary least-squares line is fitted and extended `horizon` days past
//! the last bar.

use crate::error::{Result, StockError};
use crate::series::PriceSeries;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Deviations below this are treated as zero, leaving values unscaled
const MIN_SCALE: f64 = 10.0 * f64::EPSILON;

/// Zero-mean, unit-variance transform for a single feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardScaler {
    mean: f64,
    scale: f64,
}

impl StandardScaler {
    /// Fit on `values` using the population standard deviation
    ///
    /// Returns `None` for an empty slice.
    pub fn fit(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();

        Some(Self {
            mean,
            scale: if std < MIN_SCALE { 1.0 } else { std },
        })
    }

    pub fn transform(&self, value: f64) -> f64 {
        (value - self.mean) / self.scale
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

/// Least-squares line through standardized index and closing price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    scaler: StandardScaler,
    slope: f64,
    intercept: f64,
}

impl LinearTrend {
    /// Fit `close ≈ slope * z(index) + intercept` over indices `0..closes.len()`
    pub fn fit(closes: &[f64]) -> Result<Self> {
        if closes.is_empty() {
            return Err(StockError::EmptyInput);
        }
        if let Some(pos) = closes.iter().position(|c| !c.is_finite()) {
            return Err(StockError::ForecastFailed(format!(
                "closing price at index {pos} is not a finite number"
            )));
        }

        let indices: Vec<f64> = (0..closes.len()).map(|i| i as f64).collect();
        let scaler = StandardScaler::fit(&indices).ok_or(StockError::EmptyInput)?;
        let z: Vec<f64> = indices.iter().map(|&x| scaler.transform(x)).collect();

        let n = closes.len() as f64;
        let z_mean = z.iter().sum::<f64>() / n;
        let y_mean = closes.iter().sum::<f64>() / n;

        let (sxy, sxx) = z
            .iter()
            .zip(closes)
            .fold((0.0, 0.0), |(sxy, sxx), (&zi, &yi)| {
                let dz = zi - z_mean;
                (sxy + dz * (yi - y_mean), sxx + dz * dz)
            });

        // A single observation has no spread; the minimum-norm solution is flat.
        let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
        let intercept = y_mean - slope * z_mean;

        if !slope.is_finite() || !intercept.is_finite() {
            return Err(StockError::ForecastFailed(
                "least-squares fit produced a non-finite coefficient".to_string(),
            ));
        }

        Ok(Self {
            scaler,
            slope,
            intercept,
        })
    }

    /// Predicted close at a (possibly future) series index
    pub fn predict(&self, index: f64) -> f64 {
        self.slope * self.scaler.transform(index) + self.intercept
    }

    /// Slope per standardized unit
    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }
}

/// A forecast price for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Forecast prices on consecutive days following a price series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSeries {
    points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The price at the end of the horizon
    ///
    /// This is what the chat reports as "the forecasted price".
    pub fn final_price(&self) -> Option<f64> {
        self.points.last().map(|p| p.price)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.price)
    }
}

/// Fit a linear trend to `series` and project it `horizon` days ahead
///
/// The first forecast date is the day after the last bar; dates advance one
/// calendar day at a time regardless of trading days.
pub fn forecast(series: &PriceSeries, horizon: usize) -> Result<ForecastSeries> {
    let last = series.last().ok_or(StockError::EmptyInput)?;
    if horizon == 0 {
        return Err(StockError::ForecastFailed(
            "horizon must be at least one day".to_string(),
        ));
    }

    let closes: Vec<f64> = series.closes().collect();
    let trend = LinearTrend::fit(&closes)?;
    tracing::debug!(
        symbol = series.symbol(),
        slope = trend.slope(),
        intercept = trend.intercept(),
        "Fitted linear trend"
    );

    let n = closes.len();
    let points = (0..horizon)
        .map(|step| {
            let date = next_day(last.date, step + 1)?;
            let price = trend.predict((n + step) as f64);
            if !price.is_finite() {
                return Err(StockError::ForecastFailed(format!(
                    "prediction for {date} is not a finite number"
                )));
            }
            Ok(ForecastPoint { date, price })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ForecastSeries { points })
}

fn next_day(from: NaiveDate, days: usize) -> Result<NaiveDate> {
    from.checked_add_days(Days::new(days as u64))
        .ok_or_else(|| StockError::ForecastFailed(format!("date overflow {days} days after {from}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::DailyBar;

    fn series_from_closes(start: &str, closes: &[f64]) -> PriceSeries {
        let start: NaiveDate = start.parse().unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| DailyBar {
                date: start + Days::new(i as u64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 10_000,
            })
            .collect();
        PriceSeries::new("AAPL", bars)
    }

    /// Plain OLS on the raw index, evaluated at `at`
    fn reference_ols(closes: &[f64], at: f64) -> f64 {
        let n = closes.len() as f64;
        let x_mean = (n - 1.0) / 2.0;
        let y_mean = closes.iter().sum::<f64>() / n;
        let mut sxy = 0.0;
        let mut sxx = 0.0;
        for (i, y) in closes.iter().enumerate() {
            let dx = i as f64 - x_mean;
            sxy += dx * (y - y_mean);
            sxx += dx * dx;
        }
        y_mean + sxy / sxx * (at - x_mean)
    }

    #[test]
    fn test_scaler_population_std() {
        let scaler = StandardScaler::fit(&[0.0, 1.0, 2.0, 3.0]).unwrap();
        assert!((scaler.mean() - 1.5).abs() < 1e-12);
        assert!((scaler.scale() - 1.25_f64.sqrt()).abs() < 1e-12);
        assert!(scaler.transform(1.5).abs() < 1e-12);
    }

    #[test]
    fn test_scaler_constant_input_uses_unit_scale() {
        let scaler = StandardScaler::fit(&[7.0]).unwrap();
        assert_eq!(scaler.scale(), 1.0);
        assert_eq!(scaler.transform(8.0), 1.0);
        assert!(StandardScaler::fit(&[]).is_none());
    }

    #[test]
    fn test_horizon_length_and_dates() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + f64::from(i)).collect();
        let series = series_from_closes("2024-01-01", &closes);

        let result = forecast(&series, 90).unwrap();
        assert_eq!(result.len(), 90);

        let first = result.points()[0].date;
        assert_eq!(first, "2024-01-31".parse::<NaiveDate>().unwrap());
        for (a, b) in result.dates().zip(result.dates().skip(1)) {
            assert_eq!(b, a.succ_opt().unwrap());
        }
    }

    #[test]
    fn test_forecast_crosses_month_and_year() {
        let series = series_from_closes("2023-12-29", &[10.0, 11.0, 12.0]);
        let result = forecast(&series, 3).unwrap();
        let dates: Vec<String> = result.dates().map(|d| d.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
    }

    #[test]
    fn test_empty_series_fails() {
        let series = PriceSeries::new("AAPL", Vec::new());
        assert!(matches!(forecast(&series, 90), Err(StockError::EmptyInput)));
    }

    #[test]
    fn test_zero_horizon_fails() {
        let series = series_from_closes("2024-01-01", &[1.0, 2.0]);
        assert!(matches!(
            forecast(&series, 0),
            Err(StockError::ForecastFailed(_))
        ));
    }

    #[test]
    fn test_matches_reference_ols_at_index_100() {
        // A rising trend with a repeating wobble so the fit is not exact.
        let closes: Vec<f64> = (0..100)
            .map(|i| 150.0 + 0.75 * f64::from(i) + [0.0, 2.5, -1.5, 4.0, -3.0][i as usize % 5])
            .collect();
        let series = series_from_closes("2024-01-01", &closes);

        let result = forecast(&series, 1).unwrap();
        assert_eq!(result.len(), 1);

        let expected = reference_ols(&closes, 100.0);
        let actual = result.final_price().unwrap();
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_perfect_line_is_extended() {
        let closes: Vec<f64> = (0..10).map(|i| 2.0 * f64::from(i) + 5.0).collect();
        let series = series_from_closes("2024-06-01", &closes);

        let result = forecast(&series, 5).unwrap();
        let prices: Vec<f64> = result.prices().collect();
        for (step, price) in prices.iter().enumerate() {
            let expected = 2.0 * (10 + step) as f64 + 5.0;
            assert!((price - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_single_bar_forecasts_flat() {
        let series = series_from_closes("2024-06-01", &[42.0]);
        let result = forecast(&series, 3).unwrap();
        assert!(result.prices().all(|p| (p - 42.0).abs() < 1e-12));
    }

    #[test]
    fn test_non_finite_close_fails() {
        let series = series_from_closes("2024-06-01", &[1.0, f64::NAN, 3.0]);
        assert!(matches!(
            forecast(&series, 3),
            Err(StockError::ForecastFailed(_))
        ));
    }

    #[test]
    fn test_standardization_does_not_change_predictions() {
        let closes = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let trend = LinearTrend::fit(&closes).unwrap();
        for at in [8.0, 12.0, 40.0] {
            assert!((trend.predict(at) - reference_ols(&closes, at)).abs() < 1e-9);
        }
    }
}
