//! Accuracy metrics for evaluating a forecast against realized values

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Accuracy of a forecast compared to realized outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastAccuracy {
    /// Mean Absolute Error
    pub mae: f64,
    /// Absolute percentage error of the totals
    pub error_percent: f64,
    /// Complementary accuracy percentage, clamped to [0, 100]
    pub accuracy_percent: f64,
}

impl std::fmt::Display for ForecastAccuracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Accuracy:")?;
        writeln!(f, "  MAE:      {:.2}", self.mae)?;
        writeln!(f, "  Error:    {:.2}%", self.error_percent)?;
        writeln!(f, "  Accuracy: {:.2}%", self.accuracy_percent)?;
        Ok(())
    }
}

/// Mean absolute error between paired forecast and actual values.
pub fn mean_absolute_error(forecast: &[f64], actual: &[f64]) -> Result<f64> {
    if forecast.len() != actual.len() || forecast.is_empty() {
        return Err(MathError::InvalidInput(
            "Forecast and actual values must have the same non-zero length".to_string(),
        ));
    }

    let sum: f64 = forecast
        .iter()
        .zip(actual.iter())
        .map(|(f, a)| (f - a).abs())
        .sum();

    Ok(sum / forecast.len() as f64)
}

/// Absolute percentage error of `actual` against `predicted`.
/// A non-positive prediction yields zero rather than a division error.
pub fn error_percent(predicted: f64, actual: f64) -> f64 {
    if predicted <= 0.0 {
        return 0.0;
    }
    (predicted - actual).abs() / predicted * 100.0
}

/// Complementary accuracy percentage, clamped to [0, 100].
pub fn accuracy_percent(error_pct: f64) -> f64 {
    (100.0 - error_pct).clamp(0.0, 100.0)
}

/// Full accuracy record for a forecast/actual pair of daily series.
pub fn evaluate(forecast: &[f64], actual: &[f64]) -> Result<ForecastAccuracy> {
    let mae = mean_absolute_error(forecast, actual)?;
    let predicted_total: f64 = forecast.iter().sum();
    let actual_total: f64 = actual.iter().sum();
    let error_pct = error_percent(predicted_total, actual_total);

    Ok(ForecastAccuracy {
        mae,
        error_percent: error_pct,
        accuracy_percent: accuracy_percent(error_pct),
    })
}
