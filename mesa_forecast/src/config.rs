//! Engine settings, threaded explicitly through every computation

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Revenue share of each service shift in a day's total.
///
/// The evening share absorbs rounding so the three always sum to one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShiftWeights {
    pub midday: f64,
    pub afternoon: f64,
    pub evening: f64,
}

impl Default for ShiftWeights {
    fn default() -> Self {
        Self {
            midday: 0.33,
            afternoon: 0.33,
            evening: 0.34,
        }
    }
}

/// Configuration for the forecasting engine.
///
/// All tunables live here so the computations stay pure functions of
/// their inputs; nothing reads ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSettings {
    /// Target productivity for the whole team, in euros per labor-hour.
    pub target_productivity_eur_per_hour: f64,
    /// Default length of one service shift, in hours.
    pub shift_hours: f64,
    /// Capacity of each per-weekday bias/MAE window.
    pub calibration_window_capacity: usize,
    /// Trailing window the pattern detector learns from, in weeks.
    pub pattern_lookback_weeks: u32,
    /// Below this many qualifying weeks the baseline is flagged low-confidence.
    pub min_weeks_for_baseline: usize,
    /// At most this many recent qualifying weeks feed the baseline.
    pub max_baseline_weeks: usize,
    /// A week qualifies (for baseline and evaluation) with at least this
    /// many recorded, non-placeholder days.
    pub min_days_per_week: usize,
    /// Final multiplier on the whole day; below 1 biases the forecast
    /// toward caution. Valid range (0, 2].
    pub conservative_factor: f64,
    /// Default revenue split across the three shifts.
    pub shift_weights: ShiftWeights,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            target_productivity_eur_per_hour: 50.0,
            shift_hours: 4.0,
            calibration_window_capacity: revenue_math::window::DEFAULT_WINDOW_CAPACITY,
            pattern_lookback_weeks: 12,
            min_weeks_for_baseline: 4,
            max_baseline_weeks: 8,
            min_days_per_week: 5,
            conservative_factor: 0.97,
            shift_weights: ShiftWeights::default(),
        }
    }
}

impl ForecastSettings {
    /// Validate the settings, rejecting values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.target_productivity_eur_per_hour <= 0.0 {
            return Err(ForecastError::ValidationError(
                "Target productivity must be positive".to_string(),
            ));
        }
        if self.shift_hours <= 0.0 {
            return Err(ForecastError::ValidationError(
                "Shift hours must be positive".to_string(),
            ));
        }
        if self.calibration_window_capacity == 0 {
            return Err(ForecastError::ValidationError(
                "Calibration window capacity must be greater than zero".to_string(),
            ));
        }
        if self.pattern_lookback_weeks == 0 {
            return Err(ForecastError::ValidationError(
                "Pattern lookback must cover at least one week".to_string(),
            ));
        }
        if self.min_days_per_week == 0 || self.min_days_per_week > 7 {
            return Err(ForecastError::ValidationError(
                "Minimum days per week must be between 1 and 7".to_string(),
            ));
        }
        if self.max_baseline_weeks == 0 {
            return Err(ForecastError::ValidationError(
                "Baseline must use at least one week".to_string(),
            ));
        }
        if self.conservative_factor <= 0.0 || self.conservative_factor > 2.0 {
            return Err(ForecastError::ValidationError(
                "Conservative factor must be in (0, 2]".to_string(),
            ));
        }
        let weight_sum =
            self.shift_weights.midday + self.shift_weights.afternoon + self.shift_weights.evening;
        if !(0.99..=1.01).contains(&weight_sum) {
            return Err(ForecastError::ValidationError(format!(
                "Shift weights must sum to 1, got {weight_sum}"
            )));
        }
        Ok(())
    }
}
