//! Thread-safe engine facade
//!
//! Owns the only mutable shared state in the crate: the calibration
//! windows behind a mutex, so an evaluation's read-modify-write of a
//! weekday slot can never interleave with another and lose an eviction,
//! and the pattern set as an `Arc` snapshot behind a read-write lock,
//! swapped whole so readers see either the previous or the new pass,
//! never a partial one.
//!
//! Forecast generation is synchronous and may run concurrently with the
//! periodic recalibration pass a host schedules (the original runs it
//! daily); every computation behind the facade is a pure function of its
//! inputs.

use crate::baseline::WeekdayBaseline;
use crate::calendar::next_monday;
use crate::calibration::{CalibrationSnapshot, WindowKind};
use crate::config::ForecastSettings;
use crate::data::{DayRecord, WeekSignals};
use crate::enrichment::enrich_week;
use crate::error::Result;
use crate::evaluation::{evaluate_week, EvaluationOutcome};
use crate::forecast::WeeklyForecast;
use crate::patterns::{detect_patterns, PatternSet};
use chrono::NaiveDate;
use std::sync::{Arc, Mutex, RwLock};
use tracing::info;

struct CalibrationState {
    bias: CalibrationSnapshot,
    mae: CalibrationSnapshot,
}

/// Serialized calibration state, one document per window kind.
#[derive(Debug, Clone)]
pub struct CalibrationExport {
    pub bias: String,
    pub mae: String,
}

/// The forecasting engine.
pub struct ForecastEngine {
    settings: ForecastSettings,
    calibration: Mutex<CalibrationState>,
    patterns: RwLock<Arc<PatternSet>>,
}

impl ForecastEngine {
    /// Engine with empty calibration state and no learned patterns.
    pub fn new(settings: ForecastSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            calibration: Mutex::new(CalibrationState {
                bias: CalibrationSnapshot::empty(WindowKind::Bias),
                mae: CalibrationSnapshot::empty(WindowKind::Mae),
            }),
            patterns: RwLock::new(Arc::new(PatternSet::default())),
        })
    }

    /// Engine restored from persisted calibration snapshots. Malformed
    /// snapshots reset to empty state per the calibration contract.
    pub fn with_calibration(
        settings: ForecastSettings,
        bias_json: Option<&str>,
        mae_json: Option<&str>,
    ) -> Result<Self> {
        let engine = Self::new(settings)?;
        {
            let mut state = engine.calibration.lock().expect("calibration lock");
            state.bias = CalibrationSnapshot::parse(WindowKind::Bias, bias_json);
            state.mae = CalibrationSnapshot::parse(WindowKind::Mae, mae_json);
        }
        Ok(engine)
    }

    pub fn settings(&self) -> &ForecastSettings {
        &self.settings
    }

    /// Forecast the week after `today` from history plus target-week
    /// signals. Pure read of the shared state.
    pub fn forecast_next_week(
        &self,
        history: &[DayRecord],
        signals: &WeekSignals,
        today: NaiveDate,
    ) -> Result<WeeklyForecast> {
        self.forecast_week(next_monday(today), history, signals)
    }

    /// Forecast a specific week starting at `target_monday`.
    pub fn forecast_week(
        &self,
        target_monday: NaiveDate,
        history: &[DayRecord],
        signals: &WeekSignals,
    ) -> Result<WeeklyForecast> {
        let baseline = WeekdayBaseline::from_history(history, target_monday, &self.settings);
        let patterns = self.current_patterns();
        let (bias, mae) = {
            let state = self.calibration.lock().expect("calibration lock");
            (state.bias.clone(), state.mae.clone())
        };
        enrich_week(
            target_monday,
            &baseline,
            &bias,
            &mae,
            &patterns,
            signals,
            &self.settings,
        )
    }

    /// Evaluate a closed week and feed its errors into the calibration
    /// windows. The lock is held across the whole read-modify-write, so
    /// concurrent evaluations serialize per the ordering contract;
    /// re-evaluating an evaluated week is a no-op.
    pub fn evaluate_week(
        &self,
        forecast: &mut WeeklyForecast,
        realized: &[DayRecord],
        today: NaiveDate,
    ) -> EvaluationOutcome {
        let mut state = self.calibration.lock().expect("calibration lock");
        let CalibrationState { bias, mae } = &mut *state;
        let outcome = evaluate_week(forecast, realized, bias, mae, today, &self.settings);
        if outcome == EvaluationOutcome::Evaluated {
            info!(
                week = %forecast.week_start_monday,
                accuracy = forecast.accuracy.as_ref().map(|a| a.accuracy_percent),
                "week evaluated"
            );
        }
        outcome
    }

    /// Recompute the learned patterns from history and swap the snapshot
    /// in whole.
    pub fn recompute_patterns(&self, history: &[DayRecord], as_of: NaiveDate) {
        let fresh = Arc::new(detect_patterns(history, as_of, &self.settings));
        *self.patterns.write().expect("patterns lock") = fresh;
    }

    /// The current pattern snapshot.
    pub fn current_patterns(&self) -> Arc<PatternSet> {
        Arc::clone(&self.patterns.read().expect("patterns lock"))
    }

    /// One recalibration pass, as a host's periodic task would drive it:
    /// evaluate the pending week, then relearn patterns.
    pub fn run_recalibration(
        &self,
        pending: &mut WeeklyForecast,
        history: &[DayRecord],
        today: NaiveDate,
    ) -> EvaluationOutcome {
        let outcome = self.evaluate_week(pending, history, today);
        self.recompute_patterns(history, today);
        outcome
    }

    /// Current per-weekday bias averages, Monday first.
    pub fn bias_averages(&self) -> [f64; crate::calendar::WEEKDAYS] {
        *self.calibration.lock().expect("calibration lock").bias.averages()
    }

    /// Current per-weekday MAE averages, Monday first.
    pub fn mae_averages(&self) -> [f64; crate::calendar::WEEKDAYS] {
        *self.calibration.lock().expect("calibration lock").mae.averages()
    }

    /// Serialize the calibration state for persistence.
    pub fn export_calibration(&self) -> CalibrationExport {
        let state = self.calibration.lock().expect("calibration lock");
        CalibrationExport {
            bias: state.bias.serialize(),
            mae: state.mae.serialize(),
        }
    }
}
