//! Forecast enrichment pipeline
//!
//! Composes the final per-day forecast: weekday baseline, then the
//! learned bias correction, then the pattern factors that apply to the
//! specific calendar day — rain, holiday, temperature, in that order —
//! then the event heuristic and the conservative multiplier. Pattern
//! factors are damped by their confidence, so a weakly evidenced pattern
//! is close to a no-op. A missing signal category skips only that
//! category's adjustment.

use crate::baseline::WeekdayBaseline;
use crate::calendar::week_dates;
use crate::calibration::CalibrationSnapshot;
use crate::config::ForecastSettings;
use crate::data::{EventImpact, WeekSignals};
use crate::error::{ForecastError, Result};
use crate::forecast::{
    Adjustment, AdjustmentKind, DailyForecast, ShiftRevenue, WeeklyForecast,
};
use crate::patterns::{PatternKind, PatternSet};
use chrono::NaiveDate;
use revenue_math::stats::round2;
use tracing::debug;

/// Share of the learned bias actually applied; full application
/// over-corrects on noisy weeks.
const BIAS_DAMPING: f64 = 0.35;
/// Bias percentage is clamped to this magnitude before damping.
const BIAS_PCT_CLAMP: f64 = 20.0;
/// Rails for the resulting bias factor.
const BIAS_FACTOR_MIN: f64 = 0.93;
const BIAS_FACTOR_MAX: f64 = 1.04;

/// Event heuristic: high-impact events lift, low-impact events drag,
/// both at half strength.
const EVENT_LIFT: f64 = 0.10;
const EVENT_DAMPING: f64 = 0.5;

/// Band half-width multiplier over the weekday MAE / spread.
const BAND_WIDTH: f64 = 1.5;
/// The band never leaves ±15 % of the day's prediction.
const BAND_REL_MIN: f64 = 0.85;
const BAND_REL_MAX: f64 = 1.15;

/// Bias correction factor for one weekday.
///
/// The bias sample convention is (actual − predicted) / predicted × 100,
/// so a positive learned bias means past forecasts ran low and the next
/// one is raised.
pub fn bias_factor(bias_pct: f64) -> f64 {
    let clamped = bias_pct.clamp(-BIAS_PCT_CLAMP, BIAS_PCT_CLAMP);
    (1.0 + clamped / 100.0 * BIAS_DAMPING).clamp(BIAS_FACTOR_MIN, BIAS_FACTOR_MAX)
}

/// Damped multiplier for one pattern: `1 + impact × confidence`.
fn pattern_factor(patterns: &PatternSet, kind: PatternKind) -> Option<f64> {
    let pattern = patterns.get(kind)?;
    Some(1.0 + pattern.impact_factor * pattern.confidence)
}

fn event_factor(signals: &WeekSignals, date: NaiveDate) -> Option<f64> {
    let events = signals.events_for(date);
    if events.is_empty() {
        return None;
    }
    // One high-impact event dominates the day; otherwise a low-impact
    // event (road works, closures) drags.
    let mut raw = 1.0;
    for event in events {
        match event.impact {
            Some(EventImpact::High) => {
                raw = 1.0 + EVENT_LIFT;
                break;
            }
            Some(EventImpact::Low) => raw = 1.0 - EVENT_LIFT,
            Some(EventImpact::Medium) | None => {}
        }
    }
    if raw == 1.0 {
        return None;
    }
    Some(1.0 + (raw - 1.0) * EVENT_DAMPING)
}

/// Compute the enriched forecast for the week starting at `target_monday`.
///
/// `bias` is the current calibration snapshot; `mae` widens the expected
/// band. Returns a validation error only for malformed inputs, never for
/// missing data.
pub fn enrich_week(
    target_monday: NaiveDate,
    baseline: &WeekdayBaseline,
    bias: &CalibrationSnapshot,
    mae: &CalibrationSnapshot,
    patterns: &PatternSet,
    signals: &WeekSignals,
    settings: &ForecastSettings,
) -> Result<WeeklyForecast> {
    settings.validate()?;
    if target_monday != crate::calendar::monday_of(target_monday) {
        return Err(ForecastError::ValidationError(format!(
            "Target week must start on a Monday, got {target_monday}"
        )));
    }

    if signals.weather.is_none() {
        debug!(week = %target_monday, "no weather forecast; skipping rain and temperature adjustments");
    }
    if signals.holidays.is_none() {
        debug!(week = %target_monday, "no holiday calendar; skipping holiday adjustment");
    }
    if signals.events.is_none() {
        debug!(week = %target_monday, "no event calendar; skipping event adjustment");
    }

    let mut daily = Vec::with_capacity(7);
    for date in week_dates(target_monday) {
        let weekday = crate::calendar::weekday_slot(date);
        let mut revenue = baseline.average_for(weekday);
        let mut adjustments = Vec::new();

        let bias_f = bias_factor(bias.average_for(weekday));
        if bias_f != 1.0 {
            revenue *= bias_f;
            adjustments.push(Adjustment {
                kind: AdjustmentKind::Bias,
                factor: bias_f,
            });
        }

        // Fixed composition order: rain, then holiday, then temperature.
        let weather = signals.weather_for(date);
        if weather.is_some_and(|w| w.is_rainy()) {
            if let Some(factor) = pattern_factor(patterns, PatternKind::Rain) {
                revenue *= factor;
                adjustments.push(Adjustment {
                    kind: AdjustmentKind::Rain,
                    factor,
                });
            }
        }
        if signals.holiday_for(date).is_some() {
            if let Some(factor) = pattern_factor(patterns, PatternKind::Holiday) {
                revenue *= factor;
                adjustments.push(Adjustment {
                    kind: AdjustmentKind::Holiday,
                    factor,
                });
            }
        }
        if weather.is_some_and(|w| w.has_extreme_temperature()) {
            if let Some(factor) = pattern_factor(patterns, PatternKind::ExtremeTemperature) {
                revenue *= factor;
                adjustments.push(Adjustment {
                    kind: AdjustmentKind::Temperature,
                    factor,
                });
            }
        }
        if let Some(factor) = event_factor(signals, date) {
            revenue *= factor;
            adjustments.push(Adjustment {
                kind: AdjustmentKind::Event,
                factor,
            });
        }

        if settings.conservative_factor != 1.0 {
            revenue *= settings.conservative_factor;
            adjustments.push(Adjustment {
                kind: AdjustmentKind::Conservative,
                factor: settings.conservative_factor,
            });
        }

        revenue = round2(revenue.max(0.0));

        // Expected band: learned MAE or historical spread, whichever is
        // wider, capped at ±15 % of the prediction.
        let spread_eur = baseline.spread_for(weekday) * baseline.average_for(weekday);
        let half_band = (BAND_WIDTH * spread_eur).max(BAND_WIDTH * mae.average_for(weekday));
        let revenue_min = round2((revenue - half_band).max(BAND_REL_MIN * revenue)).max(0.0);
        let revenue_max = round2((revenue + half_band).min(BAND_REL_MAX * revenue));

        let weights = settings.shift_weights;
        let midday = round2(revenue * weights.midday);
        let afternoon = round2(revenue * weights.afternoon);
        // The evening share absorbs rounding so the shifts sum exactly.
        let evening = round2((revenue - midday - afternoon).max(0.0));

        daily.push(DailyForecast {
            date,
            revenue,
            revenue_min,
            revenue_max,
            shifts: ShiftRevenue {
                midday,
                afternoon,
                evening,
            },
            adjustments,
        });
    }

    Ok(WeeklyForecast::new(
        target_monday,
        daily,
        baseline.weeks_used(),
        baseline.low_confidence(settings),
    ))
}
