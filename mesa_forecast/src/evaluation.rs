//! Weekly evaluation and calibration feedback
//!
//! Once a week's seven dates are strictly in the past, the realized
//! revenue is summed, the forecast's accuracy recorded, and each day's
//! signed bias percentage and absolute error pushed into that weekday's
//! calibration windows. The transition fires at most once per week;
//! re-running it is a reported-success no-op.

use crate::calendar::{week_dates, weekday_slot};
use crate::calibration::CalibrationSnapshot;
use crate::config::ForecastSettings;
use crate::data::DayRecord;
use crate::forecast::{WeekStatus, WeeklyForecast};
use chrono::NaiveDate;
use revenue_math::accuracy::{
    accuracy_percent, error_percent, mean_absolute_error, ForecastAccuracy,
};
use revenue_math::stats::round2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Result of an evaluation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationOutcome {
    /// The week was closed and has now been evaluated
    Evaluated,
    /// The week was already evaluated; nothing changed
    AlreadyEvaluated,
    /// The week still includes today or future dates
    NotClosed,
    /// Too few realized days to trust; nothing recorded
    IncompleteData,
}

/// Evaluate a closed week against realized day records, feeding the
/// per-day errors into the bias and MAE windows.
///
/// Days with a non-positive prediction contribute nothing to the
/// windows; a week with fewer than `min_days_per_week` realized
/// non-placeholder days is skipped entirely so a quiet data pipeline
/// cannot masquerade as a collapse in revenue.
pub fn evaluate_week(
    forecast: &mut WeeklyForecast,
    realized: &[DayRecord],
    bias: &mut CalibrationSnapshot,
    mae: &mut CalibrationSnapshot,
    today: NaiveDate,
    settings: &ForecastSettings,
) -> EvaluationOutcome {
    match forecast.status(today) {
        WeekStatus::Evaluated => return EvaluationOutcome::AlreadyEvaluated,
        WeekStatus::Open => return EvaluationOutcome::NotClosed,
        WeekStatus::PendingEvaluation => {}
    }

    let dates = week_dates(forecast.week_start_monday);
    let by_date: HashMap<NaiveDate, f64> = realized
        .iter()
        .filter(|d| !d.feedback_only && dates.contains(&d.date))
        .map(|d| (d.date, d.revenue))
        .collect();

    let recorded_days = by_date.values().filter(|&&r| r > 0.0).count();
    if recorded_days < settings.min_days_per_week {
        debug!(
            week = %forecast.week_start_monday,
            recorded_days,
            "skipping evaluation, realized data incomplete"
        );
        return EvaluationOutcome::IncompleteData;
    }

    let actual_total: f64 = by_date.values().sum();
    let mut predicted = Vec::with_capacity(7);
    let mut actuals = Vec::with_capacity(7);

    for day in &forecast.daily {
        if day.revenue <= 0.0 {
            continue;
        }
        let actual = by_date.get(&day.date).copied().unwrap_or(0.0);
        let weekday = weekday_slot(day.date);
        let bias_pct = (actual - day.revenue) / day.revenue * 100.0;
        bias.update(weekday, bias_pct, settings.calibration_window_capacity);
        mae.update(
            weekday,
            (day.revenue - actual).abs(),
            settings.calibration_window_capacity,
        );
        predicted.push(day.revenue);
        actuals.push(actual);
    }

    let error_pct = error_percent(forecast.predicted_total, actual_total);
    forecast.actual_total = Some(round2(actual_total));
    forecast.accuracy = Some(ForecastAccuracy {
        mae: round2(mean_absolute_error(&predicted, &actuals).unwrap_or(0.0)),
        error_percent: round2(error_pct),
        accuracy_percent: round2(accuracy_percent(error_pct)),
    });
    forecast.evaluated = true;

    EvaluationOutcome::Evaluated
}

/// Realized per-shift staffing for one day, floor and kitchen headcount
/// per shift in midday/afternoon/evening order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RealizedStaffDay {
    pub date: NaiveDate,
    pub floor: [u32; 3],
    pub kitchen: [u32; 3],
}

/// Accuracy of staffing recommendations against realized headcounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffAccuracy {
    /// Mean absolute headcount error across all compared role-shifts
    pub headcount_mae: f64,
    /// Number of compared role-shifts
    pub comparisons: usize,
    /// Percentage of shifts where both roles matched exactly
    pub exact_match_percent: f64,
}

/// Compare recommended staffing with what was actually scheduled.
///
/// Only dates present in both inputs are compared; with no overlap the
/// result reports zero comparisons rather than a spurious 100 %.
pub fn staff_accuracy(
    recommended: &[(NaiveDate, crate::staffing::DayStaffing)],
    realized: &[RealizedStaffDay],
) -> StaffAccuracy {
    let mut total_error = 0u32;
    let mut comparisons = 0usize;
    let mut exact = 0usize;
    let mut shifts_compared = 0usize;

    for actual in realized {
        let Some((_, plan)) = recommended.iter().find(|(date, _)| *date == actual.date) else {
            continue;
        };
        let planned_floor = [plan.midday.floor, plan.afternoon.floor, plan.evening.floor];
        let planned_kitchen = [
            plan.midday.kitchen,
            plan.afternoon.kitchen,
            plan.evening.kitchen,
        ];
        for shift in 0..3 {
            total_error += planned_floor[shift].abs_diff(actual.floor[shift]);
            total_error += planned_kitchen[shift].abs_diff(actual.kitchen[shift]);
            comparisons += 2;
            shifts_compared += 1;
            if planned_floor[shift] == actual.floor[shift]
                && planned_kitchen[shift] == actual.kitchen[shift]
            {
                exact += 1;
            }
        }
    }

    StaffAccuracy {
        headcount_mae: if comparisons > 0 {
            round2(total_error as f64 / comparisons as f64)
        } else {
            0.0
        },
        comparisons,
        exact_match_percent: if shifts_compared > 0 {
            round2(100.0 * exact as f64 / shifts_compared as f64)
        } else {
            0.0
        },
    }
}
