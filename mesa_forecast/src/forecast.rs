//! Forecast output types and the weekly lifecycle

use crate::calendar::{week_is_closed, weekday_slot, WEEKDAY_NAMES};
use chrono::NaiveDate;
use revenue_math::accuracy::ForecastAccuracy;
use serde::{Deserialize, Serialize};

/// Which adjustment touched a day's number, for explainability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdjustmentKind {
    /// Learned per-weekday bias correction
    Bias,
    /// Rain pattern factor
    Rain,
    /// Holiday pattern factor
    Holiday,
    /// Extreme-temperature pattern factor
    Temperature,
    /// Calendar-event heuristic factor
    Event,
    /// Final conservative multiplier
    Conservative,
}

/// One applied adjustment: the factor the day's revenue was multiplied by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adjustment {
    pub kind: AdjustmentKind,
    pub factor: f64,
}

/// Predicted revenue split across the three service shifts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ShiftRevenue {
    pub midday: f64,
    pub afternoon: f64,
    pub evening: f64,
}

/// Forecast for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    /// Final predicted revenue after every adjustment
    pub revenue: f64,
    /// Expected band around the prediction
    pub revenue_min: f64,
    pub revenue_max: f64,
    pub shifts: ShiftRevenue,
    /// Factors applied on top of the weekday baseline, in order
    pub adjustments: Vec<Adjustment>,
}

impl DailyForecast {
    pub fn weekday(&self) -> usize {
        weekday_slot(self.date)
    }

    pub fn weekday_name(&self) -> &'static str {
        WEEKDAY_NAMES[self.weekday()]
    }
}

/// Lifecycle of a week's forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeekStatus {
    /// The week includes today or future dates
    Open,
    /// All seven dates are past but the week is not yet evaluated
    PendingEvaluation,
    /// Evaluated against realized data; terminal
    Evaluated,
}

/// Forecast for one week, identified by its Monday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyForecast {
    pub week_start_monday: NaiveDate,
    pub daily: Vec<DailyForecast>,
    pub predicted_total: f64,
    /// How many qualifying weeks backed the baseline
    pub weeks_used: usize,
    /// Set when the baseline had fewer than the configured minimum weeks
    pub low_confidence: bool,
    /// Realized weekly revenue, set once on evaluation
    pub actual_total: Option<f64>,
    /// Accuracy record, set once on evaluation
    pub accuracy: Option<ForecastAccuracy>,
    /// Whether the evaluation has fired; guards against double feedback
    pub evaluated: bool,
}

impl WeeklyForecast {
    pub fn new(
        week_start_monday: NaiveDate,
        daily: Vec<DailyForecast>,
        weeks_used: usize,
        low_confidence: bool,
    ) -> Self {
        let predicted_total = daily.iter().map(|d| d.revenue).sum();
        Self {
            week_start_monday,
            daily,
            predicted_total,
            weeks_used,
            low_confidence,
            actual_total: None,
            accuracy: None,
            evaluated: false,
        }
    }

    /// Lifecycle state as of `today`.
    pub fn status(&self, today: NaiveDate) -> WeekStatus {
        if self.evaluated {
            WeekStatus::Evaluated
        } else if week_is_closed(self.week_start_monday, today) {
            WeekStatus::PendingEvaluation
        } else {
            WeekStatus::Open
        }
    }

    /// Predicted revenue for a date of this week, if present.
    pub fn predicted_for(&self, date: NaiveDate) -> Option<f64> {
        self.daily.iter().find(|d| d.date == date).map(|d| d.revenue)
    }
}
