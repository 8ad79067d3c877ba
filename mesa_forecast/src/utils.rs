//! Utility functions and test-data helpers

use crate::data::DayRecord;
use chrono::{Duration, NaiveDate};

/// Generate synthetic closed-day history for demos and tests.
///
/// Produces `weeks` full weeks ending the day before `end_monday`, with
/// weekend revenue lifted above the weekday level and multiplicative
/// noise controlled by `volatility` (0.0–1.0).
pub fn generate_history(
    end_monday: NaiveDate,
    weeks: usize,
    base_revenue: f64,
    volatility: f64,
) -> Vec<DayRecord> {
    use rand::{thread_rng, Rng};

    let mut rng = thread_rng();
    let mut history = Vec::with_capacity(weeks * 7);
    let start = end_monday - Duration::weeks(weeks as i64);

    for offset in 0..(weeks as i64 * 7) {
        let date = start + Duration::days(offset);
        let weekday = crate::calendar::weekday_slot(date);
        // Fridays and weekends run hotter.
        let level = match weekday {
            4 => 1.3,
            5 => 1.5,
            6 => 1.2,
            _ => 1.0,
        };
        let noise = 1.0 + volatility * (rng.gen::<f64>() - 0.5);
        let revenue = (base_revenue * level * noise).max(0.0);
        history.push(DayRecord {
            date,
            revenue: (revenue * 100.0).round() / 100.0,
            hours_worked: 30.0 + rng.gen::<f64>() * 10.0,
            planned_hours: None,
            feedback_only: false,
            weather_code: Some(if rng.gen::<f64>() < 0.25 { 61 } else { 1 }),
            temp_max: Some(12.0 + rng.gen::<f64>() * 14.0),
            temp_min: Some(6.0 + rng.gen::<f64>() * 8.0),
            precipitation_mm: None,
            wind_max_kmh: None,
            is_holiday: false,
        });
    }

    history
}

/// Deterministic record builders shared by the test suites.
pub mod history_builder {
    use super::*;

    /// A plain qualifying record with the given date and revenue.
    pub fn record(date: NaiveDate, revenue: f64) -> DayRecord {
        DayRecord {
            date,
            revenue,
            hours_worked: 32.0,
            planned_hours: None,
            feedback_only: false,
            weather_code: None,
            temp_max: None,
            temp_min: None,
            precipitation_mm: None,
            wind_max_kmh: None,
            is_holiday: false,
        }
    }

    /// Records for consecutive days of the week starting at `monday`,
    /// one per revenue value (fewer than 7 leaves the week short).
    pub fn week_of_records(monday: NaiveDate, revenues: &[f64]) -> Vec<DayRecord> {
        revenues
            .iter()
            .enumerate()
            .map(|(i, &revenue)| record(monday + Duration::days(i as i64), revenue))
            .collect()
    }
}
