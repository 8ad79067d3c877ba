//! Per-weekday baseline revenue from recent qualifying weeks

use crate::calendar::{monday_of, WEEKDAYS};
use crate::config::ForecastSettings;
use crate::data::DayRecord;
use chrono::NaiveDate;
use revenue_math::stats;
use std::collections::BTreeMap;

/// Historical weekday averages feeding the forecast.
#[derive(Debug, Clone)]
pub struct WeekdayBaseline {
    averages: [f64; WEEKDAYS],
    /// Relative spread per weekday (std-dev / mean), for banding
    spread: [f64; WEEKDAYS],
    weeks_used: usize,
    overall_average: f64,
}

/// Relative spread assumed for weekdays without enough history.
const DEFAULT_SPREAD: f64 = 0.15;

impl WeekdayBaseline {
    /// Build the baseline from historical day records.
    ///
    /// Placeholder and zero-revenue/zero-hours days are excluded. Days
    /// group into weeks by their Monday; a week qualifies with at least
    /// `min_days_per_week` remaining days, and only the most recent
    /// `max_baseline_weeks` qualifying weeks before `target_monday` are
    /// used. Weekdays absent from those weeks fall back to the overall
    /// mean.
    pub fn from_history(
        history: &[DayRecord],
        target_monday: NaiveDate,
        settings: &ForecastSettings,
    ) -> Self {
        let mut weeks: BTreeMap<NaiveDate, Vec<&DayRecord>> = BTreeMap::new();
        for day in history {
            if day.qualifies() && day.date < target_monday {
                weeks.entry(monday_of(day.date)).or_default().push(day);
            }
        }
        weeks.retain(|_, days| days.len() >= settings.min_days_per_week);

        let kept: Vec<&DayRecord> = weeks
            .iter()
            .rev()
            .take(settings.max_baseline_weeks)
            .flat_map(|(_, days)| days.iter().copied())
            .collect();
        let weeks_used = weeks.len().min(settings.max_baseline_weeks);

        let all_revenues: Vec<f64> = kept.iter().map(|d| d.revenue).collect();
        let overall_average = stats::mean(&all_revenues);

        let mut averages = [0.0; WEEKDAYS];
        let mut spread = [DEFAULT_SPREAD; WEEKDAYS];
        for slot in 0..WEEKDAYS {
            let revenues: Vec<f64> = kept
                .iter()
                .filter(|d| crate::calendar::weekday_slot(d.date) == slot)
                .map(|d| d.revenue)
                .collect();
            if revenues.is_empty() {
                averages[slot] = overall_average;
            } else {
                averages[slot] = stats::mean(&revenues);
                if averages[slot] > 0.0 {
                    spread[slot] = stats::std_dev(&revenues) / averages[slot];
                }
            }
        }

        Self {
            averages,
            spread,
            weeks_used,
            overall_average,
        }
    }

    /// Mean revenue for a weekday slot.
    pub fn average_for(&self, weekday: usize) -> f64 {
        self.averages[weekday]
    }

    /// Relative spread for a weekday slot.
    pub fn spread_for(&self, weekday: usize) -> f64 {
        self.spread[weekday]
    }

    /// Number of qualifying weeks that fed the baseline.
    pub fn weeks_used(&self) -> usize {
        self.weeks_used
    }

    /// Mean over all kept days, used as the fill value for empty slots.
    pub fn overall_average(&self) -> f64 {
        self.overall_average
    }

    /// Whether consumers should treat this baseline as low-confidence.
    pub fn low_confidence(&self, settings: &ForecastSettings) -> bool {
        self.weeks_used < settings.min_weeks_for_baseline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::history_builder::week_of_records;

    fn settings() -> ForecastSettings {
        ForecastSettings::default()
    }

    #[test]
    fn no_history_means_zero_baseline() {
        let target = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let baseline = WeekdayBaseline::from_history(&[], target, &settings());
        assert_eq!(baseline.weeks_used(), 0);
        assert!(baseline.low_confidence(&settings()));
        assert_eq!(baseline.average_for(0), 0.0);
    }

    #[test]
    fn short_weeks_do_not_qualify() {
        let target = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        // Week with only 4 recorded days: below the 5-day rule.
        let monday = NaiveDate::from_ymd_opt(2024, 2, 26).unwrap();
        let history = week_of_records(monday, &[900.0, 950.0, 1000.0, 1100.0]);
        let baseline = WeekdayBaseline::from_history(&history, target, &settings());
        assert_eq!(baseline.weeks_used(), 0);
    }

    #[test]
    fn weekday_average_over_qualifying_weeks() {
        let target = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let mut history = Vec::new();
        for week in 0..4 {
            let monday = target - chrono::Duration::weeks(week + 1);
            // 5 recorded days, Monday revenue rises 1000, 1100, 1200, 1300
            let base = 1000.0 + week as f64 * 100.0;
            history.extend(week_of_records(
                monday,
                &[base, 800.0, 850.0, 900.0, 1500.0],
            ));
        }
        let baseline = WeekdayBaseline::from_history(&history, target, &settings());
        assert_eq!(baseline.weeks_used(), 4);
        assert!(!baseline.low_confidence(&settings()));
        assert_eq!(baseline.average_for(0), 1150.0);
        assert_eq!(baseline.average_for(4), 1500.0);
    }
}
