//! Learned categorical impact patterns
//!
//! Each learning pass partitions the trailing history into category and
//! complement day groups (rainy vs clear, holiday vs ordinary, extreme vs
//! mild temperature) and produces a relative impact factor with a
//! confidence score. The whole pattern set is recomputed and replaced in
//! one piece; nothing is blended into a previous pass.

use crate::calendar::{weekday_slot, WEEKDAY_NAMES, WEEKDAYS};
use crate::config::ForecastSettings;
use crate::data::{is_clear_code, is_rain_code, DayRecord};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Below this °C a day counts as extreme cold.
pub const EXTREME_TEMP_LOW: f64 = 5.0;
/// Above this °C a day counts as extreme heat.
pub const EXTREME_TEMP_HIGH: f64 = 30.0;
/// Mild comparison band, lower edge.
pub const MILD_TEMP_MIN: f64 = 15.0;
/// Mild comparison band, upper edge.
pub const MILD_TEMP_MAX: f64 = 25.0;

/// Sample count at which confidence reaches one half; the original
/// minimum group size.
const CONFIDENCE_HALF_POINT: f64 = 6.0;

/// Impact clamp for weather-driven categories.
const WEATHER_IMPACT_CLAMP: f64 = 0.20;
/// Impact clamp for holidays, which swing harder.
const HOLIDAY_IMPACT_CLAMP: f64 = 0.30;

/// Minimum total history before any pattern is learned.
const MIN_DAYS_FOR_LEARNING: usize = 10;

/// Monitored pattern categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternKind {
    /// Rainy vs clear days
    Rain,
    /// Public holidays vs ordinary days
    Holiday,
    /// Extreme vs mild temperature days
    ExtremeTemperature,
    /// Per-weekday level statistics, kept for inspection
    Seasonal,
}

/// One learned pattern: a relative revenue shift and how much to trust it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedPattern {
    pub kind: PatternKind,
    /// Variant key, e.g. the weekday name for seasonal entries
    pub variant: Option<String>,
    /// Relative shift vs the complement group, e.g. +0.12 = +12 %
    pub impact_factor: f64,
    /// Trust in the factor, [0, 1]
    pub confidence: f64,
    /// Days in the category group
    pub positive_count: usize,
    /// Days in the complement group
    pub complement_count: usize,
}

/// Immutable snapshot of one learning pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternSet {
    patterns: Vec<DetectedPattern>,
}

impl PatternSet {
    /// Assemble a set directly, e.g. when restoring a persisted pass.
    pub fn from_patterns(patterns: Vec<DetectedPattern>) -> Self {
        Self { patterns }
    }

    pub fn get(&self, kind: PatternKind) -> Option<&DetectedPattern> {
        self.patterns
            .iter()
            .find(|p| p.kind == kind && p.variant.is_none())
    }

    pub fn get_variant(&self, kind: PatternKind, variant: &str) -> Option<&DetectedPattern> {
        self.patterns
            .iter()
            .find(|p| p.kind == kind && p.variant.as_deref() == Some(variant))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DetectedPattern> {
        self.patterns.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Confidence from the smaller group's sample count: zero with no
/// samples, one half at the historical minimum group size, saturating
/// toward one as evidence accumulates.
pub fn confidence_from_samples(min_group_count: usize) -> f64 {
    if min_group_count == 0 {
        return 0.0;
    }
    let n = min_group_count as f64;
    n / (n + CONFIDENCE_HALF_POINT)
}

/// Relative impact of a category group against its complement, clamped.
/// Zero when either group is empty or the complement mean is not
/// positive — there is nothing meaningful to compare against.
fn impact_factor(group: &[f64], complement: &[f64], clamp: f64) -> Option<(f64, f64)> {
    if group.is_empty() || complement.is_empty() {
        return None;
    }
    let complement_mean = complement.iter().copied().mean();
    if complement_mean <= 0.0 {
        return None;
    }
    let group_mean = group.iter().copied().mean();
    let impact = ((group_mean - complement_mean) / complement_mean).clamp(-clamp, clamp);
    let confidence = confidence_from_samples(group.len().min(complement.len()));
    Some((impact, confidence))
}

/// Learn the full pattern set from the trailing history window.
///
/// Pure function: the returned snapshot supersedes any previous one
/// wholesale. Days outside the lookback window, placeholder days and
/// zero-revenue days are ignored.
pub fn detect_patterns(
    history: &[DayRecord],
    as_of: NaiveDate,
    settings: &ForecastSettings,
) -> PatternSet {
    let lookback_start = as_of - Duration::weeks(settings.pattern_lookback_weeks as i64);
    let days: Vec<&DayRecord> = history
        .iter()
        .filter(|d| d.qualifies() && d.date >= lookback_start && d.date < as_of)
        .collect();

    let mut patterns = Vec::new();
    if days.len() < MIN_DAYS_FOR_LEARNING {
        return PatternSet { patterns };
    }

    // Seasonal level per weekday, for inspection and explainability.
    for slot in 0..WEEKDAYS {
        let revenues: Vec<f64> = days
            .iter()
            .filter(|d| weekday_slot(d.date) == slot)
            .map(|d| d.revenue)
            .collect();
        if revenues.len() < 2 {
            continue;
        }
        patterns.push(DetectedPattern {
            kind: PatternKind::Seasonal,
            variant: Some(WEEKDAY_NAMES[slot].to_string()),
            impact_factor: 0.0,
            confidence: confidence_from_samples(revenues.len()),
            positive_count: revenues.len(),
            complement_count: 0,
        });
    }

    // Rain vs clear.
    let rainy: Vec<f64> = days
        .iter()
        .filter(|d| d.weather_code.is_some_and(is_rain_code))
        .map(|d| d.revenue)
        .collect();
    let clear: Vec<f64> = days
        .iter()
        .filter(|d| d.weather_code.is_some_and(is_clear_code))
        .map(|d| d.revenue)
        .collect();
    if let Some((impact, confidence)) = impact_factor(&rainy, &clear, WEATHER_IMPACT_CLAMP) {
        patterns.push(DetectedPattern {
            kind: PatternKind::Rain,
            variant: None,
            impact_factor: impact,
            confidence,
            positive_count: rainy.len(),
            complement_count: clear.len(),
        });
    }

    // Holiday vs ordinary.
    let holiday: Vec<f64> = days
        .iter()
        .filter(|d| d.is_holiday)
        .map(|d| d.revenue)
        .collect();
    let ordinary: Vec<f64> = days
        .iter()
        .filter(|d| !d.is_holiday)
        .map(|d| d.revenue)
        .collect();
    if let Some((impact, confidence)) = impact_factor(&holiday, &ordinary, HOLIDAY_IMPACT_CLAMP) {
        patterns.push(DetectedPattern {
            kind: PatternKind::Holiday,
            variant: None,
            impact_factor: impact,
            confidence,
            positive_count: holiday.len(),
            complement_count: ordinary.len(),
        });
    }

    // Extreme vs mild temperature. Days without a reading stay out of
    // both groups.
    let temp_of = |d: &DayRecord| d.temp_max.or(d.temp_min);
    let extreme: Vec<f64> = days
        .iter()
        .filter(|d| {
            temp_of(d).is_some_and(|t| t < EXTREME_TEMP_LOW || t > EXTREME_TEMP_HIGH)
        })
        .map(|d| d.revenue)
        .collect();
    let mild: Vec<f64> = days
        .iter()
        .filter(|d| temp_of(d).is_some_and(|t| (MILD_TEMP_MIN..=MILD_TEMP_MAX).contains(&t)))
        .map(|d| d.revenue)
        .collect();
    if let Some((impact, confidence)) = impact_factor(&extreme, &mild, WEATHER_IMPACT_CLAMP) {
        patterns.push(DetectedPattern {
            kind: PatternKind::ExtremeTemperature,
            variant: None,
            impact_factor: impact,
            confidence,
            positive_count: extreme.len(),
            complement_count: mild.len(),
        });
    }

    PatternSet { patterns }
}
