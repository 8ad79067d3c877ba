use assert_approx_eq::assert_approx_eq;
use chrono::{Duration, NaiveDate};
use mesa_forecast::baseline::WeekdayBaseline;
use mesa_forecast::calibration::{CalibrationSnapshot, WindowKind};
use mesa_forecast::config::ForecastSettings;
use mesa_forecast::data::{EventDay, EventImpact, HolidayDay, WeatherDay, WeekSignals};
use mesa_forecast::enrichment::{bias_factor, enrich_week};
use mesa_forecast::forecast::AdjustmentKind;
use mesa_forecast::patterns::{DetectedPattern, PatternKind, PatternSet};
use mesa_forecast::utils::history_builder::week_of_records;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Settings with the conservative multiplier switched off, so factor
/// math is visible undisturbed.
fn plain_settings() -> ForecastSettings {
    ForecastSettings {
        conservative_factor: 1.0,
        ..ForecastSettings::default()
    }
}

/// Baseline of 1000 every weekday, built from four flat weeks.
fn flat_baseline(target_monday: NaiveDate, settings: &ForecastSettings) -> WeekdayBaseline {
    let mut history = Vec::new();
    for week in 1..=4 {
        let monday = target_monday - Duration::weeks(week);
        history.extend(week_of_records(monday, &[1000.0; 7]));
    }
    WeekdayBaseline::from_history(&history, target_monday, settings)
}

fn pattern(kind: PatternKind, impact: f64, confidence: f64) -> DetectedPattern {
    DetectedPattern {
        kind,
        variant: None,
        impact_factor: impact,
        confidence,
        positive_count: 24,
        complement_count: 24,
    }
}

fn clear_week_weather(monday: NaiveDate) -> Vec<WeatherDay> {
    (0..7)
        .map(|i| WeatherDay {
            date: monday + Duration::days(i),
            weather_code: 1,
            temp_max: Some(21.0),
            temp_min: Some(15.0),
            precipitation_mm: Some(0.0),
            wind_max_kmh: None,
        })
        .collect()
}

#[test]
fn test_missing_signals_degrade_to_baseline() {
    let monday = date(2024, 6, 10);
    let settings = plain_settings();
    let baseline = flat_baseline(monday, &settings);
    let forecast = enrich_week(
        monday,
        &baseline,
        &CalibrationSnapshot::empty(WindowKind::Bias),
        &CalibrationSnapshot::empty(WindowKind::Mae),
        &PatternSet::default(),
        &WeekSignals::unavailable(),
        &settings,
    )
    .unwrap();

    assert_eq!(forecast.daily.len(), 7);
    for day in &forecast.daily {
        assert_approx_eq!(day.revenue, 1000.0, 0.01);
        assert!(day.adjustments.is_empty());
    }
    assert_approx_eq!(forecast.predicted_total, 7000.0, 0.1);
}

#[test]
fn test_extreme_temperature_scenario() {
    // Impact +0.10 at confidence 0.8 on a 1000 baseline: 1080.
    let monday = date(2024, 6, 10);
    let settings = plain_settings();
    let baseline = flat_baseline(monday, &settings);
    let patterns =
        PatternSet::from_patterns(vec![pattern(PatternKind::ExtremeTemperature, 0.10, 0.8)]);

    let mut weather = clear_week_weather(monday);
    weather[0].temp_max = Some(35.0); // Monday is extreme

    let signals = WeekSignals {
        weather: Some(weather),
        holidays: None,
        events: None,
    };
    let forecast = enrich_week(
        monday,
        &baseline,
        &CalibrationSnapshot::empty(WindowKind::Bias),
        &CalibrationSnapshot::empty(WindowKind::Mae),
        &patterns,
        &signals,
        &settings,
    )
    .unwrap();

    assert_approx_eq!(forecast.daily[0].revenue, 1080.0, 0.01);
    assert_eq!(forecast.daily[0].adjustments.len(), 1);
    assert_eq!(
        forecast.daily[0].adjustments[0].kind,
        AdjustmentKind::Temperature
    );
    // The rest of the week is untouched.
    assert_approx_eq!(forecast.daily[1].revenue, 1000.0, 0.01);
}

#[test]
fn test_factors_compose_in_fixed_order() {
    let monday = date(2024, 6, 10);
    let settings = plain_settings();
    let baseline = flat_baseline(monday, &settings);
    let patterns = PatternSet::from_patterns(vec![
        pattern(PatternKind::Rain, -0.10, 1.0),
        pattern(PatternKind::Holiday, 0.20, 1.0),
        pattern(PatternKind::ExtremeTemperature, -0.05, 1.0),
    ]);

    let mut weather = clear_week_weather(monday);
    weather[0].weather_code = 61; // rain
    weather[0].temp_max = Some(2.0); // extreme cold

    let signals = WeekSignals {
        weather: Some(weather),
        holidays: Some(vec![HolidayDay {
            date: monday,
            name: "Whit Monday".to_string(),
        }]),
        events: None,
    };
    let forecast = enrich_week(
        monday,
        &baseline,
        &CalibrationSnapshot::empty(WindowKind::Bias),
        &CalibrationSnapshot::empty(WindowKind::Mae),
        &patterns,
        &signals,
        &settings,
    )
    .unwrap();

    // 1000 × 0.9 × 1.2 × 0.95
    assert_approx_eq!(forecast.daily[0].revenue, 1026.0, 0.01);
    let kinds: Vec<AdjustmentKind> = forecast.daily[0]
        .adjustments
        .iter()
        .map(|a| a.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            AdjustmentKind::Rain,
            AdjustmentKind::Holiday,
            AdjustmentKind::Temperature
        ]
    );
}

#[test]
fn test_low_confidence_pattern_is_damped_toward_noop() {
    let monday = date(2024, 6, 10);
    let settings = plain_settings();
    let baseline = flat_baseline(monday, &settings);
    let patterns = PatternSet::from_patterns(vec![pattern(PatternKind::Rain, -0.20, 0.1)]);

    let mut weather = clear_week_weather(monday);
    weather[0].weather_code = 63;

    let signals = WeekSignals {
        weather: Some(weather),
        holidays: None,
        events: None,
    };
    let forecast = enrich_week(
        monday,
        &baseline,
        &CalibrationSnapshot::empty(WindowKind::Bias),
        &CalibrationSnapshot::empty(WindowKind::Mae),
        &patterns,
        &signals,
        &settings,
    )
    .unwrap();

    // 1000 × (1 − 0.20 × 0.1) = 980
    assert_approx_eq!(forecast.daily[0].revenue, 980.0, 0.01);
}

#[test]
fn test_bias_correction_raises_underpredicting_weekdays() {
    let monday = date(2024, 6, 10);
    let settings = plain_settings();
    let baseline = flat_baseline(monday, &settings);

    // Monday ran +10 % over its forecasts: learned bias +10.
    let mut bias = CalibrationSnapshot::empty(WindowKind::Bias);
    bias.update(0, 10.0, 12);

    let forecast = enrich_week(
        monday,
        &baseline,
        &bias,
        &CalibrationSnapshot::empty(WindowKind::Mae),
        &PatternSet::default(),
        &WeekSignals::unavailable(),
        &settings,
    )
    .unwrap();

    // 1000 × (1 + 0.10 × 0.35) = 1035
    assert_approx_eq!(forecast.daily[0].revenue, 1035.0, 0.01);
    assert_eq!(forecast.daily[0].adjustments[0].kind, AdjustmentKind::Bias);
}

#[test]
fn test_bias_factor_rails() {
    // Huge learned biases cannot push the factor past its rails.
    assert_approx_eq!(bias_factor(100.0), 1.04, 1e-9);
    assert_approx_eq!(bias_factor(-100.0), 0.93, 1e-9);
    // Inside the rails the damped slope applies.
    assert_approx_eq!(bias_factor(10.0), 1.035, 1e-9);
    assert_approx_eq!(bias_factor(0.0), 1.0, 1e-9);
}

#[test]
fn test_event_factor_applies_damped() {
    let monday = date(2024, 6, 10);
    let settings = plain_settings();
    let baseline = flat_baseline(monday, &settings);
    let signals = WeekSignals {
        weather: None,
        holidays: None,
        events: Some(vec![EventDay {
            date: monday,
            name: "Street festival".to_string(),
            impact: Some(EventImpact::High),
        }]),
    };
    let forecast = enrich_week(
        monday,
        &baseline,
        &CalibrationSnapshot::empty(WindowKind::Bias),
        &CalibrationSnapshot::empty(WindowKind::Mae),
        &PatternSet::default(),
        &signals,
        &settings,
    )
    .unwrap();

    // High impact +10 % damped by half: ×1.05
    assert_approx_eq!(forecast.daily[0].revenue, 1050.0, 0.01);
    assert_eq!(forecast.daily[0].adjustments[0].kind, AdjustmentKind::Event);
}

#[test]
fn test_conservative_factor_applies_last() {
    let monday = date(2024, 6, 10);
    let settings = ForecastSettings::default(); // 0.97
    let baseline = flat_baseline(monday, &settings);
    let forecast = enrich_week(
        monday,
        &baseline,
        &CalibrationSnapshot::empty(WindowKind::Bias),
        &CalibrationSnapshot::empty(WindowKind::Mae),
        &PatternSet::default(),
        &WeekSignals::unavailable(),
        &settings,
    )
    .unwrap();

    assert_approx_eq!(forecast.daily[0].revenue, 970.0, 0.01);
    assert_eq!(
        forecast.daily[0].adjustments.last().unwrap().kind,
        AdjustmentKind::Conservative
    );
}

#[test]
fn test_shift_split_sums_to_day_revenue() {
    let monday = date(2024, 6, 10);
    let settings = ForecastSettings::default();
    let baseline = flat_baseline(monday, &settings);
    let forecast = enrich_week(
        monday,
        &baseline,
        &CalibrationSnapshot::empty(WindowKind::Bias),
        &CalibrationSnapshot::empty(WindowKind::Mae),
        &PatternSet::default(),
        &WeekSignals::unavailable(),
        &settings,
    )
    .unwrap();

    for day in &forecast.daily {
        let sum = day.shifts.midday + day.shifts.afternoon + day.shifts.evening;
        assert_approx_eq!(sum, day.revenue, 0.01);
    }
}

#[test]
fn test_rejects_non_monday_target() {
    let settings = ForecastSettings::default();
    let baseline = flat_baseline(date(2024, 6, 10), &settings);
    let result = enrich_week(
        date(2024, 6, 11), // a Tuesday
        &baseline,
        &CalibrationSnapshot::empty(WindowKind::Bias),
        &CalibrationSnapshot::empty(WindowKind::Mae),
        &PatternSet::default(),
        &WeekSignals::unavailable(),
        &settings,
    );
    assert!(result.is_err());
}

#[test]
fn test_revenue_never_goes_negative() {
    let monday = date(2024, 6, 10);
    let settings = plain_settings();
    // Zero-revenue baseline stays at zero through every factor.
    let baseline = WeekdayBaseline::from_history(&[], monday, &settings);
    let patterns = PatternSet::from_patterns(vec![pattern(PatternKind::Rain, -0.20, 1.0)]);
    let mut weather = clear_week_weather(monday);
    for day in &mut weather {
        day.weather_code = 65;
    }
    let forecast = enrich_week(
        monday,
        &baseline,
        &CalibrationSnapshot::empty(WindowKind::Bias),
        &CalibrationSnapshot::empty(WindowKind::Mae),
        &patterns,
        &WeekSignals {
            weather: Some(weather),
            holidays: None,
            events: None,
        },
        &settings,
    )
    .unwrap();
    for day in &forecast.daily {
        assert!(day.revenue >= 0.0);
        assert!(day.revenue_min >= 0.0);
    }
}
