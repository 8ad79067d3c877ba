use chrono::NaiveDate;
use mesa_forecast::config::ForecastSettings;
use mesa_forecast::forecast::{DailyForecast, ShiftRevenue};
use mesa_forecast::staffing::{
    recommend_day, required_labor_hours, tiered_headcount, ComfortBand, ComfortCurve,
    ComfortScheme, Shift, StaffPair, StaffSource, StaffingHistory,
};
use rstest::rstest;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn day_forecast(revenue: f64) -> DailyForecast {
    DailyForecast {
        date: date(2024, 6, 14), // a Friday
        revenue,
        revenue_min: revenue,
        revenue_max: revenue,
        shifts: ShiftRevenue {
            midday: revenue * 0.33,
            afternoon: revenue * 0.33,
            evening: revenue * 0.34,
        },
        adjustments: Vec::new(),
    }
}

fn comfort_curve() -> ComfortCurve {
    // Small teams become uncomfortable above 400 € per worker; larger
    // ones never reported discomfort.
    let tight = |scheme: &str| ComfortScheme {
        scheme: scheme.to_string(),
        bands: vec![
            ComfortBand { min: 0.0, max: 400.0, avg_difficulty: 2.0, count: 10 },
            ComfortBand { min: 400.0, max: 500.0, avg_difficulty: 3.8, count: 6 },
        ],
    };
    let roomy = |scheme: &str| ComfortScheme {
        scheme: scheme.to_string(),
        bands: vec![ComfortBand { min: 0.0, max: 400.0, avg_difficulty: 1.8, count: 4 }],
    };
    ComfortCurve {
        schemes: vec![
            tight("1-1"),
            tight("1-2"),
            tight("2-1"),
            roomy("2-2"),
            roomy("2-3"),
            roomy("3-2"),
            roomy("3-3"),
        ],
    }
}

#[rstest]
#[case(150.0, 1)]
#[case(200.0, 2)] // 50 €/h × 4 h
#[case(499.0, 2)]
#[case(500.0, 3)] // +50 % step
#[case(100_000.0, 6)] // capped
fn test_tiered_headcount(#[case] revenue: f64, #[case] expected: u32) {
    assert_eq!(tiered_headcount(revenue, &ForecastSettings::default()), expected);
}

#[test]
fn test_required_labor_hours() {
    let settings = ForecastSettings::default();
    assert_eq!(required_labor_hours(2000.0, &settings), 40.0);
    assert_eq!(required_labor_hours(0.0, &settings), 0.0);
}

#[test]
fn test_comfort_curve_picks_smallest_comfortable_scheme() {
    // 1800 € day → ~600 € per shift; one worker per role would carry
    // 600 € > 400 € limit, so the curve escalates to a 2-2 team.
    let settings = ForecastSettings::default();
    let day = day_forecast(1800.0);
    let staffing = recommend_day(&day, &StaffingHistory::default(), &comfort_curve(), &settings);

    assert_eq!(staffing.source, StaffSource::Heuristic);
    assert_eq!(staffing.midday, StaffPair { floor: 2, kitchen: 2 });
}

#[test]
fn test_low_revenue_day_caps_at_two_per_role() {
    let settings = ForecastSettings::default();
    // Below the 3000 € day threshold no role exceeds two per shift,
    // regardless of what the curve would allow.
    let day = day_forecast(2800.0);
    let staffing = recommend_day(&day, &StaffingHistory::default(), &comfort_curve(), &settings);
    for shift in [Shift::Midday, Shift::Afternoon, Shift::Evening] {
        let pair = staffing.for_shift(shift);
        assert!(pair.floor <= 2 && pair.kitchen <= 2);
    }
}

#[test]
fn test_historic_staffing_scales_with_revenue_ratio() {
    let settings = ForecastSettings::default();
    // Fridays historically ran 2-2 per shift at ~500 € per shift.
    let friday = date(2024, 6, 7);
    let mut reports = Vec::new();
    for shift in [Shift::Midday, Shift::Afternoon, Shift::Evening] {
        reports.push((friday, shift, 2u32, 2u32, 500.0));
        reports.push((date(2024, 5, 31), shift, 2u32, 2u32, 500.0));
    }
    let history = StaffingHistory::from_reports(&reports);

    // Forecast close to the historic level: keep the historic team.
    let day = day_forecast(1500.0);
    let staffing = recommend_day(&day, &history, &ComfortCurve::default(), &settings);
    assert_eq!(staffing.source, StaffSource::Historic);
    assert_eq!(staffing.midday, StaffPair { floor: 2, kitchen: 2 });

    // A much hotter forecast scales the team up (ratio clamped at 1.6),
    // but the per-role rail holds at three.
    let hot = day_forecast(6000.0);
    let staffing = recommend_day(&hot, &history, &ComfortCurve::default(), &settings);
    assert_eq!(staffing.midday, StaffPair { floor: 3, kitchen: 3 });
}

#[test]
fn test_history_needs_minimum_samples() {
    let settings = ForecastSettings::default();
    // A single report per slot is not enough to trust.
    let reports = vec![(date(2024, 6, 7), Shift::Midday, 3u32, 3u32, 900.0)];
    let history = StaffingHistory::from_reports(&reports);
    assert!(history.is_empty());

    let day = day_forecast(1500.0);
    let staffing = recommend_day(&day, &history, &ComfortCurve::default(), &settings);
    assert_eq!(staffing.source, StaffSource::Heuristic);
}

#[test]
fn test_fallback_without_any_data_uses_productivity_tiers() {
    let settings = ForecastSettings::default();
    // ~3400 € day → ~1130 € per shift → 4 people → 2-2 split.
    let day = day_forecast(3400.0);
    let staffing = recommend_day(&day, &StaffingHistory::default(), &ComfortCurve::default(), &settings);
    assert_eq!(staffing.source, StaffSource::Heuristic);
    let pair = staffing.midday;
    assert!(pair.floor >= 1 && pair.kitchen >= 1);
    assert!(pair.kitchen >= pair.floor);
}

#[test]
fn test_sizing_uses_low_edge_of_revenue_band() {
    let settings = ForecastSettings::default();
    let mut day = day_forecast(4000.0);
    // The band's low edge sits well under the point forecast; staffing
    // must follow the cautious number.
    day.revenue_min = 2000.0;
    let cautious = recommend_day(&day, &StaffingHistory::default(), &comfort_curve(), &settings);

    let mut flat = day_forecast(4000.0);
    flat.revenue_min = 4000.0;
    let bold = recommend_day(&flat, &StaffingHistory::default(), &comfort_curve(), &settings);

    let total = |p: StaffPair| p.floor + p.kitchen;
    assert!(total(cautious.midday) <= total(bold.midday));
}

#[test]
fn test_every_shift_keeps_at_least_one_per_role() {
    let settings = ForecastSettings::default();
    let day = day_forecast(0.0);
    let staffing = recommend_day(&day, &StaffingHistory::default(), &ComfortCurve::default(), &settings);
    for shift in [Shift::Midday, Shift::Afternoon, Shift::Evening] {
        let pair = staffing.for_shift(shift);
        assert!(pair.floor >= 1);
        assert!(pair.kitchen >= 1);
    }
}
