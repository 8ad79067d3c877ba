// Walks one full forecasting cycle: learn patterns from history,
// forecast next week, recommend staffing, close the week and feed the
// errors back into the calibration windows.
use chrono::{Duration, NaiveDate};
use mesa_forecast::calendar::{monday_of, next_monday};
use mesa_forecast::config::ForecastSettings;
use mesa_forecast::data::{HolidayDay, WeatherDay, WeekSignals};
use mesa_forecast::engine::ForecastEngine;
use mesa_forecast::staffing::{recommend_day, ComfortCurve, StaffingHistory};
use mesa_forecast::utils::generate_history;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let today = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
    let settings = ForecastSettings::default();
    let engine = ForecastEngine::new(settings.clone())?;

    println!("=== History ===");
    let history = generate_history(monday_of(today), 12, 1100.0, 0.15);
    println!("{} closed days of history", history.len());

    engine.recompute_patterns(&history, today);
    println!("\n=== Learned patterns ===");
    for pattern in engine.current_patterns().iter() {
        println!(
            "- {:?} {:?}: impact {:+.1}%, confidence {:.2} ({} vs {} days)",
            pattern.kind,
            pattern.variant.as_deref().unwrap_or("-"),
            pattern.impact_factor * 100.0,
            pattern.confidence,
            pattern.positive_count,
            pattern.complement_count,
        );
    }

    let target_monday = next_monday(today);
    let signals = WeekSignals {
        weather: Some(
            (0..7)
                .map(|i| WeatherDay {
                    date: target_monday + Duration::days(i),
                    weather_code: if i == 2 { 61 } else { 1 },
                    temp_max: Some(24.0),
                    temp_min: Some(16.0),
                    precipitation_mm: Some(if i == 2 { 4.0 } else { 0.0 }),
                    wind_max_kmh: Some(18.0),
                })
                .collect(),
        ),
        holidays: Some(vec![HolidayDay {
            date: target_monday + Duration::days(3),
            name: "Local festivity".to_string(),
        }]),
        events: None,
    };

    println!("\n=== Forecast for week of {target_monday} ===");
    let mut forecast = engine.forecast_next_week(&history, &signals, today)?;
    for day in &forecast.daily {
        let staffing = recommend_day(
            day,
            &StaffingHistory::default(),
            &ComfortCurve::default(),
            &settings,
        );
        println!(
            "{} {:<9} {:>8.2} EUR  [{:>8.2} .. {:>8.2}]  floor {}-{}-{}  kitchen {}-{}-{}",
            day.date,
            day.weekday_name(),
            day.revenue,
            day.revenue_min,
            day.revenue_max,
            staffing.midday.floor,
            staffing.afternoon.floor,
            staffing.evening.floor,
            staffing.midday.kitchen,
            staffing.afternoon.kitchen,
            staffing.evening.kitchen,
        );
    }
    println!(
        "Week total: {:.2} EUR over {} baseline weeks{}",
        forecast.predicted_total,
        forecast.weeks_used,
        if forecast.low_confidence { " (low confidence)" } else { "" },
    );

    // The week plays out a few points under forecast.
    let realized: Vec<_> = forecast
        .daily
        .iter()
        .map(|d| {
            let mut record =
                mesa_forecast::utils::history_builder::record(d.date, d.revenue * 0.96);
            record.hours_worked = 32.0;
            record
        })
        .collect();
    let after_close = target_monday + Duration::days(8);
    let outcome = engine.evaluate_week(&mut forecast, &realized, after_close);

    println!("\n=== Evaluation ({outcome:?}) ===");
    if let Some(accuracy) = &forecast.accuracy {
        println!(
            "Predicted {:.2}, realized {:.2}: error {:.2}%, accuracy {:.2}%",
            forecast.predicted_total,
            forecast.actual_total.unwrap_or(0.0),
            accuracy.error_percent,
            accuracy.accuracy_percent,
        );
    }
    println!("Bias by weekday: {:?}", engine.bias_averages());
    println!("MAE  by weekday: {:?}", engine.mae_averages());

    let snapshot = engine.export_calibration();
    println!("\nCalibration snapshot for persistence:\n{}", snapshot.bias);

    Ok(())
}
