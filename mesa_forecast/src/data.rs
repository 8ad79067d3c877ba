//! Historical day records and target-week signal inputs
//!
//! The engine consumes abstract data: closed-day records from whatever
//! store the host keeps, and already-fetched weather/holiday/event
//! signals for the target week. No transport or persistence concerns
//! live here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One closed day of operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayRecord {
    /// Calendar date (no time component)
    pub date: NaiveDate,
    /// Realized revenue for the day
    pub revenue: f64,
    /// Realized labor-hours for the day
    pub hours_worked: f64,
    /// Planned labor-hours from the published roster, when realized hours
    /// were never recorded
    pub planned_hours: Option<f64>,
    /// Staff/feedback was registered but no revenue or hours exist;
    /// excluded from every revenue-based computation
    pub feedback_only: bool,
    /// WMO weather code observed that day, when backfilled
    pub weather_code: Option<u8>,
    /// Daily maximum temperature in °C
    pub temp_max: Option<f64>,
    /// Daily minimum temperature in °C
    pub temp_min: Option<f64>,
    /// Total precipitation in mm
    pub precipitation_mm: Option<f64>,
    /// Maximum wind speed in km/h
    pub wind_max_kmh: Option<f64>,
    /// Whether the day was a public holiday
    pub is_holiday: bool,
}

/// Which source supplied a day's labor-hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoursSource {
    /// Hours as actually worked
    Recorded,
    /// Hours from the published roster
    Planned,
}

impl DayRecord {
    /// Labor-hours with the documented precedence: recorded hours win,
    /// planned roster hours fill in, otherwise there is no usable value.
    pub fn effective_hours(&self) -> Option<(f64, HoursSource)> {
        if self.hours_worked > 0.0 {
            return Some((self.hours_worked, HoursSource::Recorded));
        }
        match self.planned_hours {
            Some(hours) if hours > 0.0 => Some((hours, HoursSource::Planned)),
            _ => None,
        }
    }

    /// Whether the day carries usable revenue data: not feedback-only,
    /// positive revenue, and hours from some source.
    pub fn qualifies(&self) -> bool {
        !self.feedback_only && self.revenue > 0.0 && self.effective_hours().is_some()
    }
}

/// WMO codes that count as rain (drizzle, rain, freezing rain, snow,
/// showers, thunderstorms).
pub fn is_rain_code(code: u8) -> bool {
    matches!(code, 51..=67 | 71..=77 | 80..=82 | 95 | 96)
}

/// WMO codes that count as clear weather.
pub fn is_clear_code(code: u8) -> bool {
    matches!(code, 0..=2)
}

/// One day of the target week's weather forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherDay {
    pub date: NaiveDate,
    pub weather_code: u8,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub wind_max_kmh: Option<f64>,
}

/// Precipitation at or above this counts as a rainy day even when the
/// WMO code alone does not.
const RAINY_PRECIP_MM: f64 = 0.5;

impl WeatherDay {
    /// Rainy by WMO code or by accumulated precipitation.
    pub fn is_rainy(&self) -> bool {
        is_rain_code(self.weather_code)
            || self.precipitation_mm.is_some_and(|mm| mm >= RAINY_PRECIP_MM)
    }

    /// Whether either daily temperature extreme leaves the workable band.
    pub fn has_extreme_temperature(&self) -> bool {
        let extreme = |t: f64| {
            t < crate::patterns::EXTREME_TEMP_LOW || t > crate::patterns::EXTREME_TEMP_HIGH
        };
        self.temp_max.is_some_and(extreme) || self.temp_min.is_some_and(extreme)
    }
}

/// A named holiday in the target week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayDay {
    pub date: NaiveDate,
    pub name: String,
}

/// Qualitative demand impact of a calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventImpact {
    High,
    Medium,
    Low,
}

/// A calendar event that may shift demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDay {
    pub date: NaiveDate,
    pub name: String,
    pub impact: Option<EventImpact>,
}

/// External signals for the target week.
///
/// Each category is optional: `None` means the lookup failed or timed
/// out, and the enrichment pipeline skips that category's adjustment
/// instead of failing the forecast.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeekSignals {
    pub weather: Option<Vec<WeatherDay>>,
    pub holidays: Option<Vec<HolidayDay>>,
    pub events: Option<Vec<EventDay>>,
}

impl WeekSignals {
    /// Signals with every category unavailable; enrichment degrades to
    /// baseline + bias only.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn weather_for(&self, date: NaiveDate) -> Option<&WeatherDay> {
        self.weather
            .as_ref()
            .and_then(|days| days.iter().find(|w| w.date == date))
    }

    pub fn holiday_for(&self, date: NaiveDate) -> Option<&HolidayDay> {
        self.holidays
            .as_ref()
            .and_then(|days| days.iter().find(|h| h.date == date && !h.name.is_empty()))
    }

    pub fn events_for(&self, date: NaiveDate) -> Vec<&EventDay> {
        self.events
            .as_ref()
            .map(|days| days.iter().filter(|e| e.date == date).collect())
            .unwrap_or_default()
    }
}
