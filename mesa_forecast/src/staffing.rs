//! Per-shift staffing recommendations from forecast revenue
//!
//! Headcount is sized three ways, strongest evidence first: the comfort
//! curve (reported difficulty by revenue-per-worker band) picks the
//! smallest scheme that stays comfortable; the historical median
//! headcount for the weekday/shift scales with the revenue ratio; and a
//! tiered productivity threshold provides the floor everywhere.

use crate::calendar::weekday_slot;
use crate::config::ForecastSettings;
use crate::forecast::DailyForecast;
use chrono::NaiveDate;
use revenue_math::stats::{median_count, round2};
use serde::{Deserialize, Serialize};

/// Service shifts of one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shift {
    Midday,
    Afternoon,
    Evening,
}

pub const SHIFTS: [Shift; 3] = [Shift::Midday, Shift::Afternoon, Shift::Evening];

/// Floor/kitchen headcount for one shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffPair {
    pub floor: u32,
    pub kitchen: u32,
}

/// Where a recommendation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaffSource {
    /// Historical weekday/shift medians scaled by revenue
    Historic,
    /// Comfort curve or productivity tiers only
    Heuristic,
}

/// Staffing recommendation for one day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DayStaffing {
    pub midday: StaffPair,
    pub afternoon: StaffPair,
    pub evening: StaffPair,
    pub source: StaffSource,
}

impl DayStaffing {
    pub fn for_shift(&self, shift: Shift) -> StaffPair {
        match shift {
            Shift::Midday => self.midday,
            Shift::Afternoon => self.afternoon,
            Shift::Evening => self.evening,
        }
    }
}

/// One revenue-per-worker band of the comfort curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComfortBand {
    /// Band lower edge, revenue per worker
    pub min: f64,
    /// Band upper edge (exclusive)
    pub max: f64,
    /// Average reported difficulty in the band, 1 (easy) to 5 (overrun)
    pub avg_difficulty: f64,
    /// Number of shift reports backing the band
    pub count: usize,
}

/// Comfort data for one staffing scheme ("floor-kitchen", e.g. "2-2").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComfortScheme {
    pub scheme: String,
    pub bands: Vec<ComfortBand>,
}

/// Average difficulty at or above which a band stops being comfortable.
const DIFFICULTY_THRESHOLD: f64 = 3.5;
/// Tolerance over the comfort limit before a scheme is rejected.
const COMFORT_MARGIN: f64 = 1.05;
/// Comfort limit assumed for schemes with no curve data.
const DEFAULT_COMFORT_LIMIT: f64 = 350.0;

impl ComfortScheme {
    /// Revenue-per-worker above which the scheme becomes uncomfortable:
    /// the lower edge of the first band whose average difficulty reaches
    /// the threshold. `None` means no discomfort was ever reported.
    pub fn comfort_limit(&self) -> Option<f64> {
        self.bands
            .iter()
            .find(|band| band.count > 0 && band.avg_difficulty >= DIFFICULTY_THRESHOLD)
            .map(|band| band.min)
    }
}

/// Comfort curves for the schemes the business operates, read-only input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComfortCurve {
    pub schemes: Vec<ComfortScheme>,
}

impl ComfortCurve {
    pub fn limit_for(&self, scheme: &str) -> f64 {
        self.schemes
            .iter()
            .find(|s| s.scheme == scheme)
            .and_then(ComfortScheme::comfort_limit)
            .unwrap_or(DEFAULT_COMFORT_LIMIT)
    }

    pub fn has_data(&self) -> bool {
        self.schemes.iter().any(|s| !s.bands.is_empty())
    }
}

/// Historical staffing for one weekday/shift: median headcounts and the
/// average shift revenue they served.
#[derive(Debug, Clone, Copy)]
pub struct HistoricShiftStaffing {
    pub floor: u32,
    pub kitchen: u32,
    pub avg_revenue: f64,
}

/// Realized staffing history keyed by (weekday slot, shift).
#[derive(Debug, Clone, Default)]
pub struct StaffingHistory {
    entries: Vec<((usize, Shift), HistoricShiftStaffing)>,
}

/// Minimum reports per (weekday, shift) before the history is trusted.
const MIN_SAMPLES_PER_SLOT: usize = 2;

impl StaffingHistory {
    /// Aggregate raw per-shift reports (weekday, shift, floor, kitchen,
    /// revenue) into medians per slot.
    pub fn from_reports(reports: &[(NaiveDate, Shift, u32, u32, f64)]) -> Self {
        let mut entries = Vec::new();
        for slot in 0..crate::calendar::WEEKDAYS {
            for shift in SHIFTS {
                let matching: Vec<_> = reports
                    .iter()
                    .filter(|(date, s, ..)| weekday_slot(*date) == slot && *s == shift)
                    .collect();
                if matching.len() < MIN_SAMPLES_PER_SLOT {
                    continue;
                }
                let mut floors: Vec<u32> = matching.iter().map(|(_, _, f, _, _)| *f).collect();
                let mut kitchens: Vec<u32> = matching.iter().map(|(_, _, _, k, _)| *k).collect();
                let revenues: Vec<f64> = matching
                    .iter()
                    .map(|(_, _, _, _, r)| *r)
                    .filter(|r| *r > 0.0)
                    .collect();
                entries.push((
                    (slot, shift),
                    HistoricShiftStaffing {
                        floor: median_count(&mut floors, 1).clamp(1, MAX_PER_ROLE),
                        kitchen: median_count(&mut kitchens, 1).clamp(1, MAX_PER_ROLE),
                        avg_revenue: revenue_math::stats::mean(&revenues),
                    },
                ));
            }
        }
        Self { entries }
    }

    pub fn get(&self, weekday: usize, shift: Shift) -> Option<HistoricShiftStaffing> {
        self.entries
            .iter()
            .find(|((slot, s), _)| *slot == weekday && *s == shift)
            .map(|(_, staffing)| *staffing)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Headcount rails per role.
const MAX_PER_ROLE: u32 = 3;
/// Whole-team cap per shift.
const MAX_TEAM: u32 = 6;
/// Below this daily revenue neither role goes above two per shift.
const LOW_REVENUE_DAY: f64 = 3000.0;
/// The 2→3 step needs half again the revenue of the 1→2 step.
const STEP_GROWTH: f64 = 1.5;
/// How far the historic headcount may scale with the revenue ratio.
const REVENUE_RATIO_MIN: f64 = 0.7;
const REVENUE_RATIO_MAX: f64 = 1.6;

/// Floor/kitchen schemes the business actually runs, smallest teams first.
const ALLOWED_SCHEMES: [(u32, u32); 7] =
    [(1, 1), (1, 2), (2, 1), (2, 2), (2, 3), (3, 2), (3, 3)];

/// Labor-hours required to serve `revenue` at the target productivity.
pub fn required_labor_hours(revenue: f64, settings: &ForecastSettings) -> f64 {
    if settings.target_productivity_eur_per_hour <= 0.0 {
        return 0.0;
    }
    round2(revenue / settings.target_productivity_eur_per_hour)
}

/// Whole-team size for one shift from tiered revenue thresholds.
///
/// The first extra pair of hands pays for itself at `productivity ×
/// shift_hours`; every further step needs half again as much.
pub fn tiered_headcount(shift_revenue: f64, settings: &ForecastSettings) -> u32 {
    let base_step = settings.target_productivity_eur_per_hour * settings.shift_hours;
    if base_step <= 0.0 {
        return 1;
    }
    let mut threshold = base_step;
    let mut people = 1u32;
    while people < MAX_TEAM && shift_revenue >= threshold {
        people += 1;
        threshold += base_step * STEP_GROWTH;
    }
    people
}

/// Split a team across floor and kitchen, kitchen-heavy, both at least one.
fn split_team(total: u32) -> StaffPair {
    let total = total.max(2);
    let kitchen = total.div_ceil(2);
    StaffPair {
        floor: (total - kitchen).max(1),
        kitchen,
    }
}

/// Smallest allowed scheme whose revenue-per-worker stays inside the
/// comfort limit for both roles.
fn scheme_from_comfort(shift_revenue: f64, comfort: &ComfortCurve) -> Option<StaffPair> {
    for (floor, kitchen) in ALLOWED_SCHEMES {
        let scheme_key = format!("{floor}-{kitchen}");
        let limit = comfort.limit_for(&scheme_key);
        let per_floor = shift_revenue / floor as f64;
        let per_kitchen = shift_revenue / kitchen as f64;
        if per_floor <= limit * COMFORT_MARGIN && per_kitchen <= limit * COMFORT_MARGIN {
            return Some(StaffPair { floor, kitchen });
        }
    }
    None
}

fn clamp_pair(pair: StaffPair, day_revenue: f64) -> StaffPair {
    let cap = if day_revenue < LOW_REVENUE_DAY { 2 } else { MAX_PER_ROLE };
    StaffPair {
        floor: pair.floor.clamp(1, cap),
        kitchen: pair.kitchen.clamp(1, cap),
    }
}

fn recommend_shift(
    weekday: usize,
    shift: Shift,
    shift_revenue: f64,
    day_revenue: f64,
    history: &StaffingHistory,
    comfort: &ComfortCurve,
    settings: &ForecastSettings,
) -> (StaffPair, StaffSource) {
    let minimum = split_team(tiered_headcount(shift_revenue, settings));

    if let Some(hist) = history.get(weekday, shift) {
        let mut floor = hist.floor;
        let mut kitchen = hist.kitchen;
        if hist.avg_revenue > 0.0 && shift_revenue > 0.0 {
            let ratio =
                (shift_revenue / hist.avg_revenue).clamp(REVENUE_RATIO_MIN, REVENUE_RATIO_MAX);
            floor = ((hist.floor as f64 * ratio).round() as u32).clamp(1, MAX_PER_ROLE);
            kitchen = ((hist.kitchen as f64 * ratio).round() as u32).clamp(1, MAX_PER_ROLE);
        }
        let pair = StaffPair {
            floor: floor.max(minimum.floor),
            kitchen: kitchen.max(minimum.kitchen),
        };
        return (clamp_pair(pair, day_revenue), StaffSource::Historic);
    }

    if comfort.has_data() {
        if let Some(scheme) = scheme_from_comfort(shift_revenue, comfort) {
            let pair = StaffPair {
                floor: scheme.floor.max(minimum.floor),
                kitchen: scheme.kitchen.max(minimum.kitchen),
            };
            return (clamp_pair(pair, day_revenue), StaffSource::Heuristic);
        }
    }

    (clamp_pair(minimum, day_revenue), StaffSource::Heuristic)
}

/// Staffing recommendation for one forecast day.
///
/// Sizes against the low edge of the revenue band, so a soft week does
/// not get over-scheduled.
pub fn recommend_day(
    day: &DailyForecast,
    history: &StaffingHistory,
    comfort: &ComfortCurve,
    settings: &ForecastSettings,
) -> DayStaffing {
    let weekday = weekday_slot(day.date);
    let scale = if day.revenue > 0.0 && day.revenue_min > 0.0 {
        day.revenue_min / day.revenue
    } else {
        1.0
    };
    let day_revenue = day.revenue * scale;
    let shift_revenues = [
        day.shifts.midday * scale,
        day.shifts.afternoon * scale,
        day.shifts.evening * scale,
    ];

    let mut pairs = [StaffPair { floor: 1, kitchen: 1 }; 3];
    let mut any_historic = false;
    let mut all_historic = true;
    for (i, shift) in SHIFTS.into_iter().enumerate() {
        let (pair, source) = recommend_shift(
            weekday,
            shift,
            shift_revenues[i],
            day_revenue,
            history,
            comfort,
            settings,
        );
        pairs[i] = pair;
        match source {
            StaffSource::Historic => any_historic = true,
            StaffSource::Heuristic => all_historic = false,
        }
    }

    DayStaffing {
        midday: pairs[0],
        afternoon: pairs[1],
        evening: pairs[2],
        source: if any_historic && all_historic {
            StaffSource::Historic
        } else {
            StaffSource::Heuristic
        },
    }
}
