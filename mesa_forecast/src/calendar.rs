//! Week and weekday helpers
//!
//! All per-weekday state in the engine is keyed by a slot index with
//! Monday = 0 through Sunday = 6. Weeks are identified by their Monday.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Number of weekday slots.
pub const WEEKDAYS: usize = 7;

/// Display names for the weekday slots, Monday first.
pub const WEEKDAY_NAMES: [&str; WEEKDAYS] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Slot index for a date: Monday = 0 .. Sunday = 6.
pub fn weekday_slot(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

/// Monday of the week containing `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Monday strictly after `from`.
///
/// A Monday input maps seven days ahead, never to itself, so week
/// boundaries cannot alias.
pub fn next_monday(from: NaiveDate) -> NaiveDate {
    let mut day = from;
    while day.weekday() != Weekday::Mon {
        day += Duration::days(1);
    }
    if day <= from {
        day += Duration::days(7);
    }
    day
}

/// The seven dates of the week starting at `monday`.
pub fn week_dates(monday: NaiveDate) -> [NaiveDate; WEEKDAYS] {
    std::array::from_fn(|i| monday + Duration::days(i as i64))
}

/// Whether the week starting at `monday` lies entirely in the past as of
/// `today` (its Sunday is strictly before `today`).
pub fn week_is_closed(monday: NaiveDate, today: NaiveDate) -> bool {
    monday + Duration::days(6) < today
}

/// Monday of the most recent fully closed week as of `today`.
pub fn last_closed_week_monday(today: NaiveDate) -> NaiveDate {
    let mut sunday = today - Duration::days(1);
    while sunday.weekday() != Weekday::Sun {
        sunday -= Duration::days(1);
    }
    sunday - Duration::days(6)
}
