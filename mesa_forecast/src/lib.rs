//! # Mesa Forecast
//!
//! A Rust library for weekly revenue forecasting and staffing of a
//! single-location, shift-based restaurant.
//!
//! ## Features
//!
//! - Per-weekday baseline revenue from recent fully-recorded weeks
//! - Sliding-window bias and MAE calibration against realized outcomes
//! - Learned rain/holiday/temperature impact patterns with confidence
//!   damping
//! - Forecast enrichment from target-week weather, holiday and event
//!   signals
//! - Per-shift floor/kitchen staffing recommendations from comfort-curve
//!   data
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use mesa_forecast::config::ForecastSettings;
//! use mesa_forecast::data::WeekSignals;
//! use mesa_forecast::engine::ForecastEngine;
//! use mesa_forecast::utils::generate_history;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
//! let monday = mesa_forecast::calendar::monday_of(today);
//!
//! // Twelve weeks of closed-day history (normally loaded by the host)
//! let history = generate_history(monday, 12, 1100.0, 0.1);
//!
//! let engine = ForecastEngine::new(ForecastSettings::default()).unwrap();
//! engine.recompute_patterns(&history, today);
//!
//! // Signals unavailable: the forecast degrades to baseline + bias
//! let forecast = engine
//!     .forecast_next_week(&history, &WeekSignals::unavailable(), today)
//!     .unwrap();
//! assert_eq!(forecast.daily.len(), 7);
//! ```

pub mod baseline;
pub mod calendar;
pub mod calibration;
pub mod config;
pub mod data;
pub mod engine;
pub mod enrichment;
pub mod error;
pub mod evaluation;
pub mod forecast;
pub mod patterns;
pub mod staffing;
pub mod utils;

// Re-export commonly used types
pub use crate::baseline::WeekdayBaseline;
pub use crate::calibration::{CalibrationSnapshot, WindowKind};
pub use crate::config::ForecastSettings;
pub use crate::data::{DayRecord, WeekSignals};
pub use crate::engine::ForecastEngine;
pub use crate::error::{ForecastError, Result};
pub use crate::evaluation::EvaluationOutcome;
pub use crate::forecast::{DailyForecast, WeekStatus, WeeklyForecast};
pub use crate::patterns::{DetectedPattern, PatternKind, PatternSet};
pub use crate::staffing::{ComfortCurve, DayStaffing, StaffPair};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
