//! # Mesa Forecast Workspace
//!
//! Facade over the forecasting workspace crates:
//!
//! - [`mesa_forecast`] — the weekly revenue forecasting and staffing
//!   engine
//! - [`revenue_math`] — the bounded-window and accuracy math it builds on
//!
//! See `demos/weekly_cycle.rs` for a full forecast → evaluate →
//! recalibrate walkthrough.

pub use mesa_forecast;
pub use revenue_math;
