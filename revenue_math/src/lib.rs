//! # Revenue Math
//!
//! Mathematical building blocks for revenue forecasting and calibration.
//! This crate provides the bounded sample windows, descriptive statistics
//! and accuracy metrics used by the forecasting engine, free of any
//! calendar or business knowledge.

use thiserror::Error;

pub mod accuracy;
pub mod stats;
pub mod window;

/// Errors that can occur in forecasting-related calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for revenue math operations
pub type Result<T> = std::result::Result<T, MathError>;
