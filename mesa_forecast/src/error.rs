//! Error types for the mesa_forecast crate

use thiserror::Error;

/// Custom error types for the mesa_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error related to parameter validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from forecasting calculations
    #[error("Calculation error: {0}")]
    CalculationError(String),

    /// Error from serializing forecast output
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<revenue_math::MathError> for ForecastError {
    fn from(err: revenue_math::MathError) -> Self {
        ForecastError::CalculationError(err.to_string())
    }
}
