use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinModelError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Sensitivity sweep failed at {variable} = {value}: {reason}")]
    SweepFailure {
        variable: String,
        value: Decimal,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FinModelError {
    fn from(e: serde_json::Error) -> Self {
        FinModelError::SerializationError(e.to_string())
    }
}
