pub mod error;
pub mod types;

#[cfg(feature = "statements")]
pub mod statements;

#[cfg(feature = "valuation")]
pub mod valuation;

pub use error::FinModelError;
pub use types::*;

/// Standard result type for all finmodel operations
pub type FinModelResult<T> = Result<T, FinModelError>;
