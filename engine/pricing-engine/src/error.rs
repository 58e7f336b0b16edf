//! Error types for the pricing engine

use thiserror::Error;

/// Result type for pricing engine operations
pub type Result<T> = std::result::Result<T, PricingError>;

/// Errors that can occur in the pricing engine.
///
/// Absence of market data is not an error; the engine handles it as a
/// first-class input state. `InvalidInput` indicates programmer error
/// (a non-positive price reached the cost model) and should not be
/// caught and suppressed.
#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}
