// ============================================================================
// Numeric Errors
// Error types for exact rational exponent arithmetic
// ============================================================================

use std::fmt;

/// Errors that can occur during rational arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericError {
    /// Numerator or denominator exceeded the i64 range
    Overflow,
    /// Attempted division by zero (or a zero denominator)
    DivisionByZero,
    /// Input string or value is invalid
    InvalidInput,
    /// Value cannot be represented exactly as a rational
    PrecisionLoss,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::Overflow => {
                write!(f, "arithmetic overflow: rational component exceeded i64 range")
            },
            NumericError::DivisionByZero => write!(f, "division by zero"),
            NumericError::InvalidInput => write!(f, "invalid input: could not parse exponent"),
            NumericError::PrecisionLoss => write!(
                f,
                "precision loss: value cannot be represented as an exact fraction"
            ),
        }
    }
}

impl std::error::Error for NumericError {}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;
