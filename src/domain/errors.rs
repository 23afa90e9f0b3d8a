// ============================================================================
// Unit Errors
// Error taxonomy for parsing, conversion and quantity arithmetic
// ============================================================================

use super::dimension::Dimension;
use super::unit::Unit;
use crate::numeric::NumericError;
use std::fmt;

/// Error category, for callers that match on the kind rather than the
/// payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnitNotFound,
    UnitParse,
    Dimensionality,
    Conversion,
    InvalidValue,
    Operation,
    Registry,
    Interchange,
}

/// Errors raised by the unit catalog, the conversion engine and quantity
/// arithmetic.
///
/// Every failing operation leaves its inputs and the catalog untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitError {
    /// An atomic token resolved to no known unit
    UnitNotFound {
        name: String,
        suggestions: Vec<String>,
    },
    /// Malformed unit expression, or an offset unit used inside a compound
    UnitParse { input: String, reason: String },
    /// Operands or conversion endpoints have different dimensions
    Dimensionality {
        from: String,
        to: String,
        from_dimension: Dimension,
        to_dimension: Dimension,
        operation: &'static str,
    },
    /// Conversion outside the supported multiplicative/affine cases
    Conversion {
        from: String,
        to: String,
        reason: String,
    },
    /// Non-finite or otherwise disallowed magnitude
    InvalidValue { reason: String },
    /// Operator applied to incompatible operand kinds
    Operation {
        operation: &'static str,
        reason: String,
    },
    /// Duplicate or conflicting custom unit definition
    Registry { name: String, reason: String },
    /// Malformed interchange record
    Interchange { reason: String },
}

impl UnitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UnitError::UnitNotFound { .. } => ErrorKind::UnitNotFound,
            UnitError::UnitParse { .. } => ErrorKind::UnitParse,
            UnitError::Dimensionality { .. } => ErrorKind::Dimensionality,
            UnitError::Conversion { .. } => ErrorKind::Conversion,
            UnitError::InvalidValue { .. } => ErrorKind::InvalidValue,
            UnitError::Operation { .. } => ErrorKind::Operation,
            UnitError::Registry { .. } => ErrorKind::Registry,
            UnitError::Interchange { .. } => ErrorKind::Interchange,
        }
    }

    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        UnitError::UnitParse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_value(reason: impl Into<String>) -> Self {
        UnitError::InvalidValue {
            reason: reason.into(),
        }
    }

    pub(crate) fn operation(operation: &'static str, reason: impl Into<String>) -> Self {
        UnitError::Operation {
            operation,
            reason: reason.into(),
        }
    }

    pub(crate) fn dimensionality(from: &Unit, to: &Unit, operation: &'static str) -> Self {
        UnitError::Dimensionality {
            from: from.name().to_string(),
            to: to.name().to_string(),
            from_dimension: from.dimension(),
            to_dimension: to.dimension(),
            operation,
        }
    }

    pub(crate) fn conversion(from: &Unit, to: &Unit, reason: impl Into<String>) -> Self {
        UnitError::Conversion {
            from: from.name().to_string(),
            to: to.name().to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn registry(name: &str, reason: impl Into<String>) -> Self {
        UnitError::Registry {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitError::UnitNotFound { name, suggestions } => {
                write!(f, "unknown unit '{}'", name)?;
                if !suggestions.is_empty() {
                    write!(f, " (did you mean: {}?)", suggestions.join(", "))?;
                }
                Ok(())
            },
            UnitError::UnitParse { input, reason } => {
                write!(f, "cannot parse unit expression '{}': {}", input, reason)
            },
            UnitError::Dimensionality {
                from,
                to,
                from_dimension,
                to_dimension,
                operation,
            } => {
                let joiner = if *operation == "convert" { "to" } else { "and" };
                write!(
                    f,
                    "cannot {} '{}' ({}) {} '{}' ({}): incompatible dimensions",
                    operation, from, from_dimension, joiner, to, to_dimension
                )
            },
            UnitError::Conversion { from, to, reason } => {
                write!(f, "cannot convert '{}' to '{}': {}", from, to, reason)
            },
            UnitError::InvalidValue { reason } => write!(f, "invalid value: {}", reason),
            UnitError::Operation { operation, reason } => {
                write!(f, "unsupported {}: {}", operation, reason)
            },
            UnitError::Registry { name, reason } => {
                write!(f, "cannot register unit '{}': {}", name, reason)
            },
            UnitError::Interchange { reason } => write!(f, "invalid quantity record: {}", reason),
        }
    }
}

impl std::error::Error for UnitError {}

impl From<NumericError> for UnitError {
    fn from(err: NumericError) -> Self {
        UnitError::InvalidValue {
            reason: err.to_string(),
        }
    }
}

/// Result type alias for unit operations
pub type UnitResult<T> = Result<T, UnitError>;
