// ============================================================================
// Magnitude
// Scalar or homogeneous array of finite f64 values
// ============================================================================

use super::config::DEFAULT_PARALLEL_THRESHOLD;
use super::errors::{UnitError, UnitResult};
use crate::platform::{select_kernel, ArrayKernel};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Numeric payload of a quantity.
///
/// Every operation broadcasts: a scalar combines with each element of an
/// array; two arrays combine pairwise and must have the same length.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum Magnitude {
    Scalar(f64),
    Array(Vec<f64>),
}

impl Magnitude {
    /// Reject NaN and infinities.
    pub fn validate(&self) -> UnitResult<()> {
        match self {
            Magnitude::Scalar(v) if !v.is_finite() => Err(UnitError::invalid_value(format!(
                "magnitude must be finite, got {}",
                v
            ))),
            Magnitude::Array(values) => match values.iter().position(|v| !v.is_finite()) {
                Some(index) => Err(UnitError::invalid_value(format!(
                    "magnitude must be finite, got {} at index {}",
                    values[index], index
                ))),
                None => Ok(()),
            },
            Magnitude::Scalar(_) => Ok(()),
        }
    }

    /// Validate and return `self`; used after arithmetic that may overflow.
    pub(crate) fn finite(self) -> UnitResult<Self> {
        self.validate()?;
        Ok(self)
    }

    #[inline]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Magnitude::Scalar(_))
    }

    /// Number of values (1 for a scalar).
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Magnitude::Scalar(_) => 1,
            Magnitude::Array(values) => values.len(),
        }
    }

    /// True only for an empty array.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Magnitude::Array(values) if values.is_empty())
    }

    #[inline]
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Magnitude::Scalar(v) => Some(*v),
            Magnitude::Array(_) => None,
        }
    }

    /// View as a slice; a scalar is a one-element slice.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        match self {
            Magnitude::Scalar(v) => std::slice::from_ref(v),
            Magnitude::Array(values) => values,
        }
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.as_slice().get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.as_slice().iter().copied()
    }

    // ========================================================================
    // Elementwise
    // ========================================================================

    /// Apply `op` to every value, choosing a kernel by length.
    pub fn map(&self, op: &(dyn Fn(f64) -> f64 + Sync)) -> Magnitude {
        self.map_with(select_kernel(self.len(), DEFAULT_PARALLEL_THRESHOLD), op)
    }

    /// Apply `op` to every value using `kernel` for arrays.
    pub fn map_with(&self, kernel: &dyn ArrayKernel, op: &(dyn Fn(f64) -> f64 + Sync)) -> Magnitude {
        match self {
            Magnitude::Scalar(v) => Magnitude::Scalar(op(*v)),
            Magnitude::Array(values) => Magnitude::Array(kernel.map(values, op)),
        }
    }

    /// Combine with `other` pairwise, broadcasting scalars.
    pub fn zip(
        &self,
        other: &Magnitude,
        operation: &'static str,
        op: &(dyn Fn(f64, f64) -> f64 + Sync),
    ) -> UnitResult<Magnitude> {
        let len = self.len().max(other.len());
        self.zip_with(other, select_kernel(len, DEFAULT_PARALLEL_THRESHOLD), operation, op)
    }

    pub fn zip_with(
        &self,
        other: &Magnitude,
        kernel: &dyn ArrayKernel,
        operation: &'static str,
        op: &(dyn Fn(f64, f64) -> f64 + Sync),
    ) -> UnitResult<Magnitude> {
        match (self, other) {
            (Magnitude::Scalar(a), Magnitude::Scalar(b)) => Ok(Magnitude::Scalar(op(*a, *b))),
            (Magnitude::Scalar(a), Magnitude::Array(values)) => {
                let a = *a;
                Ok(Magnitude::Array(kernel.map(values, &move |b| op(a, b))))
            },
            (Magnitude::Array(values), Magnitude::Scalar(b)) => {
                let b = *b;
                Ok(Magnitude::Array(kernel.map(values, &move |a| op(a, b))))
            },
            (Magnitude::Array(lhs), Magnitude::Array(rhs)) => {
                if lhs.len() != rhs.len() {
                    return Err(UnitError::operation(
                        operation,
                        format!("array lengths differ ({} vs {})", lhs.len(), rhs.len()),
                    ));
                }
                Ok(Magnitude::Array(kernel.zip(lhs, rhs, op)))
            },
        }
    }
}

impl From<f64> for Magnitude {
    fn from(value: f64) -> Self {
        Magnitude::Scalar(value)
    }
}

impl From<i32> for Magnitude {
    fn from(value: i32) -> Self {
        Magnitude::Scalar(f64::from(value))
    }
}

impl From<Vec<f64>> for Magnitude {
    fn from(values: Vec<f64>) -> Self {
        Magnitude::Array(values)
    }
}

impl From<&[f64]> for Magnitude {
    fn from(values: &[f64]) -> Self {
        Magnitude::Array(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Magnitude {
    fn from(values: [f64; N]) -> Self {
        Magnitude::Array(values.to_vec())
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn value(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
            match f.precision() {
                Some(p) => write!(f, "{:.*}", p, v),
                None => write!(f, "{}", v),
            }
        }

        match self {
            Magnitude::Scalar(v) => value(f, *v),
            Magnitude::Array(values) => {
                f.write_str("[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    value(f, *v)?;
                }
                f.write_str("]")
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;

    #[test]
    fn test_validate_rejects_non_finite() {
        assert!(Magnitude::Scalar(1.5).validate().is_ok());
        assert_eq!(
            Magnitude::Scalar(f64::NAN).validate().unwrap_err().kind(),
            ErrorKind::InvalidValue
        );
        let err = Magnitude::from(vec![1.0, f64::INFINITY]).validate().unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_broadcast_scalar_over_array() {
        let lhs = Magnitude::from([1.0, 2.0, 3.0]);
        let rhs = Magnitude::Scalar(10.0);
        assert_eq!(
            lhs.zip(&rhs, "add", &|a, b| a + b).unwrap(),
            Magnitude::from([11.0, 12.0, 13.0])
        );
        assert_eq!(
            rhs.zip(&lhs, "subtract", &|a, b| a - b).unwrap(),
            Magnitude::from([9.0, 8.0, 7.0])
        );
    }

    #[test]
    fn test_length_mismatch_is_operation_error() {
        let err = Magnitude::from([1.0, 2.0])
            .zip(&Magnitude::from([1.0]), "add", &|a, b| a + b)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Operation);
    }

    #[test]
    fn test_map_preserves_shape() {
        assert_eq!(Magnitude::Scalar(2.0).map(&|v| v * v), Magnitude::Scalar(4.0));
        let empty = Magnitude::Array(Vec::new());
        assert!(empty.map(&|v| v).is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(Magnitude::Scalar(100.0).to_string(), "100");
        assert_eq!(Magnitude::from([1.0, 2.5]).to_string(), "[1, 2.5]");
        assert_eq!(format!("{:.2}", Magnitude::Scalar(1.0 / 3.0)), "0.33");
    }

    #[test]
    fn test_slice_view() {
        let scalar = Magnitude::Scalar(7.0);
        assert_eq!(scalar.as_slice(), &[7.0]);
        assert_eq!(scalar.len(), 1);
        assert_eq!(Magnitude::from([4.0, 5.0]).get(1), Some(5.0));
    }
}
