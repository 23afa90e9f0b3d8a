// ============================================================================
// Uncertain Quantity
// Measured quantities carrying a standard uncertainty, propagated to first
// order through arithmetic
// ============================================================================

use super::errors::{UnitError, UnitResult};
use super::magnitude::Magnitude;
use super::quantity::Quantity;
use super::unit::Unit;
use crate::engine::catalog::UnitCatalog;
use crate::numeric::Rational;
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use std::sync::Arc;

/// A quantity with an absolute standard uncertainty in the same unit.
///
/// Operands are treated as independent. Sums and differences combine
/// absolute uncertainties in quadrature; products and quotients combine
/// the partial-derivative terms in quadrature, which reduces to adding
/// relative uncertainties in quadrature for non-zero values.
///
/// A scalar uncertainty on an array applies to every element.
///
/// # Example
/// ```
/// use unit_engine::prelude::*;
///
/// let catalog = UnitCatalog::new();
/// let length = catalog.quantity(100.0, "meter").unwrap();
/// let measured = UncertainQuantity::new(length, 0.5).unwrap();
///
/// let doubled = measured.scale(2.0).unwrap();
/// assert_eq!(doubled.to_string(), "200 ± 1 meter");
/// ```
#[derive(Debug, Clone)]
pub struct UncertainQuantity {
    quantity: Quantity,
    uncertainty: Magnitude,
}

impl UncertainQuantity {
    /// Attach an absolute uncertainty to `quantity`.
    ///
    /// # Errors
    /// * `InvalidValue` if an uncertainty is negative or not finite
    /// * `Operation` if an uncertainty array does not match the magnitude
    pub fn new(quantity: Quantity, uncertainty: impl Into<Magnitude>) -> UnitResult<Self> {
        let uncertainty = uncertainty.into();
        uncertainty.validate()?;
        if let Some(negative) = uncertainty.iter().find(|u| *u < 0.0) {
            return Err(UnitError::invalid_value(format!(
                "uncertainty must not be negative, got {}",
                negative
            )));
        }

        let magnitude = quantity.magnitude();
        let fits = uncertainty.is_scalar()
            || (!magnitude.is_scalar() && magnitude.len() == uncertainty.len());
        if !fits {
            return Err(UnitError::operation(
                "attach uncertainty",
                format!(
                    "{} uncertainties for a magnitude of {} values",
                    uncertainty.len(),
                    magnitude.len()
                ),
            ));
        }

        Ok(Self { quantity, uncertainty })
    }

    /// Uncertainty given as a fraction of each value's size.
    pub fn with_relative(quantity: Quantity, relative: f64) -> UnitResult<Self> {
        if !relative.is_finite() || relative < 0.0 {
            return Err(UnitError::invalid_value(format!(
                "relative uncertainty must be finite and non-negative, got {}",
                relative
            )));
        }
        let uncertainty = quantity.magnitude().map(&|v| v.abs() * relative).finite()?;
        Self::new(quantity, uncertainty)
    }

    /// A quantity known exactly.
    pub fn exact(quantity: Quantity) -> Self {
        Self {
            quantity,
            uncertainty: Magnitude::Scalar(0.0),
        }
    }

    fn from_parts(quantity: Quantity, uncertainty: Magnitude) -> Self {
        Self { quantity, uncertainty }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn quantity(&self) -> &Quantity {
        &self.quantity
    }

    #[inline]
    pub fn unit(&self) -> &Arc<Unit> {
        self.quantity.unit()
    }

    /// The scalar value, or `None` for arrays.
    #[inline]
    pub fn value(&self) -> Option<f64> {
        self.quantity.value()
    }

    /// Absolute uncertainty, in the quantity's unit.
    #[inline]
    pub fn uncertainty(&self) -> &Magnitude {
        &self.uncertainty
    }

    /// Uncertainty over the size of each value; zero where the value is zero.
    pub fn relative_uncertainty(&self) -> Magnitude {
        pairwise(self.quantity.magnitude(), &self.uncertainty, |x, u| {
            if x == 0.0 {
                0.0
            } else {
                u / x.abs()
            }
        })
    }

    pub fn into_parts(self) -> (Quantity, Magnitude) {
        (self.quantity, self.uncertainty)
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Express in `target`; the uncertainty scales with the unit size only,
    /// offsets never apply to it.
    pub fn to_unit(&self, target: &Arc<Unit>) -> UnitResult<UncertainQuantity> {
        let quantity = self.quantity.to_unit(target)?;
        let scale = self.unit().factor() / target.factor();
        let uncertainty = self.uncertainty.map(&|u| u * scale).finite()?;
        Ok(Self::from_parts(quantity, uncertainty))
    }

    pub fn to(&self, target: &str, catalog: &UnitCatalog) -> UnitResult<UncertainQuantity> {
        self.to_unit(&catalog.parse(target)?)
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    pub fn try_add(&self, other: &UncertainQuantity) -> UnitResult<UncertainQuantity> {
        let sum = self.quantity.try_add(&other.quantity)?;
        self.in_quadrature(sum, other, "add")
    }

    pub fn try_sub(&self, other: &UncertainQuantity) -> UnitResult<UncertainQuantity> {
        let difference = self.quantity.try_sub(&other.quantity)?;
        self.in_quadrature(difference, other, "subtract")
    }

    pub fn try_mul(&self, other: &UncertainQuantity) -> UnitResult<UncertainQuantity> {
        let product = self.quantity.try_mul(&other.quantity)?;
        let uncertainty = propagate(
            (self.quantity.magnitude(), &self.uncertainty),
            (other.quantity.magnitude(), &other.uncertainty),
            |a, ua, b, ub| (b * ua).hypot(a * ub),
        )?;
        Ok(Self::from_parts(product, uncertainty))
    }

    pub fn try_div(&self, other: &UncertainQuantity) -> UnitResult<UncertainQuantity> {
        let quotient = self.quantity.try_div(&other.quantity)?;
        let uncertainty = propagate(
            (self.quantity.magnitude(), &self.uncertainty),
            (other.quantity.magnitude(), &other.uncertainty),
            |a, ua, b, ub| (ua / b).hypot(a * ub / (b * b)),
        )?;
        Ok(Self::from_parts(quotient, uncertainty))
    }

    /// Multiply by an exact number.
    pub fn scale(&self, factor: f64) -> UnitResult<UncertainQuantity> {
        let quantity = self.quantity.scale(factor)?;
        let uncertainty = self.uncertainty.map(&|u| u * factor.abs()).finite()?;
        Ok(Self::from_parts(quantity, uncertainty))
    }

    /// `x^n` carries `|n * x^(n-1)|` times the uncertainty of `x`.
    pub fn powf(&self, exponent: Rational) -> UnitResult<UncertainQuantity> {
        let quantity = self.quantity.powf(exponent)?;
        let n = exponent.to_f64();
        let uncertainty = pairwise(self.quantity.magnitude(), &self.uncertainty, |x, u| {
            if u == 0.0 {
                0.0
            } else {
                (n * x.powf(n - 1.0)).abs() * u
            }
        })
        .finite()?;
        Ok(Self::from_parts(quantity, uncertainty))
    }

    pub fn powi(&self, exponent: i32) -> UnitResult<UncertainQuantity> {
        self.powf(Rational::from(exponent))
    }

    pub fn sqrt(&self) -> UnitResult<UncertainQuantity> {
        self.powf(Rational::HALF)
    }

    /// Absolute uncertainties add in quadrature, `other`'s rescaled into
    /// this unit first.
    fn in_quadrature(
        &self,
        result: Quantity,
        other: &UncertainQuantity,
        operation: &'static str,
    ) -> UnitResult<UncertainQuantity> {
        let scale = other.unit().factor() / self.unit().factor();
        let uncertainty = self
            .uncertainty
            .zip(&other.uncertainty, operation, &|a, b| a.hypot(b * scale))?
            .finite()?;
        Ok(Self::from_parts(result, uncertainty))
    }
}

/// Value of `magnitude` at `index`, broadcasting scalars.
#[inline]
fn at(magnitude: &Magnitude, index: usize) -> f64 {
    match magnitude {
        Magnitude::Scalar(v) => *v,
        Magnitude::Array(values) => values[index],
    }
}

/// Map values and their uncertainties together, shaped like `values`.
fn pairwise(values: &Magnitude, uncertainty: &Magnitude, op: impl Fn(f64, f64) -> f64) -> Magnitude {
    match values {
        Magnitude::Scalar(x) => Magnitude::Scalar(op(*x, at(uncertainty, 0))),
        Magnitude::Array(xs) => Magnitude::Array(
            xs.iter()
                .enumerate()
                .map(|(i, x)| op(*x, at(uncertainty, i)))
                .collect(),
        ),
    }
}

/// Combine two (value, uncertainty) operands whose shapes the quantity
/// arithmetic has already checked.
fn propagate(
    lhs: (&Magnitude, &Magnitude),
    rhs: (&Magnitude, &Magnitude),
    op: impl Fn(f64, f64, f64, f64) -> f64,
) -> UnitResult<Magnitude> {
    let value = |i: usize| op(at(lhs.0, i), at(lhs.1, i), at(rhs.0, i), at(rhs.1, i));
    let combined = match (lhs.0, rhs.0) {
        (Magnitude::Array(values), _) | (_, Magnitude::Array(values)) => {
            Magnitude::Array((0..values.len()).map(value).collect())
        },
        _ => Magnitude::Scalar(value(0)),
    };
    combined.finite()
}

impl From<Quantity> for UncertainQuantity {
    fn from(quantity: Quantity) -> Self {
        Self::exact(quantity)
    }
}

/// `value ± uncertainty unit`; a precision applies to both numbers.
impl fmt::Display for UncertainQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.quantity.magnitude(), f)?;
        f.write_str(" ± ")?;
        fmt::Display::fmt(&self.uncertainty, f)?;
        write!(f, " {}", self.unit().name())
    }
}

impl Add<&UncertainQuantity> for &UncertainQuantity {
    type Output = UnitResult<UncertainQuantity>;

    fn add(self, rhs: &UncertainQuantity) -> Self::Output {
        self.try_add(rhs)
    }
}

impl Sub<&UncertainQuantity> for &UncertainQuantity {
    type Output = UnitResult<UncertainQuantity>;

    fn sub(self, rhs: &UncertainQuantity) -> Self::Output {
        self.try_sub(rhs)
    }
}

impl Mul<&UncertainQuantity> for &UncertainQuantity {
    type Output = UnitResult<UncertainQuantity>;

    fn mul(self, rhs: &UncertainQuantity) -> Self::Output {
        self.try_mul(rhs)
    }
}

impl Div<&UncertainQuantity> for &UncertainQuantity {
    type Output = UnitResult<UncertainQuantity>;

    fn div(self, rhs: &UncertainQuantity) -> Self::Output {
        self.try_div(rhs)
    }
}
