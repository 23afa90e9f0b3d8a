// ============================================================================
// Quantity
// Magnitude paired with a unit, with dimension-checked arithmetic
// ============================================================================

use super::dimension::Dimension;
use super::errors::{UnitError, UnitResult};
use super::magnitude::Magnitude;
use super::unit::{Term, Terms, Unit};
use crate::engine::catalog::UnitCatalog;
use crate::engine::conversion::Conversion;
use crate::numeric::Rational;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

/// Relative tolerance for quantity equality
pub const RELATIVE_TOLERANCE: f64 = 1e-9;

/// Absolute tolerance for quantity equality (values near zero)
pub const ABSOLUTE_TOLERANCE: f64 = 1e-12;

/// A magnitude expressed in a unit.
///
/// The dimension is always the unit's dimension. Every fallible operation
/// returns a new quantity and leaves its operands untouched.
///
/// # Example
/// ```
/// use unit_engine::prelude::*;
///
/// let catalog = UnitCatalog::new();
/// let distance = catalog.quantity(100.0, "meter").unwrap();
/// let time = catalog.quantity(10.0, "second").unwrap();
///
/// let speed = (&distance / &time).unwrap();
/// assert_eq!(speed.value(), Some(10.0));
/// assert_eq!(speed.unit().name(), "meter / second");
/// ```
#[derive(Debug, Clone)]
pub struct Quantity {
    magnitude: Magnitude,
    unit: Arc<Unit>,
}

impl Quantity {
    /// Create a quantity; the magnitude must be finite.
    pub fn new(magnitude: impl Into<Magnitude>, unit: Arc<Unit>) -> UnitResult<Self> {
        let magnitude = magnitude.into();
        magnitude.validate()?;
        Ok(Self { magnitude, unit })
    }

    /// A pure number.
    pub fn dimensionless(magnitude: impl Into<Magnitude>) -> UnitResult<Self> {
        Self::new(magnitude, Arc::new(Unit::dimensionless()))
    }

    fn from_parts(magnitude: Magnitude, unit: Arc<Unit>) -> Self {
        Self { magnitude, unit }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn magnitude(&self) -> &Magnitude {
        &self.magnitude
    }

    #[inline]
    pub fn unit(&self) -> &Arc<Unit> {
        &self.unit
    }

    #[inline]
    pub fn dimension(&self) -> Dimension {
        self.unit.dimension()
    }

    /// The scalar value, or `None` for arrays.
    #[inline]
    pub fn value(&self) -> Option<f64> {
        self.magnitude.as_scalar()
    }

    pub fn into_parts(self) -> (Magnitude, Arc<Unit>) {
        (self.magnitude, self.unit)
    }

    #[inline]
    pub fn is_dimensionless(&self) -> bool {
        self.unit.is_dimensionless()
    }

    #[inline]
    pub fn is_compatible_with(&self, other: &Quantity) -> bool {
        self.unit.is_compatible_with(&other.unit)
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Express in `target`.
    pub fn to_unit(&self, target: &Arc<Unit>) -> UnitResult<Quantity> {
        let magnitude = Conversion::between(&self.unit, target)?.apply(&self.magnitude)?;
        Ok(Self::from_parts(magnitude, Arc::clone(target)))
    }

    /// Express in the unit `target` parses to in `catalog`.
    pub fn to(&self, target: &str, catalog: &UnitCatalog) -> UnitResult<Quantity> {
        self.to_unit(&catalog.parse(target)?)
    }

    /// Express in coherent SI base units (`newton` becomes
    /// `kilogram * meter / second^2`, `celsius` becomes `kelvin`).
    pub fn to_base_units(&self) -> UnitResult<Quantity> {
        let dimension = self.dimension();
        let terms: Terms = dimension
            .components()
            .map(|(base, exp)| Term::new(base.base_unit(), exp))
            .collect();
        self.to_unit(&Arc::new(Unit::compound(terms, 1.0, dimension)))
    }

    /// Express in the catalog's default unit system.
    pub fn to_preferred(&self, catalog: &UnitCatalog) -> UnitResult<Quantity> {
        let preferred = catalog.default_system().preferred_unit(&self.dimension());
        self.to(&preferred, catalog)
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    /// Sum in the left operand's unit.
    pub fn try_add(&self, other: &Quantity) -> UnitResult<Quantity> {
        self.additive(other, "add", &|a, b| a + b)
    }

    /// Difference in the left operand's unit.
    pub fn try_sub(&self, other: &Quantity) -> UnitResult<Quantity> {
        self.additive(other, "subtract", &|a, b| a - b)
    }

    /// Product; the unit is collapsed to a named derived unit when exact.
    ///
    /// Offset units (°C, °F) cannot be multiplied: `Operation`.
    pub fn try_mul(&self, other: &Quantity) -> UnitResult<Quantity> {
        let unit = self
            .unit
            .multiply(&other.unit)
            .map_err(|err| offset_operand(err, "multiply"))?
            .simplified();
        let magnitude = self.magnitude.zip(&other.magnitude, "multiply", &|a, b| a * b)?;
        Ok(Self::from_parts(magnitude.finite()?, Arc::new(unit)))
    }

    /// Quotient; the unit is collapsed to a named derived unit when exact.
    pub fn try_div(&self, other: &Quantity) -> UnitResult<Quantity> {
        let unit = self
            .unit
            .divide(&other.unit)
            .map_err(|err| offset_operand(err, "divide"))?
            .simplified();
        let magnitude = self.magnitude.zip(&other.magnitude, "divide", &|a, b| a / b)?;
        Ok(Self::from_parts(magnitude.finite()?, Arc::new(unit)))
    }

    /// Multiply the magnitude by a bare number; the unit is unchanged.
    pub fn scale(&self, factor: f64) -> UnitResult<Quantity> {
        check_scalar(factor, "multiply")?;
        let magnitude = self.magnitude.map(&|v| v * factor).finite()?;
        Ok(Self::from_parts(magnitude, Arc::clone(&self.unit)))
    }

    /// Divide the magnitude by a bare number; the unit is unchanged.
    pub fn div_scalar(&self, divisor: f64) -> UnitResult<Quantity> {
        check_scalar(divisor, "divide")?;
        let magnitude = self.magnitude.map(&|v| v / divisor).finite()?;
        Ok(Self::from_parts(magnitude, Arc::clone(&self.unit)))
    }

    /// Raise to a rational power: magnitude, factor and dimension all scale.
    ///
    /// # Errors
    /// * `InvalidValue` if an exponent or the result leaves the representable range
    /// * `Operation` for offset units raised to a power other than one
    pub fn powf(&self, exponent: Rational) -> UnitResult<Quantity> {
        let unit = self
            .unit
            .powf(exponent)
            .map_err(|err| offset_operand(err, "power"))?;
        let e = exponent.to_f64();
        let magnitude = if exponent.is_integer() {
            match i32::try_from(exponent.numer()) {
                Ok(n) => self.magnitude.map(&|v| v.powi(n)),
                Err(_) => self.magnitude.map(&|v| v.powf(e)),
            }
        } else {
            self.magnitude.map(&|v| v.powf(e))
        };
        Ok(Self::from_parts(magnitude.finite()?, Arc::new(unit)))
    }

    pub fn powi(&self, exponent: i32) -> UnitResult<Quantity> {
        self.powf(Rational::from(exponent))
    }

    /// Square root; negative magnitudes yield `InvalidValue`.
    pub fn sqrt(&self) -> UnitResult<Quantity> {
        self.powf(Rational::HALF)
    }

    /// `1 / self`.
    pub fn recip(&self) -> UnitResult<Quantity> {
        self.powf(Rational::MINUS_ONE)
    }

    pub fn abs(&self) -> Quantity {
        Self::from_parts(self.magnitude.map(&f64::abs), Arc::clone(&self.unit))
    }

    fn additive(
        &self,
        other: &Quantity,
        operation: &'static str,
        op: &(dyn Fn(f64, f64) -> f64 + Sync),
    ) -> UnitResult<Quantity> {
        if !self.is_compatible_with(other) {
            return Err(UnitError::dimensionality(&self.unit, &other.unit, operation));
        }
        let rhs = Conversion::between(&other.unit, &self.unit)?.apply(&other.magnitude)?;
        let magnitude = self.magnitude.zip(&rhs, operation, op)?;
        Ok(Self::from_parts(magnitude.finite()?, Arc::clone(&self.unit)))
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    /// Order two quantities, converting `other` into this unit.
    ///
    /// Arrays compare elementwise and every element must agree on the
    /// ordering.
    ///
    /// # Errors
    /// * `Dimensionality` for incompatible units
    /// * `Operation` for differing array lengths or disagreeing elements
    pub fn try_cmp(&self, other: &Quantity) -> UnitResult<Ordering> {
        if !self.is_compatible_with(other) {
            return Err(UnitError::dimensionality(&self.unit, &other.unit, "compare"));
        }
        let rhs = Conversion::between(&other.unit, &self.unit)?.apply(&other.magnitude)?;
        let orderings = self.magnitude.zip(&rhs, "compare", &|a, b| match compare_values(a, b) {
            Ordering::Less => -1.0,
            Ordering::Equal => 0.0,
            Ordering::Greater => 1.0,
        })?;

        let mut result: Option<Ordering> = None;
        for code in orderings.iter() {
            let ordering = code.partial_cmp(&0.0).unwrap_or(Ordering::Equal);
            match result {
                None => result = Some(ordering),
                Some(previous) if previous != ordering => {
                    return Err(UnitError::operation(
                        "compare",
                        "array elements do not share one ordering",
                    ));
                },
                Some(_) => {},
            }
        }
        Ok(result.unwrap_or(Ordering::Equal))
    }

    // ========================================================================
    // Array Reductions
    // ========================================================================

    /// Number of values (1 for a scalar).
    #[inline]
    pub fn len(&self) -> usize {
        self.magnitude.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.magnitude.is_empty()
    }

    /// The `index`-th value as a scalar quantity.
    pub fn get(&self, index: usize) -> Option<Quantity> {
        self.magnitude
            .get(index)
            .map(|v| Self::from_parts(Magnitude::Scalar(v), Arc::clone(&self.unit)))
    }

    /// Each value as a scalar quantity.
    pub fn iter(&self) -> impl Iterator<Item = Quantity> + '_ {
        self.magnitude
            .iter()
            .map(|v| Self::from_parts(Magnitude::Scalar(v), Arc::clone(&self.unit)))
    }

    /// Sum of all values (zero for an empty array).
    pub fn sum(&self) -> UnitResult<Quantity> {
        let total: f64 = self.magnitude.iter().sum();
        Self::new(total, Arc::clone(&self.unit))
    }

    pub fn mean(&self) -> UnitResult<Quantity> {
        self.reduce("mean", |values| values.iter().sum::<f64>() / values.len() as f64)
    }

    pub fn min(&self) -> UnitResult<Quantity> {
        self.reduce("min", |values| values.iter().copied().fold(f64::INFINITY, f64::min))
    }

    pub fn max(&self) -> UnitResult<Quantity> {
        self.reduce("max", |values| {
            values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        })
    }

    fn same_shape(&self, other: &Quantity) -> bool {
        self.magnitude.is_scalar() == other.magnitude.is_scalar()
            && self.magnitude.len() == other.magnitude.len()
    }

    fn reduce(&self, operation: &'static str, op: impl Fn(&[f64]) -> f64) -> UnitResult<Quantity> {
        let values = self.magnitude.as_slice();
        if values.is_empty() {
            return Err(UnitError::operation(operation, "empty array"));
        }
        Self::new(op(values), Arc::clone(&self.unit))
    }
}

/// Offset-unit rejections from the unit layer are operand errors here.
fn offset_operand(err: UnitError, operation: &'static str) -> UnitError {
    match err {
        UnitError::UnitParse { reason, .. } => UnitError::operation(operation, reason),
        other => other,
    }
}

fn check_scalar(value: f64, operation: &'static str) -> UnitResult<()> {
    if !value.is_finite() {
        return Err(UnitError::invalid_value(format!(
            "cannot {} by non-finite {}",
            operation, value
        )));
    }
    Ok(())
}

/// Tolerant ordering of two values.
fn compare_values(a: f64, b: f64) -> Ordering {
    if (a - b).abs() <= ABSOLUTE_TOLERANCE + RELATIVE_TOLERANCE * a.abs().max(b.abs()) {
        Ordering::Equal
    } else if a < b {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

/// Equal within tolerance after converting into the left unit.
/// Incompatible quantities are never equal.
impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.same_shape(other) && matches!(self.try_cmp(other), Ok(Ordering::Equal))
    }
}

/// `None` for incompatible dimensions or differently shaped magnitudes; use
/// [`Quantity::try_cmp`] for an error instead.
impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !self.same_shape(other) {
            return None;
        }
        self.try_cmp(other).ok()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.magnitude, f)?;
        write!(f, " {}", self.unit.name())
    }
}

impl Add<&Quantity> for &Quantity {
    type Output = UnitResult<Quantity>;

    fn add(self, rhs: &Quantity) -> Self::Output {
        self.try_add(rhs)
    }
}

impl Add for Quantity {
    type Output = UnitResult<Quantity>;

    fn add(self, rhs: Quantity) -> Self::Output {
        self.try_add(&rhs)
    }
}

/// Adding a bare number is always rejected.
impl Add<f64> for &Quantity {
    type Output = UnitResult<Quantity>;

    fn add(self, _rhs: f64) -> Self::Output {
        Err(UnitError::operation(
            "add",
            format!("cannot add a bare number to '{}'", self.unit.name()),
        ))
    }
}

impl Sub<&Quantity> for &Quantity {
    type Output = UnitResult<Quantity>;

    fn sub(self, rhs: &Quantity) -> Self::Output {
        self.try_sub(rhs)
    }
}

impl Sub for Quantity {
    type Output = UnitResult<Quantity>;

    fn sub(self, rhs: Quantity) -> Self::Output {
        self.try_sub(&rhs)
    }
}

/// Subtracting a bare number is always rejected.
impl Sub<f64> for &Quantity {
    type Output = UnitResult<Quantity>;

    fn sub(self, _rhs: f64) -> Self::Output {
        Err(UnitError::operation(
            "subtract",
            format!("cannot subtract a bare number from '{}'", self.unit.name()),
        ))
    }
}

impl Mul<&Quantity> for &Quantity {
    type Output = UnitResult<Quantity>;

    fn mul(self, rhs: &Quantity) -> Self::Output {
        self.try_mul(rhs)
    }
}

impl Mul for Quantity {
    type Output = UnitResult<Quantity>;

    fn mul(self, rhs: Quantity) -> Self::Output {
        self.try_mul(&rhs)
    }
}

impl Mul<f64> for &Quantity {
    type Output = UnitResult<Quantity>;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl Mul<f64> for Quantity {
    type Output = UnitResult<Quantity>;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl Mul<&Quantity> for f64 {
    type Output = UnitResult<Quantity>;

    fn mul(self, rhs: &Quantity) -> Self::Output {
        rhs.scale(self)
    }
}

impl Div<&Quantity> for &Quantity {
    type Output = UnitResult<Quantity>;

    fn div(self, rhs: &Quantity) -> Self::Output {
        self.try_div(rhs)
    }
}

impl Div for Quantity {
    type Output = UnitResult<Quantity>;

    fn div(self, rhs: Quantity) -> Self::Output {
        self.try_div(&rhs)
    }
}

impl Div<f64> for &Quantity {
    type Output = UnitResult<Quantity>;

    fn div(self, rhs: f64) -> Self::Output {
        self.div_scalar(rhs)
    }
}

impl Div<f64> for Quantity {
    type Output = UnitResult<Quantity>;

    fn div(self, rhs: f64) -> Self::Output {
        self.div_scalar(rhs)
    }
}

/// `n / q` has the reciprocal unit.
impl Div<&Quantity> for f64 {
    type Output = UnitResult<Quantity>;

    fn div(self, rhs: &Quantity) -> Self::Output {
        Quantity::dimensionless(self)?.try_div(rhs)
    }
}

impl Neg for &Quantity {
    type Output = Quantity;

    fn neg(self) -> Self::Output {
        Quantity::from_parts(self.magnitude.map(&|v| -v), Arc::clone(&self.unit))
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(self) -> Self::Output {
        -&self
    }
}
