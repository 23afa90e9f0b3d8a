// ============================================================================
// Dimension Algebra
// Immutable exponent vectors over the seven SI base quantities
// ============================================================================

use crate::numeric::{NumericResult, Rational};
use std::fmt;
use std::ops::{Div, Mul};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Base Dimensions
// ============================================================================

/// One of the seven base physical dimensions, in canonical vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BaseDimension {
    Length = 0,
    Mass = 1,
    Time = 2,
    Current = 3,
    Temperature = 4,
    Amount = 5,
    Luminosity = 6,
}

impl BaseDimension {
    /// All base dimensions in vector order.
    pub const ALL: [BaseDimension; 7] = [
        BaseDimension::Length,
        BaseDimension::Mass,
        BaseDimension::Time,
        BaseDimension::Current,
        BaseDimension::Temperature,
        BaseDimension::Amount,
        BaseDimension::Luminosity,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Name used in dimension display, e.g. `[length]`.
    pub const fn name(self) -> &'static str {
        match self {
            BaseDimension::Length => "length",
            BaseDimension::Mass => "mass",
            BaseDimension::Time => "time",
            BaseDimension::Current => "current",
            BaseDimension::Temperature => "temperature",
            BaseDimension::Amount => "substance",
            BaseDimension::Luminosity => "luminosity",
        }
    }

    /// Canonical SI base unit for this dimension.
    pub const fn base_unit(self) -> &'static str {
        match self {
            BaseDimension::Length => "meter",
            BaseDimension::Mass => "kilogram",
            BaseDimension::Time => "second",
            BaseDimension::Current => "ampere",
            BaseDimension::Temperature => "kelvin",
            BaseDimension::Amount => "mole",
            BaseDimension::Luminosity => "candela",
        }
    }
}

// ============================================================================
// Dimension
// ============================================================================

/// Exponents of the seven base quantities, indexed by [`BaseDimension`].
///
/// Derived dimensions are products of powers:
/// - Velocity = L T⁻¹
/// - Force = M L T⁻²
/// - Pressure = M L⁻¹ T⁻²
///
/// Two dimensions are equal iff all seven exponents are equal. All
/// operations are total and return new values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dimension {
    exponents: [Rational; 7],
}

impl Dimension {
    // ==========================================================================
    // Base Dimensions
    // ==========================================================================

    /// Dimensionless (pure number)
    pub const DIMENSIONLESS: Self = Self::from_integers([0, 0, 0, 0, 0, 0, 0]);

    /// Length [L] - meter
    pub const LENGTH: Self = Self::from_integers([1, 0, 0, 0, 0, 0, 0]);

    /// Mass [M] - kilogram
    pub const MASS: Self = Self::from_integers([0, 1, 0, 0, 0, 0, 0]);

    /// Time [T] - second
    pub const TIME: Self = Self::from_integers([0, 0, 1, 0, 0, 0, 0]);

    /// Electric current [I] - ampere
    pub const CURRENT: Self = Self::from_integers([0, 0, 0, 1, 0, 0, 0]);

    /// Temperature [Θ] - kelvin
    pub const TEMPERATURE: Self = Self::from_integers([0, 0, 0, 0, 1, 0, 0]);

    /// Amount of substance [N] - mole
    pub const AMOUNT: Self = Self::from_integers([0, 0, 0, 0, 0, 1, 0]);

    /// Luminous intensity [J] - candela
    pub const LUMINOSITY: Self = Self::from_integers([0, 0, 0, 0, 0, 0, 1]);

    // ==========================================================================
    // Common Derived Dimensions
    // ==========================================================================

    pub const AREA: Self = Self::from_integers([2, 0, 0, 0, 0, 0, 0]);
    pub const VOLUME: Self = Self::from_integers([3, 0, 0, 0, 0, 0, 0]);
    pub const VELOCITY: Self = Self::from_integers([1, 0, -1, 0, 0, 0, 0]);
    pub const ACCELERATION: Self = Self::from_integers([1, 0, -2, 0, 0, 0, 0]);
    pub const FREQUENCY: Self = Self::from_integers([0, 0, -1, 0, 0, 0, 0]);
    pub const FORCE: Self = Self::from_integers([1, 1, -2, 0, 0, 0, 0]);
    pub const PRESSURE: Self = Self::from_integers([-1, 1, -2, 0, 0, 0, 0]);
    pub const ENERGY: Self = Self::from_integers([2, 1, -2, 0, 0, 0, 0]);
    pub const POWER: Self = Self::from_integers([2, 1, -3, 0, 0, 0, 0]);
    pub const CHARGE: Self = Self::from_integers([0, 0, 1, 1, 0, 0, 0]);
    pub const VOLTAGE: Self = Self::from_integers([2, 1, -3, -1, 0, 0, 0]);
    pub const RESISTANCE: Self = Self::from_integers([2, 1, -3, -2, 0, 0, 0]);
    pub const CONDUCTANCE: Self = Self::from_integers([-2, -1, 3, 2, 0, 0, 0]);
    pub const CAPACITANCE: Self = Self::from_integers([-2, -1, 4, 2, 0, 0, 0]);
    pub const INDUCTANCE: Self = Self::from_integers([2, 1, -2, -2, 0, 0, 0]);
    pub const MAGNETIC_FLUX: Self = Self::from_integers([2, 1, -2, -1, 0, 0, 0]);
    pub const MAGNETIC_FLUX_DENSITY: Self = Self::from_integers([0, 1, -2, -1, 0, 0, 0]);

    // ==========================================================================
    // Constructors
    // ==========================================================================

    /// Create a dimension from whole-number exponents in
    /// [`BaseDimension`] order.
    pub const fn from_integers(exponents: [i64; 7]) -> Self {
        Self {
            exponents: [
                Rational::integer(exponents[0]),
                Rational::integer(exponents[1]),
                Rational::integer(exponents[2]),
                Rational::integer(exponents[3]),
                Rational::integer(exponents[4]),
                Rational::integer(exponents[5]),
                Rational::integer(exponents[6]),
            ],
        }
    }

    /// Create a dimension from rational exponents.
    pub const fn from_exponents(exponents: [Rational; 7]) -> Self {
        Self { exponents }
    }

    /// The dimension of a single base quantity.
    pub fn base(base: BaseDimension) -> Self {
        let mut exponents = [Rational::ZERO; 7];
        exponents[base.index()] = Rational::ONE;
        Self { exponents }
    }

    // ==========================================================================
    // Accessors
    // ==========================================================================

    /// Exponent of one base quantity.
    #[inline]
    pub fn exponent(&self, base: BaseDimension) -> Rational {
        self.exponents[base.index()]
    }

    /// All exponents in [`BaseDimension`] order.
    #[inline]
    pub fn exponents(&self) -> &[Rational; 7] {
        &self.exponents
    }

    /// Non-zero components, in vector order.
    pub fn components(&self) -> impl Iterator<Item = (BaseDimension, Rational)> + '_ {
        BaseDimension::ALL
            .iter()
            .map(move |&base| (base, self.exponents[base.index()]))
            .filter(|(_, exp)| !exp.is_zero())
    }

    #[inline]
    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(|e| e.is_zero())
    }

    /// True if this is exactly one base quantity to the first power.
    pub fn as_base(&self) -> Option<BaseDimension> {
        let mut found = None;
        for (base, exp) in self.components() {
            if exp != Rational::ONE || found.is_some() {
                return None;
            }
            found = Some(base);
        }
        found
    }

    // ==========================================================================
    // Operations
    // ==========================================================================

    /// Multiply dimensions (add exponents).
    ///
    /// Used when multiplying quantities: [A] × [B] = [A × B]
    ///
    /// # Panics
    /// If an exponent leaves the `i64` fraction range; see
    /// [`Dimension::try_multiply`].
    pub fn multiply(&self, other: &Dimension) -> Dimension {
        self.try_multiply(other).expect("Dimension exponent overflow")
    }

    /// Divide dimensions (subtract exponents).
    ///
    /// Used when dividing quantities: [A] / [B] = [A / B]
    ///
    /// # Panics
    /// If an exponent leaves the `i64` fraction range; see
    /// [`Dimension::try_divide`].
    pub fn divide(&self, other: &Dimension) -> Dimension {
        self.try_divide(other).expect("Dimension exponent overflow")
    }

    /// Raise to a rational power (scale every exponent).
    ///
    /// [L²]^(1/2) = [L]
    ///
    /// # Panics
    /// If an exponent leaves the `i64` fraction range; see
    /// [`Dimension::try_power`].
    pub fn power(&self, n: Rational) -> Dimension {
        self.try_power(n).expect("Dimension exponent overflow")
    }

    /// Reciprocal (negate all exponents).
    pub fn recip(&self) -> Dimension {
        self.power(Rational::MINUS_ONE)
    }

    /// Checked [`Dimension::multiply`].
    pub fn try_multiply(&self, other: &Dimension) -> NumericResult<Dimension> {
        self.zip(other, Rational::checked_add)
    }

    /// Checked [`Dimension::divide`].
    pub fn try_divide(&self, other: &Dimension) -> NumericResult<Dimension> {
        self.zip(other, Rational::checked_sub)
    }

    /// Checked [`Dimension::power`].
    pub fn try_power(&self, n: Rational) -> NumericResult<Dimension> {
        let mut exponents = self.exponents;
        for e in exponents.iter_mut() {
            *e = e.checked_mul(n)?;
        }
        Ok(Dimension { exponents })
    }

    /// Exact elementwise equality.
    #[inline]
    pub fn equals(&self, other: &Dimension) -> bool {
        self == other
    }

    fn zip(
        &self,
        other: &Dimension,
        op: impl Fn(Rational, Rational) -> NumericResult<Rational>,
    ) -> NumericResult<Dimension> {
        let mut exponents = [Rational::ZERO; 7];
        for (i, e) in exponents.iter_mut().enumerate() {
            *e = op(self.exponents[i], other.exponents[i])?;
        }
        Ok(Dimension { exponents })
    }
}

impl Mul for Dimension {
    type Output = Dimension;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(&rhs)
    }
}

impl Div for Dimension {
    type Output = Dimension;

    #[inline]
    fn div(self, rhs: Self) -> Self::Output {
        self.divide(&rhs)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "dimensionless");
        }
        let mut first = true;
        for (base, exp) in self.components() {
            if !first {
                write!(f, " * ")?;
            }
            first = false;
            if exp == Rational::ONE {
                write!(f, "[{}]", base.name())?;
            } else if exp.is_integer() {
                write!(f, "[{}]^{}", base.name(), exp)?;
            } else {
                write!(f, "[{}]^({})", base.name(), exp)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::NumericError;

    #[test]
    fn test_multiply_divide() {
        let velocity = Dimension::LENGTH.divide(&Dimension::TIME);
        assert_eq!(velocity, Dimension::VELOCITY);

        let force = Dimension::MASS * Dimension::ACCELERATION;
        assert_eq!(force, Dimension::FORCE);

        let energy = Dimension::FORCE * Dimension::LENGTH;
        assert_eq!(energy, Dimension::ENERGY);
        assert_eq!(Dimension::ENERGY / Dimension::TIME, Dimension::POWER);
    }

    #[test]
    fn test_power() {
        assert_eq!(Dimension::LENGTH.power(Rational::integer(2)), Dimension::AREA);
        assert_eq!(Dimension::AREA.power(Rational::HALF), Dimension::LENGTH);

        let root_length = Dimension::LENGTH.power(Rational::HALF);
        assert_eq!(root_length.exponent(BaseDimension::Length), Rational::HALF);
        assert!(!root_length.is_dimensionless());
    }

    #[test]
    fn test_inverse() {
        let d = Dimension::PRESSURE;
        assert!(d.multiply(&d.recip()).is_dimensionless());
        assert!((d / d).is_dimensionless());
    }

    #[test]
    fn test_associativity() {
        let (a, b, c) = (Dimension::FORCE, Dimension::TIME, Dimension::CURRENT);
        assert_eq!((a * b) * c, a * (b * c));
    }

    #[test]
    fn test_base_lookup() {
        assert_eq!(Dimension::base(BaseDimension::Mass), Dimension::MASS);
        assert_eq!(Dimension::TEMPERATURE.as_base(), Some(BaseDimension::Temperature));
        assert_eq!(Dimension::VELOCITY.as_base(), None);
        assert_eq!(Dimension::DIMENSIONLESS.as_base(), None);
    }

    #[test]
    fn test_checked_operations_report_overflow() {
        let huge = Dimension::LENGTH.power(Rational::integer(i64::MAX));
        assert_eq!(huge.try_multiply(&Dimension::LENGTH), Err(NumericError::Overflow));
        assert_eq!(
            huge.try_divide(&Dimension::LENGTH.recip()),
            Err(NumericError::Overflow)
        );
        assert_eq!(huge.try_power(Rational::integer(2)), Err(NumericError::Overflow));

        let tiny = Rational::new(1, 1 << 32).unwrap();
        let nearly = Rational::new(1, (1 << 32) - 1).unwrap();
        let a = Dimension::LENGTH.power(tiny);
        let b = Dimension::LENGTH.power(nearly);
        assert_eq!(a.try_multiply(&b), Err(NumericError::Overflow));

        assert_eq!(
            Dimension::LENGTH.try_multiply(&Dimension::TIME.recip()),
            Ok(Dimension::VELOCITY)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Dimension::DIMENSIONLESS.to_string(), "dimensionless");
        assert_eq!(Dimension::LENGTH.to_string(), "[length]");
        assert_eq!(Dimension::ACCELERATION.to_string(), "[length] * [time]^-2");
        assert_eq!(
            Dimension::LENGTH.power(Rational::HALF).to_string(),
            "[length]^(1/2)"
        );
    }
}
