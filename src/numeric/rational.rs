// ============================================================================
// Rational Exponent
// Exact, always-normalized fraction used for dimension and unit exponents
// ============================================================================

use super::errors::{NumericError, NumericResult};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Exact fraction `num / den`.
///
/// Invariants: `den > 0` and `gcd(|num|, den) == 1`, so structural equality
/// is numeric equality. Intermediate products are computed in `i128` and
/// narrowed back, reporting `Overflow` if the reduced result does not fit.
///
/// # Example
/// ```
/// use unit_engine::numeric::Rational;
///
/// let half: Rational = "0.5".parse().unwrap();
/// assert_eq!(half, Rational::new(1, 2).unwrap());
/// assert_eq!((half + half), Rational::ONE);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rational {
    num: i64,
    den: i64,
}

const fn gcd(a: i128, b: i128) -> i128 {
    let mut a = if a < 0 { -a } else { a };
    let mut b = if b < 0 { -b } else { b };
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl Rational {
    /// Zero (0/1)
    pub const ZERO: Self = Self::integer(0);

    /// One (1/1)
    pub const ONE: Self = Self::integer(1);

    /// Minus one (-1/1)
    pub const MINUS_ONE: Self = Self::integer(-1);

    /// One half, the square-root exponent
    pub const HALF: Self = Self { num: 1, den: 2 };

    // ========================================================================
    // Construction
    // ========================================================================

    /// Create a whole-number rational.
    #[inline]
    pub const fn integer(value: i64) -> Self {
        Self { num: value, den: 1 }
    }

    /// Create a normalized rational from numerator and denominator.
    ///
    /// # Errors
    /// Returns `DivisionByZero` if `den == 0`.
    pub fn new(num: i64, den: i64) -> NumericResult<Self> {
        Self::from_wide(num as i128, den as i128)
    }

    fn from_wide(num: i128, den: i128) -> NumericResult<Self> {
        if den == 0 {
            return Err(NumericError::DivisionByZero);
        }
        let g = gcd(num, den);
        let (mut num, mut den) = (num / g, den / g);
        if den < 0 {
            num = -num;
            den = -den;
        }
        match (i64::try_from(num), i64::try_from(den)) {
            (Ok(num), Ok(den)) => Ok(Self { num, den }),
            _ => Err(NumericError::Overflow),
        }
    }

    /// Convert an exact decimal (e.g. a parsed `"0.25"`) into a fraction.
    ///
    /// # Errors
    /// Returns `Overflow` if the reduced fraction does not fit in i64.
    pub fn from_decimal(d: rust_decimal::Decimal) -> NumericResult<Self> {
        let scale = d.scale();
        let den = 10i128
            .checked_pow(scale)
            .ok_or(NumericError::PrecisionLoss)?;
        Self::from_wide(d.mantissa(), den)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Numerator (carries the sign).
    #[inline]
    pub const fn numer(self) -> i64 {
        self.num
    }

    /// Denominator (always positive).
    #[inline]
    pub const fn denom(self) -> i64 {
        self.den
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.num == 0
    }

    #[inline]
    pub const fn is_integer(self) -> bool {
        self.den == 1
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.num < 0
    }

    /// Nearest `f64`, used when raising conversion factors to this power.
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }

    // ========================================================================
    // Arithmetic Operations
    // ========================================================================

    /// Checked addition.
    pub fn checked_add(self, rhs: Self) -> NumericResult<Self> {
        let (a, b) = (self.num as i128, self.den as i128);
        let (c, d) = (rhs.num as i128, rhs.den as i128);
        Self::from_wide(a * d + c * b, b * d)
    }

    /// Checked subtraction.
    pub fn checked_sub(self, rhs: Self) -> NumericResult<Self> {
        self.checked_add(rhs.checked_neg()?)
    }

    /// Checked multiplication.
    pub fn checked_mul(self, rhs: Self) -> NumericResult<Self> {
        Self::from_wide(
            self.num as i128 * rhs.num as i128,
            self.den as i128 * rhs.den as i128,
        )
    }

    /// Checked division.
    ///
    /// # Errors
    /// Returns `DivisionByZero` if `rhs` is zero.
    pub fn checked_div(self, rhs: Self) -> NumericResult<Self> {
        if rhs.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        Self::from_wide(
            self.num as i128 * rhs.den as i128,
            self.den as i128 * rhs.num as i128,
        )
    }

    /// Checked negation.
    pub fn checked_neg(self) -> NumericResult<Self> {
        self.num
            .checked_neg()
            .map(|num| Self { num, den: self.den })
            .ok_or(NumericError::Overflow)
    }

    /// Reciprocal (`den / num`).
    pub fn recip(self) -> NumericResult<Self> {
        Self::ONE.checked_div(self)
    }

    /// Absolute value.
    pub fn abs(self) -> NumericResult<Self> {
        if self.is_negative() {
            self.checked_neg()
        } else {
            Ok(self)
        }
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl Default for Rational {
    #[inline]
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialOrd for Rational {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.num as i128 * other.den as i128;
        let rhs = other.num as i128 * self.den as i128;
        lhs.cmp(&rhs)
    }
}

impl From<i64> for Rational {
    #[inline]
    fn from(value: i64) -> Self {
        Self::integer(value)
    }
}

impl From<i32> for Rational {
    #[inline]
    fn from(value: i32) -> Self {
        Self::integer(value as i64)
    }
}

// Infallible operators for ergonomics (panic on overflow - use checked_* on untrusted input)
impl Add for Rational {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(rhs).expect("Rational addition overflow")
    }
}

impl Sub for Rational {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(rhs).expect("Rational subtraction overflow")
    }
}

impl Mul for Rational {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        self.checked_mul(rhs).expect("Rational multiplication overflow")
    }
}

impl Div for Rational {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self::Output {
        self.checked_div(rhs).expect("Rational division by zero or overflow")
    }
}

impl Neg for Rational {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        self.checked_neg().expect("Rational negation overflow")
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rational({})", self)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

// ============================================================================
// String Parsing
// ============================================================================

impl std::str::FromStr for Rational {
    type Err = NumericError;

    /// Parse an exponent literal.
    ///
    /// # Examples
    /// - "2" -> 2
    /// - "-1" -> -1
    /// - "0.5" -> 1/2
    /// - "1/3" -> 1/3
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(NumericError::InvalidInput);
        }

        if let Some((num, den)) = s.split_once('/') {
            let num: i64 = num.trim().parse().map_err(|_| NumericError::InvalidInput)?;
            let den: i64 = den.trim().parse().map_err(|_| NumericError::InvalidInput)?;
            return Self::new(num, den);
        }

        let decimal: rust_decimal::Decimal =
            s.parse().map_err(|_| NumericError::InvalidInput)?;
        Self::from_decimal(decimal)
    }
}

// ============================================================================
// Tests
// ============================================================================
