// ============================================================================
// Unit Descriptor
// Canonical (factor, offset, dimension, name) value produced by the catalog
// ============================================================================

use super::dimension::Dimension;
use super::errors::{UnitError, UnitResult};
use crate::numeric::{NumericResult, Rational};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Relative tolerance used when comparing conversion factors
pub const FACTOR_TOLERANCE: f64 = 1e-12;

/// Coherent SI derived units that arithmetic results are collapsed into
/// when dimension and factor both match.
pub const NAMED_DERIVED_UNITS: [(&str, Dimension); 13] = [
    ("newton", Dimension::FORCE),
    ("joule", Dimension::ENERGY),
    ("watt", Dimension::POWER),
    ("pascal", Dimension::PRESSURE),
    ("hertz", Dimension::FREQUENCY),
    ("coulomb", Dimension::CHARGE),
    ("volt", Dimension::VOLTAGE),
    ("ohm", Dimension::RESISTANCE),
    ("siemens", Dimension::CONDUCTANCE),
    ("farad", Dimension::CAPACITANCE),
    ("henry", Dimension::INDUCTANCE),
    ("weber", Dimension::MAGNETIC_FLUX),
    ("tesla", Dimension::MAGNETIC_FLUX_DENSITY),
];

// ============================================================================
// Term
// ============================================================================

/// One factor of a unit expression: an atomic unit raised to an exponent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Term {
    pub name: Arc<str>,
    pub exponent: Rational,
}

impl Term {
    pub fn new(name: impl Into<Arc<str>>, exponent: Rational) -> Self {
        Self {
            name: name.into(),
            exponent,
        }
    }
}

pub(crate) type Terms = SmallVec<[Term; 4]>;

/// Render `name^exp` terms as `a * b^2 / c / d^(1/2)`.
///
/// Positive exponents form the numerator in input order, negative ones are
/// appended as successive divisions. An empty numerator renders as `1`.
pub fn render_terms<S: AsRef<str>>(terms: &[(S, Rational)]) -> String {
    // writes |exp|; the sign is carried by the position
    fn push_power(out: &mut String, name: &str, exp: Rational) {
        out.push_str(name);
        let text = exp.to_string();
        let text = text.trim_start_matches('-');
        if text == "1" {
            return;
        }
        if exp.is_integer() {
            out.push('^');
            out.push_str(text);
        } else {
            out.push_str(&format!("^({})", text));
        }
    }

    let mut out = String::new();
    for (name, exp) in terms.iter().filter(|(_, e)| !e.is_negative() && !e.is_zero()) {
        if !out.is_empty() {
            out.push_str(" * ");
        }
        push_power(&mut out, name.as_ref(), *exp);
    }
    if out.is_empty() {
        out.push('1');
    }
    for (name, exp) in terms.iter().filter(|(_, e)| e.is_negative()) {
        out.push_str(" / ");
        push_power(&mut out, name.as_ref(), *exp);
    }
    out
}

/// Coherent SI base-unit expression for a dimension, e.g.
/// `kilogram * meter / second^2`.
pub fn si_base_expression(dimension: &Dimension) -> String {
    if dimension.is_dimensionless() {
        return "dimensionless".to_string();
    }
    let terms: Vec<(&str, Rational)> = dimension
        .components()
        .map(|(base, exp)| (base.base_unit(), exp))
        .collect();
    render_terms(&terms)
}

// ============================================================================
// Unit
// ============================================================================

/// Canonical unit descriptor.
///
/// `value_in_base = (value + offset) * factor`. Only atomic units carry an
/// offset; compound units always have `offset == 0`. Units are immutable
/// once built and shared as `Arc<Unit>`.
#[derive(Debug, Clone)]
pub struct Unit {
    name: Arc<str>,
    factor: f64,
    offset: f64,
    dimension: Dimension,
    terms: Terms,
}

impl Unit {
    /// An atomic unit (one catalog entry, possibly prefixed).
    pub fn atomic(name: &str, factor: f64, offset: f64, dimension: Dimension) -> Self {
        let name: Arc<str> = Arc::from(name);
        let mut terms = Terms::new();
        terms.push(Term::new(Arc::clone(&name), Rational::ONE));
        Self {
            name,
            factor,
            offset,
            dimension,
            terms,
        }
    }

    /// The unit of pure numbers.
    pub fn dimensionless() -> Self {
        Self {
            name: Arc::from("dimensionless"),
            factor: 1.0,
            offset: 0.0,
            dimension: Dimension::DIMENSIONLESS,
            terms: Terms::new(),
        }
    }

    /// Build a compound unit from already-merged terms.
    pub(crate) fn compound(terms: Terms, factor: f64, dimension: Dimension) -> Self {
        let terms: Terms = terms.into_iter().filter(|t| !t.exponent.is_zero()).collect();
        // Cancelled atoms cancel their factors too; only rounding remains.
        if terms.is_empty() {
            return Self::dimensionless();
        }
        let pairs: Vec<(&str, Rational)> =
            terms.iter().map(|t| (t.name.as_ref(), t.exponent)).collect();
        let name = render_terms(&pairs);
        Self {
            name: Arc::from(name.as_str()),
            factor,
            offset: 0.0,
            dimension,
            terms,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Canonical string; identical names mean identical units.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Multiplicative factor to the coherent SI base scale.
    #[inline]
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Additive offset applied before scaling (temperature scales).
    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    #[inline]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[inline]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    #[inline]
    pub fn is_affine(&self) -> bool {
        self.offset != 0.0
    }

    /// Exactly one term with exponent one.
    #[inline]
    pub fn is_atomic(&self) -> bool {
        self.terms.len() == 1 && self.terms[0].exponent == Rational::ONE
    }

    #[inline]
    pub fn is_dimensionless(&self) -> bool {
        self.dimension.is_dimensionless()
    }

    /// Same dimension (convertible).
    #[inline]
    pub fn is_compatible_with(&self, other: &Unit) -> bool {
        self.dimension == other.dimension
    }

    /// Same canonical form.
    #[inline]
    pub fn same_canonical(&self, other: &Unit) -> bool {
        self.name == other.name
    }

    // ========================================================================
    // Algebra
    // ========================================================================

    /// Product of two units. Fails if either carries an offset.
    pub fn multiply(&self, other: &Unit) -> UnitResult<Unit> {
        self.combine(other, Rational::ONE, "multiply")
    }

    /// Quotient of two units. Fails if either carries an offset.
    pub fn divide(&self, other: &Unit) -> UnitResult<Unit> {
        self.combine(other, Rational::MINUS_ONE, "divide")
    }

    /// Raise to a rational power. Affine units only allow the exponent one.
    ///
    /// Exponents or factors that leave the representable range fail with
    /// `InvalidValue`.
    pub fn powf(&self, exponent: Rational) -> UnitResult<Unit> {
        if exponent == Rational::ONE {
            return Ok(self.clone());
        }
        self.ensure_linear("raise to a power")?;
        let terms = self
            .terms
            .iter()
            .map(|t| {
                t.exponent
                    .checked_mul(exponent)
                    .map(|e| Term::new(Arc::clone(&t.name), e))
            })
            .collect::<NumericResult<Terms>>()?;
        let factor = checked_factor(pow_factor(self.factor, exponent))?;
        Ok(Unit::compound(terms, factor, self.dimension.try_power(exponent)?))
    }

    /// Reciprocal unit (`1 / self`).
    pub fn recip(&self) -> UnitResult<Unit> {
        self.powf(Rational::MINUS_ONE)
    }

    /// Collapse into a named coherent derived unit when possible.
    ///
    /// `kilogram * meter / second^2` becomes `newton`; anything whose factor
    /// is not exactly the coherent one is left as written.
    pub fn simplified(self) -> Unit {
        if self.is_atomic() || !approx_eq(self.factor, 1.0) {
            return self;
        }
        match NAMED_DERIVED_UNITS
            .iter()
            .find(|(_, dim)| *dim == self.dimension)
        {
            Some((name, dim)) => Unit::atomic(name, 1.0, 0.0, *dim),
            None => self,
        }
    }

    fn combine(&self, other: &Unit, sign: Rational, operation: &str) -> UnitResult<Unit> {
        self.ensure_linear(operation)?;
        other.ensure_linear(operation)?;

        let mut terms = self.terms.clone();
        for term in other.terms.iter() {
            merge_term(&mut terms, &term.name, term.exponent.checked_mul(sign)?)?;
        }

        let (factor, dimension) = if sign == Rational::ONE {
            (self.factor * other.factor, self.dimension.try_multiply(&other.dimension)?)
        } else {
            (self.factor / other.factor, self.dimension.try_divide(&other.dimension)?)
        };
        Ok(Unit::compound(terms, checked_factor(factor)?, dimension))
    }

    fn ensure_linear(&self, operation: &str) -> UnitResult<()> {
        if self.is_affine() {
            return Err(UnitError::parse(
                &self.name,
                format!(
                    "offset unit '{}' cannot {} into a compound unit",
                    self.name, operation
                ),
            ));
        }
        Ok(())
    }
}

/// Add `exponent` to the term called `name`, appending it if absent.
fn merge_term(terms: &mut Terms, name: &Arc<str>, exponent: Rational) -> NumericResult<()> {
    match terms.iter_mut().find(|t| t.name == *name) {
        Some(existing) => existing.exponent = existing.exponent.checked_add(exponent)?,
        None => terms.push(Term::new(Arc::clone(name), exponent)),
    }
    Ok(())
}

/// A compound factor must stay a positive finite scale.
fn checked_factor(factor: f64) -> UnitResult<f64> {
    if factor.is_finite() && factor > 0.0 {
        Ok(factor)
    } else {
        Err(UnitError::invalid_value(format!(
            "unit scale factor {} is out of range",
            factor
        )))
    }
}

/// `factor^exponent`, exact for whole exponents.
pub(crate) fn pow_factor(factor: f64, exponent: Rational) -> f64 {
    if exponent.is_integer() {
        match i32::try_from(exponent.numer()) {
            Ok(n) => factor.powi(n),
            Err(_) => factor.powf(exponent.to_f64()),
        }
    } else {
        factor.powf(exponent.to_f64())
    }
}

/// Relative float comparison at [`FACTOR_TOLERANCE`].
pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    a == b || (a - b).abs() <= FACTOR_TOLERANCE * a.abs().max(b.abs())
}

/// Units are equal when they measure the same thing on the same scale:
/// same dimension and offset, factors equal to within [`FACTOR_TOLERANCE`].
impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.dimension == other.dimension
            && self.offset == other.offset
            && approx_eq(self.factor, other.factor)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meter() -> Unit {
        Unit::atomic("meter", 1.0, 0.0, Dimension::LENGTH)
    }

    fn second() -> Unit {
        Unit::atomic("second", 1.0, 0.0, Dimension::TIME)
    }

    fn celsius() -> Unit {
        Unit::atomic("celsius", 1.0, 273.15, Dimension::TEMPERATURE)
    }

    #[test]
    fn test_render_terms() {
        let one = Rational::ONE;
        let two = Rational::integer(2);
        assert_eq!(render_terms(&[("meter", one)]), "meter");
        assert_eq!(
            render_terms(&[("meter", one), ("second", -two)]),
            "meter / second^2"
        );
        assert_eq!(render_terms(&[("second", Rational::MINUS_ONE)]), "1 / second");
        assert_eq!(render_terms(&[("meter", Rational::HALF)]), "meter^(1/2)");
    }

    #[test]
    fn test_compound_naming() {
        let velocity = meter().divide(&second()).unwrap();
        assert_eq!(velocity.name(), "meter / second");
        assert_eq!(velocity.dimension(), Dimension::VELOCITY);
        assert!(!velocity.is_atomic());

        let accel = velocity.divide(&second()).unwrap();
        assert_eq!(accel.name(), "meter / second^2");
    }

    #[test]
    fn test_terms_merge_and_cancel() {
        let area = meter().multiply(&meter()).unwrap();
        assert_eq!(area.name(), "meter^2");

        let back = area.divide(&meter()).unwrap();
        assert_eq!(back.name(), "meter");
        assert!(back.same_canonical(&meter()));

        let nothing = meter().divide(&meter()).unwrap();
        assert_eq!(nothing.name(), "dimensionless");
        assert!(nothing.is_dimensionless());
    }

    #[test]
    fn test_powf() {
        let km = Unit::atomic("kilometer", 1000.0, 0.0, Dimension::LENGTH);
        let km2 = km.powf(Rational::integer(2)).unwrap();
        assert_eq!(km2.factor(), 1e6);
        assert_eq!(km2.dimension(), Dimension::AREA);

        let root = km2.powf(Rational::HALF).unwrap();
        assert_eq!(root.name(), "kilometer");
        assert!(approx_eq(root.factor(), 1000.0));
    }

    #[test]
    fn test_offset_units_reject_compounding() {
        assert!(celsius().divide(&second()).is_err());
        assert!(second().multiply(&celsius()).is_err());
        assert!(celsius().powf(Rational::integer(2)).is_err());
        assert!(celsius().powf(Rational::ONE).is_ok());
    }

    #[test]
    fn test_exponent_overflow_is_an_error() {
        let huge = meter().powf(Rational::integer(i64::MAX)).unwrap();
        let err = huge.multiply(&meter()).unwrap_err();
        assert_eq!(err.kind(), crate::domain::errors::ErrorKind::InvalidValue);

        let area = meter().powf(Rational::integer(2)).unwrap();
        assert!(area.powf(Rational::integer(i64::MAX)).is_err());

        let a = meter().powf(Rational::new(1, 1 << 32).unwrap()).unwrap();
        let b = meter().powf(Rational::new(1, (1 << 32) - 1).unwrap()).unwrap();
        assert!(a.multiply(&b).is_err());
    }

    #[test]
    fn test_factor_out_of_range_is_an_error() {
        let km = Unit::atomic("kilometer", 1000.0, 0.0, Dimension::LENGTH);
        let err = km.powf(Rational::integer(400)).unwrap_err();
        assert_eq!(err.kind(), crate::domain::errors::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_render_extreme_negative_exponent() {
        let name = render_terms(&[("meter", Rational::integer(i64::MIN))]);
        assert_eq!(name, format!("1 / meter^{}", i64::MIN.unsigned_abs()));
    }

    #[test]
    fn test_simplified_to_named_unit() {
        let kg = Unit::atomic("kilogram", 1.0, 0.0, Dimension::MASS);
        let force = kg
            .multiply(&meter())
            .unwrap()
            .divide(&second().powf(Rational::integer(2)).unwrap())
            .unwrap()
            .simplified();
        assert_eq!(force.name(), "newton");

        let velocity = meter().divide(&second()).unwrap().simplified();
        assert_eq!(velocity.name(), "meter / second");
    }

    #[test]
    fn test_equality_is_scale_based() {
        let a = Unit::atomic("kilometer", 1000.0, 0.0, Dimension::LENGTH);
        let b = Unit::atomic("km", 1000.0, 0.0, Dimension::LENGTH);
        assert_eq!(a, b);
        assert_ne!(a, meter());
    }

    #[test]
    fn test_si_base_expression() {
        assert_eq!(
            si_base_expression(&Dimension::FORCE),
            "meter * kilogram / second^2"
        );
        assert_eq!(si_base_expression(&Dimension::DIMENSIONLESS), "dimensionless");
    }
}
