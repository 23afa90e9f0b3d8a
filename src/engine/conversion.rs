// ============================================================================
// Conversion Engine
// Multiplicative and affine transforms between compatible units
// ============================================================================

use crate::domain::errors::{UnitError, UnitResult};
use crate::domain::magnitude::Magnitude;
use crate::domain::unit::Unit;
use crate::platform::ArrayKernel;
use tracing::debug;

/// A resolved transform from one unit to another.
///
/// Build with [`Conversion::between`], then apply to any number of
/// magnitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conversion {
    /// Same canonical unit; values pass through untouched.
    Identity,
    /// `target = source * scale`
    Linear { scale: f64 },
    /// `target = (source + source_offset) * source_factor / target_factor - target_offset`
    Affine {
        source_offset: f64,
        source_factor: f64,
        target_factor: f64,
        target_offset: f64,
    },
}

impl Conversion {
    /// Resolve the transform from `from` to `to`.
    ///
    /// # Errors
    /// * `Dimensionality` when the dimensions differ
    /// * `Conversion` when an offset is involved and either side is not an
    ///   atomic unit
    pub fn between(from: &Unit, to: &Unit) -> UnitResult<Conversion> {
        if from.dimension() != to.dimension() {
            return Err(UnitError::dimensionality(from, to, "convert"));
        }
        if from.same_canonical(to) {
            return Ok(Conversion::Identity);
        }
        if !from.is_affine() && !to.is_affine() {
            return Ok(Conversion::Linear {
                scale: from.factor() / to.factor(),
            });
        }
        if !from.is_atomic() || !to.is_atomic() {
            return Err(UnitError::conversion(
                from,
                to,
                "offset units only convert between atomic units",
            ));
        }

        debug!(from = from.name(), to = to.name(), "affine conversion");
        Ok(Conversion::Affine {
            source_offset: from.offset(),
            source_factor: from.factor(),
            target_factor: to.factor(),
            target_offset: to.offset(),
        })
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        matches!(self, Conversion::Identity)
    }

    /// Convert one value.
    #[inline]
    pub fn apply_scalar(&self, value: f64) -> f64 {
        match *self {
            Conversion::Identity => value,
            Conversion::Linear { scale } => value * scale,
            Conversion::Affine {
                source_offset,
                source_factor,
                target_factor,
                target_offset,
            } => (value + source_offset) * source_factor / target_factor - target_offset,
        }
    }

    /// Convert a magnitude elementwise; order and length are preserved.
    ///
    /// Fails with `InvalidValue` if a converted value overflows.
    pub fn apply(&self, magnitude: &Magnitude) -> UnitResult<Magnitude> {
        if self.is_identity() {
            return Ok(magnitude.clone());
        }
        magnitude.map(&|v| self.apply_scalar(v)).finite()
    }

    /// As [`Conversion::apply`], with an explicit kernel for arrays.
    pub fn apply_with(&self, magnitude: &Magnitude, kernel: &dyn ArrayKernel) -> UnitResult<Magnitude> {
        if self.is_identity() {
            return Ok(magnitude.clone());
        }
        magnitude.map_with(kernel, &|v| self.apply_scalar(v)).finite()
    }
}

/// Convert `magnitude` from `from` to `to` in one call.
pub fn convert(magnitude: &Magnitude, from: &Unit, to: &Unit) -> UnitResult<Magnitude> {
    Conversion::between(from, to)?.apply(magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dimension::Dimension;
    use crate::domain::errors::ErrorKind;
    use crate::platform::ChunkedKernel;

    fn meter() -> Unit {
        Unit::atomic("meter", 1.0, 0.0, Dimension::LENGTH)
    }

    fn mile() -> Unit {
        Unit::atomic("mile", 1609.344, 0.0, Dimension::LENGTH)
    }

    fn kelvin() -> Unit {
        Unit::atomic("kelvin", 1.0, 0.0, Dimension::TEMPERATURE)
    }

    fn celsius() -> Unit {
        Unit::atomic("celsius", 1.0, 273.15, Dimension::TEMPERATURE)
    }

    fn fahrenheit() -> Unit {
        Unit::atomic("fahrenheit", 5.0 / 9.0, 459.67, Dimension::TEMPERATURE)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_identity_short_circuit() {
        let conv = Conversion::between(&meter(), &meter()).unwrap();
        assert!(conv.is_identity());
        assert_eq!(conv.apply_scalar(0.1 + 0.2), 0.1 + 0.2);
    }

    #[test]
    fn test_linear_conversion() {
        let conv = Conversion::between(&meter(), &mile()).unwrap();
        assert_close(conv.apply_scalar(1000.0), 0.621371192237334);
    }

    #[test]
    fn test_temperature_fixed_points() {
        let c_to_f = Conversion::between(&celsius(), &fahrenheit()).unwrap();
        let c_to_k = Conversion::between(&celsius(), &kelvin()).unwrap();
        let f_to_c = Conversion::between(&fahrenheit(), &celsius()).unwrap();

        assert_close(c_to_f.apply_scalar(0.0), 32.0);
        assert_close(c_to_f.apply_scalar(100.0), 212.0);
        assert_close(c_to_k.apply_scalar(0.0), 273.15);
        assert_close(f_to_c.apply_scalar(-40.0), -40.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let second = Unit::atomic("second", 1.0, 0.0, Dimension::TIME);
        let err = Conversion::between(&meter(), &second).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Dimensionality);
    }

    #[test]
    fn test_affine_to_compound_fails() {
        // kelvin^2 / kelvin has temperature dimension but is not atomic
        let k2 = kelvin().powf(crate::numeric::Rational::integer(2)).unwrap();
        let compound = k2.divide(&Unit::atomic("rankine", 5.0 / 9.0, 0.0, Dimension::TEMPERATURE)).unwrap();
        let err = Conversion::between(&celsius(), &compound).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conversion);
    }

    #[test]
    fn test_array_conversion_preserves_order() {
        let values = Magnitude::from([0.0, 100.0, -40.0]);
        let converted = convert(&values, &celsius(), &fahrenheit()).unwrap();
        let out: Vec<f64> = converted.iter().collect();
        assert_eq!(out.len(), 3);
        assert_close(out[0], 32.0);
        assert_close(out[1], 212.0);
        assert_close(out[2], -40.0);
    }

    #[test]
    fn test_explicit_kernel() {
        let values: Vec<f64> = (0..5000).map(f64::from).collect();
        let conv = Conversion::between(&mile(), &meter()).unwrap();
        let converted = conv
            .apply_with(&Magnitude::from(values), &ChunkedKernel::new(4))
            .unwrap();
        assert_close(converted.get(4999).unwrap(), 4999.0 * 1609.344);
    }

    #[test]
    fn test_overflow_is_invalid_value() {
        let tiny = Unit::atomic("tiny", 1e-300, 0.0, Dimension::LENGTH);
        let huge = Unit::atomic("huge", 1e300, 0.0, Dimension::LENGTH);
        let err = convert(&Magnitude::Scalar(1e300), &huge, &tiny).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }
}
