// ============================================================================
// Unit Engine Library
// Dimensional analysis: unit parsing, conversion and checked quantity math
// ============================================================================

//! # Unit Engine
//!
//! A dimensional analysis core: parse unit expressions, convert between
//! compatible units and do arithmetic on quantities with the dimensions
//! checked at every step.
//!
//! ## Features
//!
//! - **Exact dimension algebra** over the seven SI base dimensions with
//!   rational exponents
//! - **Unit catalog** with SI prefixes, aliases, typo suggestions and a
//!   concurrent parse cache
//! - **Multiplicative and affine conversion** (temperature scales)
//! - **Quantity arithmetic** on scalars and arrays, with long arrays split
//!   across worker threads
//! - **Custom units** and opt-in IEC binary multiples of bit and byte
//! - **Measurement uncertainty** propagated to first order
//! - Physical constants, plain, LaTeX and HTML formatting and (with the
//!   `serde` feature) a JSON interchange format
//!
//! ## Example
//!
//! ```rust
//! use unit_engine::prelude::*;
//!
//! let catalog = UnitCatalog::new();
//!
//! // Parse and convert
//! let distance = catalog.quantity(1.0, "km").unwrap();
//! let miles = catalog.convert(&distance, "mile").unwrap();
//! assert!((miles.value().unwrap() - 0.621371).abs() < 1e-6);
//!
//! // Arithmetic combines units and checks dimensions
//! let time = catalog.quantity(10.0, "s").unwrap();
//! let speed = (&catalog.quantity(100.0, "m").unwrap() / &time).unwrap();
//! assert_eq!(speed.to_string(), "10 meter / second");
//!
//! // Incompatible operands are errors, never silent
//! let err = (&distance + &time).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Dimensionality);
//! ```

pub mod constants;
pub mod domain;
pub mod engine;
pub mod formatter;
#[cfg(feature = "serde")]
pub mod interchange;
pub mod interfaces;
pub mod numeric;
pub mod parser;
pub mod platform;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        BaseDimension, CatalogConfig, Dimension, ErrorKind, Magnitude, Quantity, UncertainQuantity,
        Unit, UnitError, UnitResult, UnitSystem,
    };
    pub use crate::engine::{
        create_from_config, CacheStats, Conversion, UnitCatalog, UnitCatalogBuilder,
    };
    pub use crate::formatter::{FormatStyle, QuantityFormatter};
    pub use crate::interfaces::{
        CatalogEvent, CatalogEventHandler, LoggingEventHandler, NoOpEventHandler,
    };
    pub use crate::numeric::Rational;
}

#[cfg(test)]
mod integration_tests {
    use super::prelude::*;
    use std::sync::Arc;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_speed_from_distance_and_time() {
        let catalog = UnitCatalog::new();
        let distance = catalog.quantity(100.0, "m").unwrap();
        let time = catalog.quantity(10.0, "s").unwrap();

        let speed = (&distance / &time).unwrap();
        assert_eq!(speed.value(), Some(10.0));
        assert_eq!(speed.dimension(), Dimension::VELOCITY);
        assert_eq!(speed.unit().name(), "meter / second");
    }

    #[test]
    fn test_kilometer_to_mile() {
        let catalog = UnitCatalog::new();
        let km = catalog.quantity(1.0, "km").unwrap();
        let miles = km.to("mi", &catalog).unwrap();
        assert!((miles.value().unwrap() - 0.621371).abs() < 1e-6);

        let back = miles.to("km", &catalog).unwrap();
        assert_close(back.value().unwrap(), 1.0);
    }

    #[test]
    fn test_freezing_point() {
        let catalog = UnitCatalog::new();
        let freezing = catalog.quantity(0.0, "degC").unwrap();
        assert_close(freezing.to("degF", &catalog).unwrap().value().unwrap(), 32.0);
        assert_close(freezing.to("K", &catalog).unwrap().value().unwrap(), 273.15);
    }

    #[test]
    fn test_add_compatible_and_incompatible() {
        let catalog = UnitCatalog::new();
        let a = catalog.quantity(100.0, "m").unwrap();
        let b = catalog.quantity(5.0, "m").unwrap();
        let t = catalog.quantity(5.0, "s").unwrap();

        assert_eq!((&a + &b).unwrap().value(), Some(105.0));
        let err = (&a + &t).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Dimensionality);
        assert_eq!(a.value(), Some(100.0));
    }

    #[test]
    fn test_add_converts_right_operand() {
        let catalog = UnitCatalog::new();
        let a = catalog.quantity(1.0, "km").unwrap();
        let b = catalog.quantity(500.0, "m").unwrap();
        let sum = (&a + &b).unwrap();
        assert_eq!(sum.unit().name(), "kilometer");
        assert_close(sum.value().unwrap(), 1.5);
    }

    #[test]
    fn test_force_simplifies_to_newton() {
        let catalog = UnitCatalog::new();
        let mass = catalog.quantity(2.0, "kg").unwrap();
        let accel = catalog.quantity(9.8, "m/s^2").unwrap();
        let force = (&mass * &accel).unwrap();
        assert_eq!(force.unit().name(), "newton");
        assert_close(force.value().unwrap(), 19.6);
    }

    #[test]
    fn test_custom_unit() {
        let catalog = UnitCatalog::new();
        catalog.define("furlong", "220 yard").unwrap();
        let race = catalog.quantity(1.0, "furlong").unwrap();
        assert_close(race.to("m", &catalog).unwrap().value().unwrap(), 201.168);
    }

    #[test]
    fn test_cache_hit_counter() {
        let catalog = UnitCatalog::new();
        catalog.parse("kg*m/s^2").unwrap();
        let before = catalog.cache_stats().hits;
        catalog.parse("kg * m / s^2").unwrap();
        assert_eq!(catalog.cache_stats().hits, before + 1);
    }

    #[test]
    fn test_parse_canonical_name_is_fixed_point() {
        let catalog = UnitCatalog::new();
        for input in ["km/h", "N*m", "1/s", "kg^(1/2)", "mi/gal"] {
            let unit = catalog.parse(input).unwrap();
            let reparsed = catalog.parse(unit.name()).unwrap();
            assert_eq!(unit.name(), reparsed.name());
        }
    }

    #[test]
    fn test_unknown_unit_suggests() {
        let catalog = UnitCatalog::new();
        match catalog.parse("metr").unwrap_err() {
            UnitError::UnitNotFound { suggestions, .. } => {
                assert!(suggestions.iter().any(|s| s == "meter"));
            },
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_temperature_difference_is_rejected_in_compounds() {
        let catalog = UnitCatalog::new();
        assert_eq!(
            catalog.parse("degC/s").unwrap_err().kind(),
            ErrorKind::UnitParse
        );
    }

    #[test]
    fn test_array_conversion() {
        let catalog = UnitCatalog::new();
        let temps = catalog.quantity(vec![0.0, 100.0, -40.0], "celsius").unwrap();
        let f = temps.to("fahrenheit", &catalog).unwrap();
        let values: Vec<f64> = f.magnitude().iter().collect();
        assert_close(values[0], 32.0);
        assert_close(values[1], 212.0);
        assert_close(values[2], -40.0);
    }

    #[test]
    fn test_preferred_units_follow_default_system() {
        let catalog = UnitCatalog::new();
        let length = catalog.quantity(0.3048, "m").unwrap();
        catalog.set_default_system(UnitSystem::Imperial);
        let feet = length.to_preferred(&catalog).unwrap();
        assert_eq!(feet.unit().name(), "foot");
        assert_close(feet.value().unwrap(), 1.0);
    }

    #[test]
    fn test_builder_with_logging_handler() {
        let catalog = UnitCatalogBuilder::new()
            .define("smoot", "1.7018 m")
            .build(Arc::new(LoggingEventHandler))
            .unwrap();
        let bridge = catalog.quantity(364.4, "smoot").unwrap();
        assert!((bridge.to("m", &catalog).unwrap().value().unwrap() - 620.13592).abs() < 1e-6);
    }

    #[test]
    fn test_shared_catalog_across_threads() {
        let catalog = Arc::new(UnitCatalog::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let catalog = Arc::clone(&catalog);
                std::thread::spawn(move || {
                    let q = catalog.quantity(f64::from(i), "km").unwrap();
                    catalog.convert(&q, "m").unwrap().value().unwrap()
                })
            })
            .collect();
        let results: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec![0.0, 1000.0, 2000.0, 3000.0]);
    }
}
