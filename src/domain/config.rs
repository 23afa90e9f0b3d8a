// ============================================================================
// Catalog Configuration
// Tuning knobs for unit resolution, caching and array kernels
// ============================================================================

use super::dimension::{BaseDimension, Dimension};
use super::unit::render_terms;
use crate::numeric::Rational;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Unit System
// ============================================================================

/// Preferred system for displaying and defaulting a bare dimension.
///
/// Only affects which unit [`UnitSystem::preferred_unit`] picks; conversion
/// arithmetic is identical across systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnitSystem {
    /// International System of Units (meter, kilogram, second, ...)
    #[default]
    Si,
    /// US customary / imperial (foot, pound, second, ...)
    Imperial,
    /// Centimeter-gram-second
    Cgs,
}

impl UnitSystem {
    pub fn name(&self) -> &'static str {
        match self {
            UnitSystem::Si => "SI",
            UnitSystem::Imperial => "imperial",
            UnitSystem::Cgs => "CGS",
        }
    }

    /// Parse a system name, case-insensitively ("si", "imperial", "cgs").
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "si" | "metric" => Some(UnitSystem::Si),
            "imperial" | "us" | "customary" => Some(UnitSystem::Imperial),
            "cgs" => Some(UnitSystem::Cgs),
            _ => None,
        }
    }

    /// Base unit this system uses for one base dimension.
    pub fn base_unit(&self, base: BaseDimension) -> &'static str {
        match (self, base) {
            (UnitSystem::Imperial, BaseDimension::Length) => "foot",
            (UnitSystem::Imperial, BaseDimension::Mass) => "pound",
            (UnitSystem::Imperial, BaseDimension::Temperature) => "rankine",
            (UnitSystem::Cgs, BaseDimension::Length) => "centimeter",
            (UnitSystem::Cgs, BaseDimension::Mass) => "gram",
            (_, base) => base.base_unit(),
        }
    }

    fn named_units(&self) -> &'static [(Dimension, &'static str)] {
        match self {
            UnitSystem::Si => &[
                (Dimension::FORCE, "newton"),
                (Dimension::ENERGY, "joule"),
                (Dimension::POWER, "watt"),
                (Dimension::PRESSURE, "pascal"),
                (Dimension::FREQUENCY, "hertz"),
                (Dimension::CHARGE, "coulomb"),
                (Dimension::VOLTAGE, "volt"),
                (Dimension::RESISTANCE, "ohm"),
                (Dimension::CAPACITANCE, "farad"),
                (Dimension::INDUCTANCE, "henry"),
            ],
            UnitSystem::Imperial => &[
                (Dimension::TEMPERATURE, "fahrenheit"),
                (Dimension::VOLUME, "gallon"),
                (Dimension::VELOCITY, "mile / hour"),
                (Dimension::FORCE, "pound_force"),
                (Dimension::PRESSURE, "psi"),
                (Dimension::ENERGY, "british_thermal_unit"),
                (Dimension::POWER, "horsepower"),
            ],
            UnitSystem::Cgs => &[
                (Dimension::FORCE, "dyne"),
                (Dimension::ENERGY, "erg"),
            ],
        }
    }

    /// Unit expression this system prefers for `dimension`.
    ///
    /// Named units win; otherwise the expression is composed from the
    /// system's base units, e.g. `foot / second^2` for acceleration in
    /// imperial.
    pub fn preferred_unit(&self, dimension: &Dimension) -> String {
        if let Some((_, name)) = self.named_units().iter().find(|(d, _)| d == dimension) {
            return (*name).to_string();
        }
        if dimension.is_dimensionless() {
            return "dimensionless".to_string();
        }
        let terms: Vec<(&str, Rational)> = dimension
            .components()
            .map(|(base, exp)| (self.base_unit(base), exp))
            .collect();
        render_terms(&terms)
    }
}

// ============================================================================
// Catalog Configuration
// ============================================================================

/// Default number of "did you mean" suggestions on an unknown unit
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;

/// Default largest edit distance a suggestion may have
pub const DEFAULT_MAX_SUGGESTION_DISTANCE: usize = 3;

/// Default array length from which conversions fan out across threads
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1 << 16;

/// Configuration for a [`crate::engine::UnitCatalog`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CatalogConfig {
    /// Maximum suggestions carried by an unknown-unit error
    pub max_suggestions: usize,

    /// Maximum edit distance for a name to be suggested
    pub max_suggestion_distance: usize,

    /// Whether parsed expressions are memoized
    pub cache_enabled: bool,

    /// Optional: cap on cached expressions. None means bounded only by
    /// the number of distinct strings parsed
    pub cache_capacity: Option<usize>,

    /// Array length at which elementwise work is split across threads
    pub parallel_threshold: usize,

    /// Default unit system for display and preferred conversions
    pub unit_system: UnitSystem,

    /// Accept a unique case-insensitive match on full unit names
    pub case_insensitive_fallback: bool,

    /// Register kibi through exbi multiples of bit and byte at startup
    pub binary_prefixes: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            max_suggestion_distance: DEFAULT_MAX_SUGGESTION_DISTANCE,
            cache_enabled: true,
            cache_capacity: None,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            unit_system: UnitSystem::Si,
            case_insensitive_fallback: true,
            binary_prefixes: false,
        }
    }
}

impl CatalogConfig {
    pub fn new(unit_system: UnitSystem) -> Self {
        Self {
            unit_system,
            ..Self::default()
        }
    }

    /// Builder method: Set maximum number of suggestions
    pub fn with_max_suggestions(mut self, count: usize) -> Self {
        self.max_suggestions = count;
        self
    }

    /// Builder method: Set maximum suggestion edit distance
    pub fn with_max_suggestion_distance(mut self, distance: usize) -> Self {
        self.max_suggestion_distance = distance;
        self
    }

    /// Builder method: Cap the number of cached expressions
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    /// Builder method: Disable the parse cache
    pub fn without_cache(mut self) -> Self {
        self.cache_enabled = false;
        self
    }

    /// Builder method: Set the parallel array threshold
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Builder method: Set the default unit system
    pub fn with_unit_system(mut self, system: UnitSystem) -> Self {
        self.unit_system = system;
        self
    }

    /// Builder method: Toggle case-insensitive name fallback
    pub fn with_case_insensitive_fallback(mut self, enabled: bool) -> Self {
        self.case_insensitive_fallback = enabled;
        self
    }

    /// Builder method: Toggle the IEC multiples of bit and byte
    pub fn with_binary_prefixes(mut self, enabled: bool) -> Self {
        self.binary_prefixes = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_suggestions > 64 {
            return Err("Maximum suggestions cannot exceed 64".to_string());
        }

        if let Some(capacity) = self.cache_capacity {
            if capacity == 0 {
                return Err("Cache capacity must be positive (use without_cache to disable)".to_string());
            }
        }

        if self.parallel_threshold == 0 {
            return Err("Parallel threshold must be positive".to_string());
        }

        Ok(())
    }
}

// ============================================================================
// Preset Configurations (Factory Methods)
// ============================================================================

impl CatalogConfig {
    /// SI defaults
    pub fn si() -> Self {
        Self::new(UnitSystem::Si)
    }

    /// Imperial display preference, otherwise defaults
    pub fn imperial() -> Self {
        Self::new(UnitSystem::Imperial)
    }

    /// CGS display preference, otherwise defaults
    pub fn cgs() -> Self {
        Self::new(UnitSystem::Cgs)
    }

    /// No memoization; every lookup resolves from scratch
    pub fn uncached() -> Self {
        Self::default().without_cache()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = CatalogConfig::new(UnitSystem::Imperial);
        assert_eq!(config.unit_system, UnitSystem::Imperial);
        assert_eq!(config.max_suggestions, DEFAULT_MAX_SUGGESTIONS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = CatalogConfig::si()
            .with_max_suggestions(3)
            .with_cache_capacity(128)
            .with_parallel_threshold(1024);

        assert_eq!(config.max_suggestions, 3);
        assert_eq!(config.cache_capacity, Some(128));
        assert_eq!(config.parallel_threshold, 1024);
    }

    #[test]
    fn test_validation() {
        assert!(CatalogConfig::si().with_parallel_threshold(0).validate().is_err());
        assert!(CatalogConfig::si().with_cache_capacity(0).validate().is_err());
        assert!(CatalogConfig::si().with_max_suggestions(100).validate().is_err());
    }

    #[test]
    fn test_preset_configs() {
        assert!(!CatalogConfig::uncached().cache_enabled);
        assert!(!CatalogConfig::si().binary_prefixes);
        assert!(CatalogConfig::si().with_binary_prefixes(true).binary_prefixes);
        assert_eq!(CatalogConfig::cgs().unit_system, UnitSystem::Cgs);
    }

    #[test]
    fn test_system_names() {
        assert_eq!(UnitSystem::from_name("SI"), Some(UnitSystem::Si));
        assert_eq!(UnitSystem::from_name("Imperial"), Some(UnitSystem::Imperial));
        assert_eq!(UnitSystem::from_name("martian"), None);
    }

    #[test]
    fn test_preferred_units() {
        assert_eq!(UnitSystem::Si.preferred_unit(&Dimension::FORCE), "newton");
        assert_eq!(UnitSystem::Si.preferred_unit(&Dimension::VELOCITY), "meter / second");
        assert_eq!(
            UnitSystem::Imperial.preferred_unit(&Dimension::ACCELERATION),
            "foot / second^2"
        );
        assert_eq!(UnitSystem::Imperial.preferred_unit(&Dimension::LENGTH), "foot");
        assert_eq!(UnitSystem::Cgs.preferred_unit(&Dimension::AREA), "centimeter^2");
        assert_eq!(
            UnitSystem::Si.preferred_unit(&Dimension::DIMENSIONLESS),
            "dimensionless"
        );
    }
}
