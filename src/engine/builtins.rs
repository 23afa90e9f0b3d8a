// ============================================================================
// Builtin Units
// Static catalog of SI, derived, imperial and common non-SI units
// ============================================================================

use crate::domain::dimension::Dimension;

/// One row of the builtin table.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinUnit {
    pub name: &'static str,
    pub symbol: Option<&'static str>,
    pub aliases: &'static [&'static str],
    pub factor: f64,
    pub offset: f64,
    pub dimension: Dimension,
    pub prefixable: bool,
}

const fn linear(
    name: &'static str,
    symbol: Option<&'static str>,
    aliases: &'static [&'static str],
    factor: f64,
    dimension: Dimension,
    prefixable: bool,
) -> BuiltinUnit {
    BuiltinUnit {
        name,
        symbol,
        aliases,
        factor,
        offset: 0.0,
        dimension,
        prefixable,
    }
}

const DIMENSIONLESS: Dimension = Dimension::DIMENSIONLESS;
const LENGTH: Dimension = Dimension::LENGTH;
const MASS: Dimension = Dimension::MASS;
const TIME: Dimension = Dimension::TIME;
const TEMPERATURE: Dimension = Dimension::TEMPERATURE;

const INCH: f64 = 0.0254;
const FOOT: f64 = 0.3048;
const POUND: f64 = 0.45359237;
const GALLON: f64 = 3.785411784e-3;
const STANDARD_GRAVITY: f64 = 9.80665;

/// Every unit a fresh catalog knows.
///
/// Names, symbols and aliases are unique across the whole table.
pub const BUILTIN_UNITS: &[BuiltinUnit] = &[
    // Base units
    linear("meter", Some("m"), &["metre", "meters", "metres"], 1.0, LENGTH, true),
    linear("gram", Some("g"), &["gramme", "grams"], 1e-3, MASS, true),
    linear("second", Some("s"), &["sec", "seconds"], 1.0, TIME, true),
    linear("ampere", Some("A"), &["amp", "amps", "amperes"], 1.0, Dimension::CURRENT, true),
    linear("kelvin", Some("K"), &["kelvins"], 1.0, TEMPERATURE, true),
    linear("mole", Some("mol"), &["moles"], 1.0, Dimension::AMOUNT, true),
    linear("candela", Some("cd"), &["candelas"], 1.0, Dimension::LUMINOSITY, true),
    linear("dimensionless", None, &[], 1.0, DIMENSIONLESS, false),
    // Coherent derived units
    linear("newton", Some("N"), &["newtons"], 1.0, Dimension::FORCE, true),
    linear("joule", Some("J"), &["joules"], 1.0, Dimension::ENERGY, true),
    linear("watt", Some("W"), &["watts"], 1.0, Dimension::POWER, true),
    linear("pascal", Some("Pa"), &["pascals"], 1.0, Dimension::PRESSURE, true),
    linear("hertz", Some("Hz"), &[], 1.0, Dimension::FREQUENCY, true),
    linear("coulomb", Some("C"), &["coulombs"], 1.0, Dimension::CHARGE, true),
    linear("volt", Some("V"), &["volts"], 1.0, Dimension::VOLTAGE, true),
    linear("ohm", Some("Ω"), &["ohms"], 1.0, Dimension::RESISTANCE, true),
    linear("siemens", Some("S"), &[], 1.0, Dimension::CONDUCTANCE, true),
    linear("farad", Some("F"), &["farads"], 1.0, Dimension::CAPACITANCE, true),
    linear("henry", Some("H"), &["henries"], 1.0, Dimension::INDUCTANCE, true),
    linear("weber", Some("Wb"), &["webers"], 1.0, Dimension::MAGNETIC_FLUX, true),
    linear("tesla", Some("T"), &["teslas"], 1.0, Dimension::MAGNETIC_FLUX_DENSITY, true),
    // Temperature scales
    BuiltinUnit {
        name: "celsius",
        symbol: Some("°C"),
        aliases: &["degC", "degree_celsius", "degrees_celsius"],
        factor: 1.0,
        offset: 273.15,
        dimension: TEMPERATURE,
        prefixable: false,
    },
    BuiltinUnit {
        name: "fahrenheit",
        symbol: Some("°F"),
        aliases: &["degF", "degree_fahrenheit", "degrees_fahrenheit"],
        factor: 5.0 / 9.0,
        offset: 459.67,
        dimension: TEMPERATURE,
        prefixable: false,
    },
    linear("rankine", Some("°R"), &["degR"], 5.0 / 9.0, TEMPERATURE, false),
    // Length
    linear("inch", Some("in"), &["inches"], INCH, LENGTH, false),
    linear("foot", Some("ft"), &["feet"], FOOT, LENGTH, false),
    linear("yard", Some("yd"), &["yards"], 0.9144, LENGTH, false),
    linear("mile", Some("mi"), &["miles"], 1609.344, LENGTH, false),
    linear("nautical_mile", Some("nmi"), &["nautical_miles"], 1852.0, LENGTH, false),
    linear("angstrom", Some("Å"), &["angstroms"], 1e-10, LENGTH, false),
    linear("astronomical_unit", Some("au"), &[], 1.495978707e11, LENGTH, false),
    linear("light_year", Some("ly"), &["light_years"], 9.4607304725808e15, LENGTH, false),
    linear("parsec", Some("pc"), &["parsecs"], 3.0856775814913673e16, LENGTH, true),
    // Mass
    linear("tonne", Some("t"), &["tonnes", "ton", "tons", "metric_ton"], 1e3, MASS, false),
    linear("pound", Some("lb"), &["pounds", "lbs"], POUND, MASS, false),
    linear("ounce", Some("oz"), &["ounces"], POUND / 16.0, MASS, false),
    linear("atomic_mass_unit", Some("amu"), &["dalton"], 1.66053906660e-27, MASS, false),
    // Time
    linear("minute", Some("min"), &["minutes"], 60.0, TIME, false),
    linear("hour", Some("h"), &["hr", "hours"], 3600.0, TIME, false),
    linear("day", Some("d"), &["days"], 86400.0, TIME, false),
    linear("week", None, &["weeks"], 604800.0, TIME, false),
    linear("year", Some("yr"), &["years"], 31536000.0, TIME, false),
    // Area and volume
    linear("hectare", Some("ha"), &["hectares"], 1e4, Dimension::AREA, false),
    linear("acre", None, &["acres"], 4046.8564224, Dimension::AREA, false),
    linear("liter", Some("L"), &["l", "litre", "liters", "litres"], 1e-3, Dimension::VOLUME, true),
    linear("gallon", Some("gal"), &["gallons"], GALLON, Dimension::VOLUME, false),
    linear("quart", Some("qt"), &["quarts"], GALLON / 4.0, Dimension::VOLUME, false),
    linear("pint", Some("pt"), &["pints"], GALLON / 8.0, Dimension::VOLUME, false),
    linear("cup", None, &["cups"], GALLON / 16.0, Dimension::VOLUME, false),
    linear("fluid_ounce", Some("fl_oz"), &["fluid_ounces"], GALLON / 128.0, Dimension::VOLUME, false),
    // Velocity
    linear("mile_per_hour", Some("mph"), &[], 0.44704, Dimension::VELOCITY, false),
    linear("knot", Some("kn"), &["knots"], 1852.0 / 3600.0, Dimension::VELOCITY, false),
    // Force, pressure
    linear("pound_force", Some("lbf"), &[], POUND * STANDARD_GRAVITY, Dimension::FORCE, false),
    linear("dyne", Some("dyn"), &["dynes"], 1e-5, Dimension::FORCE, false),
    linear("bar", None, &["bars"], 1e5, Dimension::PRESSURE, true),
    linear("atmosphere", Some("atm"), &["atmospheres"], 101325.0, Dimension::PRESSURE, false),
    linear(
        "psi",
        None,
        &["pound_per_square_inch"],
        POUND * STANDARD_GRAVITY / (INCH * INCH),
        Dimension::PRESSURE,
        false,
    ),
    linear("torr", Some("Torr"), &[], 101325.0 / 760.0, Dimension::PRESSURE, false),
    linear("millimeter_of_mercury", Some("mmHg"), &[], 133.322387415, Dimension::PRESSURE, false),
    // Energy, power
    linear("calorie", Some("cal"), &["calories"], 4.184, Dimension::ENERGY, true),
    linear("electronvolt", Some("eV"), &["electronvolts"], 1.602176634e-19, Dimension::ENERGY, true),
    linear("watt_hour", Some("Wh"), &["watt_hours"], 3600.0, Dimension::ENERGY, true),
    linear("british_thermal_unit", Some("BTU"), &["btu", "Btu"], 1055.05585262, Dimension::ENERGY, false),
    linear("erg", None, &["ergs"], 1e-7, Dimension::ENERGY, false),
    linear("horsepower", Some("hp"), &[], 745.6998715822702, Dimension::POWER, false),
    // Dimensionless
    linear("radian", Some("rad"), &["radians"], 1.0, DIMENSIONLESS, true),
    linear("degree", Some("deg"), &["degrees", "°"], std::f64::consts::PI / 180.0, DIMENSIONLESS, false),
    linear("percent", Some("pct"), &[], 1e-2, DIMENSIONLESS, false),
    linear("ppm", None, &[], 1e-6, DIMENSIONLESS, false),
    linear("ppb", None, &[], 1e-9, DIMENSIONLESS, false),
    // Information
    linear("bit", Some("b"), &["bits"], 1.0, DIMENSIONLESS, true),
    linear("byte", Some("B"), &["bytes"], 8.0, DIMENSIONLESS, true),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_symbols_aliases_unique() {
        let mut seen = HashSet::new();
        for unit in BUILTIN_UNITS {
            let spellings = std::iter::once(unit.name)
                .chain(unit.symbol)
                .chain(unit.aliases.iter().copied());
            for spelling in spellings {
                assert!(seen.insert(spelling), "duplicate spelling {}", spelling);
            }
        }
    }

    #[test]
    fn test_factors_positive_and_finite() {
        for unit in BUILTIN_UNITS {
            assert!(unit.factor.is_finite() && unit.factor > 0.0, "{}", unit.name);
        }
    }

    #[test]
    fn test_only_temperature_scales_carry_offsets() {
        let affine: Vec<&str> = BUILTIN_UNITS
            .iter()
            .filter(|u| u.offset != 0.0)
            .map(|u| u.name)
            .collect();
        assert_eq!(affine, vec!["celsius", "fahrenheit"]);
        assert!(BUILTIN_UNITS
            .iter()
            .filter(|u| u.offset != 0.0)
            .all(|u| !u.prefixable));
    }
}
