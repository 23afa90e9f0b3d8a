// ============================================================================
// Physical Constants
// CODATA 2018 values as unit-carrying quantities
// ============================================================================

use crate::domain::errors::{UnitError, UnitResult};
use crate::domain::quantity::Quantity;
use crate::engine::{suggest, UnitCatalog};

/// A named constant with its value in the given unit expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalConstant {
    pub name: &'static str,
    pub symbol: &'static str,
    pub value: f64,
    pub unit: &'static str,
}

impl PhysicalConstant {
    const fn new(name: &'static str, symbol: &'static str, value: f64, unit: &'static str) -> Self {
        Self {
            name,
            symbol,
            value,
            unit,
        }
    }

    /// The constant as a quantity of `catalog`.
    pub fn quantity(&self, catalog: &UnitCatalog) -> UnitResult<Quantity> {
        catalog.quantity(self.value, self.unit)
    }
}

pub const SPEED_OF_LIGHT: PhysicalConstant =
    PhysicalConstant::new("speed_of_light", "c", 299_792_458.0, "m/s");
pub const PLANCK: PhysicalConstant =
    PhysicalConstant::new("planck", "h", 6.626_070_15e-34, "J*s");
pub const REDUCED_PLANCK: PhysicalConstant =
    PhysicalConstant::new("reduced_planck", "hbar", 1.054_571_817e-34, "J*s");
pub const GRAVITATIONAL_CONSTANT: PhysicalConstant =
    PhysicalConstant::new("gravitational_constant", "G", 6.674_30e-11, "m^3/(kg*s^2)");
pub const ELEMENTARY_CHARGE: PhysicalConstant =
    PhysicalConstant::new("elementary_charge", "e", 1.602_176_634e-19, "C");
pub const ELECTRON_MASS: PhysicalConstant =
    PhysicalConstant::new("electron_mass", "m_e", 9.109_383_701_5e-31, "kg");
pub const PROTON_MASS: PhysicalConstant =
    PhysicalConstant::new("proton_mass", "m_p", 1.672_621_923_69e-27, "kg");
pub const AVOGADRO: PhysicalConstant =
    PhysicalConstant::new("avogadro", "N_A", 6.022_140_76e23, "1/mol");
pub const BOLTZMANN: PhysicalConstant =
    PhysicalConstant::new("boltzmann", "k_B", 1.380_649e-23, "J/K");
pub const GAS_CONSTANT: PhysicalConstant =
    PhysicalConstant::new("gas_constant", "R", 8.314_462_618, "J/(mol*K)");
pub const STANDARD_GRAVITY: PhysicalConstant =
    PhysicalConstant::new("standard_gravity", "g_n", 9.806_65, "m/s^2");
pub const STANDARD_ATMOSPHERE: PhysicalConstant =
    PhysicalConstant::new("standard_atmosphere", "atm", 101_325.0, "Pa");
pub const VACUUM_PERMITTIVITY: PhysicalConstant =
    PhysicalConstant::new("vacuum_permittivity", "epsilon_0", 8.854_187_812_8e-12, "F/m");
pub const VACUUM_PERMEABILITY: PhysicalConstant =
    PhysicalConstant::new("vacuum_permeability", "mu_0", 1.256_637_062_12e-6, "H/m");
pub const STEFAN_BOLTZMANN: PhysicalConstant =
    PhysicalConstant::new("stefan_boltzmann", "sigma", 5.670_374_419e-8, "W/(m^2*K^4)");

/// Every constant [`get`] knows.
pub const ALL: [PhysicalConstant; 15] = [
    SPEED_OF_LIGHT,
    PLANCK,
    REDUCED_PLANCK,
    GRAVITATIONAL_CONSTANT,
    ELEMENTARY_CHARGE,
    ELECTRON_MASS,
    PROTON_MASS,
    AVOGADRO,
    BOLTZMANN,
    GAS_CONSTANT,
    STANDARD_GRAVITY,
    STANDARD_ATMOSPHERE,
    VACUUM_PERMITTIVITY,
    VACUUM_PERMEABILITY,
    STEFAN_BOLTZMANN,
];

/// Look a constant up by name or symbol.
pub fn find(name: &str) -> Option<&'static PhysicalConstant> {
    ALL.iter().find(|c| c.name == name || c.symbol == name)
}

/// A constant as a quantity of `catalog`.
///
/// # Errors
/// `UnitNotFound` with close constant names when `name` is unknown.
///
/// # Example
/// ```
/// use unit_engine::prelude::*;
/// use unit_engine::constants;
///
/// let catalog = UnitCatalog::new();
/// let c = constants::get("speed_of_light", &catalog).unwrap();
/// let kmh = c.to("km/h", &catalog).unwrap();
/// assert!((kmh.value().unwrap() - 1_079_252_848.8).abs() < 1e-3);
/// ```
pub fn get(name: &str, catalog: &UnitCatalog) -> UnitResult<Quantity> {
    match find(name) {
        Some(constant) => constant.quantity(catalog),
        None => Err(UnitError::UnitNotFound {
            name: name.to_string(),
            suggestions: suggest::rank(name, ALL.iter().map(|c| c.name), 3, 3),
        }),
    }
}
