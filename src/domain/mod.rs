// ============================================================================
// Domain Models Module
// Contains the core value types: dimensions, units, magnitudes, quantities
// ============================================================================

pub mod config;
pub mod dimension;
pub mod errors;
pub mod magnitude;
pub mod quantity;
pub mod uncertainty;
pub mod unit;

pub use config::{CatalogConfig, UnitSystem};
pub use dimension::{BaseDimension, Dimension};
pub use errors::{ErrorKind, UnitError, UnitResult};
pub use magnitude::Magnitude;
pub use quantity::Quantity;
pub use uncertainty::UncertainQuantity;
pub use unit::{Term, Unit};
