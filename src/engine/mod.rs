// ============================================================================
// Engine Module
// Contains the unit catalog, resolution tables and conversion logic
// ============================================================================

mod builtins;
mod prefixes;

pub mod batch;
pub mod catalog;
pub mod conversion;
pub mod factory;
pub mod suggest;

pub use builtins::{BuiltinUnit, BUILTIN_UNITS};
pub use catalog::{CacheStats, UnitCatalog, UnitDefinition};
pub use conversion::{convert, Conversion};
pub use factory::{create_from_config, UnitCatalogBuilder};
pub use prefixes::{Prefix, PrefixForm, BINARY_PREFIXES, SI_PREFIXES};
