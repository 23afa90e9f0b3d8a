// ============================================================================
// Catalog Factory
// Creates unit catalogs with validated configuration
// ============================================================================

use crate::domain::config::{CatalogConfig, UnitSystem};
use crate::engine::catalog::UnitCatalog;
use crate::interfaces::CatalogEventHandler;
use std::sync::Arc;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates a unit catalog from configuration
///
/// # Arguments
/// * `config` - Catalog configuration
/// * `event_handler` - Handler for registration and cache events
///
/// # Returns
/// * `Result<UnitCatalog, String>` - Configured catalog or validation error
///
/// # Example
/// ```
/// use unit_engine::prelude::*;
/// use unit_engine::engine::factory::create_from_config;
/// use std::sync::Arc;
///
/// let config = CatalogConfig::imperial();
/// let catalog = create_from_config(config, Arc::new(NoOpEventHandler)).unwrap();
/// assert_eq!(catalog.default_system(), UnitSystem::Imperial);
/// ```
pub fn create_from_config(
    config: CatalogConfig,
    event_handler: Arc<dyn CatalogEventHandler>,
) -> Result<UnitCatalog, String> {
    config.validate()?;
    Ok(UnitCatalog::with_event_handler(config, event_handler))
}

// ============================================================================
// Builder Pattern for Advanced Configuration
// ============================================================================

/// A custom unit queued on the builder, registered at build time
struct PendingDefinition {
    name: String,
    symbol: Option<String>,
    definition: String,
}

/// Builder for creating unit catalogs with a fluent API
///
/// # Example
/// ```
/// use unit_engine::prelude::*;
/// use unit_engine::engine::factory::UnitCatalogBuilder;
/// use std::sync::Arc;
///
/// let catalog = UnitCatalogBuilder::new()
///     .imperial_units()
///     .with_cache_capacity(1024)
///     .define("furlong", "220 yard")
///     .build(Arc::new(NoOpEventHandler))
///     .unwrap();
///
/// assert!(catalog.is_valid("furlong / week"));
/// assert_eq!(catalog.default_system(), UnitSystem::Imperial);
/// ```
pub struct UnitCatalogBuilder {
    config: CatalogConfig,
    definitions: Vec<PendingDefinition>,
}

impl UnitCatalogBuilder {
    /// Create a new builder with default (SI) configuration
    pub fn new() -> Self {
        Self::from_config(CatalogConfig::default())
    }

    /// Start from an existing configuration
    pub fn from_config(config: CatalogConfig) -> Self {
        Self {
            config,
            definitions: Vec::new(),
        }
    }

    // ========================================================================
    // Unit System Configuration
    // ========================================================================

    /// Prefer SI units (default)
    pub fn si_units(mut self) -> Self {
        self.config.unit_system = UnitSystem::Si;
        self
    }

    /// Prefer imperial units
    pub fn imperial_units(mut self) -> Self {
        self.config.unit_system = UnitSystem::Imperial;
        self
    }

    /// Prefer CGS units
    pub fn cgs_units(mut self) -> Self {
        self.config.unit_system = UnitSystem::Cgs;
        self
    }

    // ========================================================================
    // Resolution and Cache Configuration
    // ========================================================================

    /// Set maximum number of suggestions on an unknown unit
    pub fn with_max_suggestions(mut self, count: usize) -> Self {
        self.config.max_suggestions = count;
        self
    }

    /// Set maximum edit distance of a suggestion
    pub fn with_max_suggestion_distance(mut self, distance: usize) -> Self {
        self.config.max_suggestion_distance = distance;
        self
    }

    /// Cap the number of cached expressions
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = Some(capacity);
        self
    }

    /// Disable the parse cache
    pub fn without_cache(mut self) -> Self {
        self.config.cache_enabled = false;
        self
    }

    /// Require exact case in unit names
    pub fn case_sensitive(mut self) -> Self {
        self.config.case_insensitive_fallback = false;
        self
    }

    /// Register kibi through exbi multiples of bit and byte
    pub fn binary_prefixes(mut self) -> Self {
        self.config.binary_prefixes = true;
        self
    }

    /// Set the array length from which conversions run in parallel
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.config.parallel_threshold = threshold;
        self
    }

    // ========================================================================
    // Custom Units
    // ========================================================================

    /// Queue a custom unit, e.g. `define("furlong", "220 yard")`
    pub fn define(mut self, name: impl Into<String>, definition: impl Into<String>) -> Self {
        self.definitions.push(PendingDefinition {
            name: name.into(),
            symbol: None,
            definition: definition.into(),
        });
        self
    }

    /// Queue a custom unit with a symbol
    pub fn define_with_symbol(
        mut self,
        name: impl Into<String>,
        symbol: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        self.definitions.push(PendingDefinition {
            name: name.into(),
            symbol: Some(symbol.into()),
            definition: definition.into(),
        });
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the catalog, registering queued units in order
    pub fn build(self, event_handler: Arc<dyn CatalogEventHandler>) -> Result<UnitCatalog, String> {
        let catalog = create_from_config(self.config, event_handler)?;
        for pending in &self.definitions {
            let registered = match &pending.symbol {
                Some(symbol) => {
                    catalog.define_with_symbol(&pending.name, symbol, &pending.definition)
                },
                None => catalog.define(&pending.name, &pending.definition),
            };
            registered.map_err(|e| e.to_string())?;
        }
        Ok(catalog)
    }

    /// Get the configuration without building (for inspection)
    pub fn get_config(&self) -> &CatalogConfig {
        &self.config
    }
}

impl Default for UnitCatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}
