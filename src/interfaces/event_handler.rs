// ============================================================================
// Event Handler Interface
// Defines the contract for observing catalog activity
// ============================================================================

use crate::domain::config::UnitSystem;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted by the unit catalog
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CatalogEvent {
    /// Custom unit or binary multiple added to the catalog
    UnitRegistered {
        name: String,
        symbol: Option<String>,
        factor: f64,
    },

    /// New spelling attached to an existing unit
    AliasRegistered { alias: String, target: String },

    /// Parse served from the cache
    CacheHit { key: String },

    /// Parse had to resolve the expression
    CacheMiss { key: String },

    /// Cache reached its configured capacity; later entries are not stored
    CacheFull { capacity: usize },

    /// Parse or resolution failed
    ParseFailed { input: String, reason: String },

    /// Default unit system replaced
    DefaultSystemChanged {
        previous: UnitSystem,
        current: UnitSystem,
    },
}

/// Event handler trait for processing catalog events
/// Implementations can handle logging, metrics, auditing, etc.
pub trait CatalogEventHandler: Send + Sync {
    /// Handle a catalog event
    fn on_event(&self, event: CatalogEvent);

    /// Batch event handler. Registrations that add several units at once
    /// arrive here as one batch.
    fn on_events(&self, events: Vec<CatalogEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl CatalogEventHandler for NoOpEventHandler {
    fn on_event(&self, _event: CatalogEvent) {
        // Do nothing
    }
}

/// Logging event handler
pub struct LoggingEventHandler;

impl CatalogEventHandler for LoggingEventHandler {
    fn on_event(&self, event: CatalogEvent) {
        tracing::debug!("Unit catalog event: {:?}", event);
    }
}
