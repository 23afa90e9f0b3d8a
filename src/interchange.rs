// ============================================================================
// Interchange Format
// (magnitude, unit string) records and their JSON encoding
// ============================================================================

use crate::domain::errors::{UnitError, UnitResult};
use crate::domain::magnitude::Magnitude;
use crate::domain::quantity::Quantity;
use crate::engine::UnitCatalog;
use serde::{Deserialize, Serialize};

/// Serialized form of a quantity: `{"magnitude": 1.5, "unit": "meter"}` or
/// `{"magnitude": [1, 2], "unit": "meter / second"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityRecord {
    pub magnitude: Magnitude,
    pub unit: String,
}

/// Record carrying the canonical unit name.
pub fn to_record(quantity: &Quantity) -> QuantityRecord {
    QuantityRecord {
        magnitude: quantity.magnitude().clone(),
        unit: quantity.unit().name().to_string(),
    }
}

/// Rebuild a quantity by re-parsing the record's unit in `catalog`.
pub fn from_record(record: QuantityRecord, catalog: &UnitCatalog) -> UnitResult<Quantity> {
    catalog.quantity(record.magnitude, &record.unit)
}

pub fn to_json(quantity: &Quantity) -> UnitResult<String> {
    serde_json::to_string(&to_record(quantity)).map_err(interchange_error)
}

/// # Errors
/// `Interchange` when `json` is not a record; any parse or value error of
/// its contents.
pub fn from_json(json: &str, catalog: &UnitCatalog) -> UnitResult<Quantity> {
    let record: QuantityRecord = serde_json::from_str(json).map_err(interchange_error)?;
    from_record(record, catalog)
}

fn interchange_error(err: serde_json::Error) -> UnitError {
    UnitError::Interchange {
        reason: err.to_string(),
    }
}
