// ============================================================================
// Batch Operations
// Conversion and reductions over slices of quantities
// ============================================================================

use crate::domain::errors::{UnitError, UnitResult};
use crate::domain::quantity::Quantity;
use crate::engine::catalog::UnitCatalog;
use std::cmp::Ordering;

/// Convert every quantity into `target`, parsed once.
///
/// Fails on the first incompatible quantity; nothing partial is returned.
pub fn convert_all(
    quantities: &[Quantity],
    target: &str,
    catalog: &UnitCatalog,
) -> UnitResult<Vec<Quantity>> {
    let target = catalog.parse(target)?;
    quantities.iter().map(|q| q.to_unit(&target)).collect()
}

/// Sum in the unit of the first quantity.
pub fn sum(quantities: &[Quantity]) -> UnitResult<Quantity> {
    let (first, rest) = split_first(quantities, "sum")?;
    rest.iter().try_fold(first.clone(), |acc, q| acc.try_add(q))
}

/// Arithmetic mean in the unit of the first quantity.
pub fn mean(quantities: &[Quantity]) -> UnitResult<Quantity> {
    sum(quantities)?.div_scalar(quantities.len() as f64)
}

/// Smallest quantity, kept in its own unit.
pub fn min(quantities: &[Quantity]) -> UnitResult<Quantity> {
    extreme(quantities, "min", Ordering::Less)
}

/// Largest quantity, kept in its own unit.
pub fn max(quantities: &[Quantity]) -> UnitResult<Quantity> {
    extreme(quantities, "max", Ordering::Greater)
}

fn extreme(quantities: &[Quantity], operation: &'static str, wanted: Ordering) -> UnitResult<Quantity> {
    let (first, rest) = split_first(quantities, operation)?;
    let mut best = first;
    for candidate in rest {
        if candidate.try_cmp(best)? == wanted {
            best = candidate;
        }
    }
    Ok(best.clone())
}

fn split_first<'a>(
    quantities: &'a [Quantity],
    operation: &'static str,
) -> UnitResult<(&'a Quantity, &'a [Quantity])> {
    quantities
        .split_first()
        .ok_or_else(|| UnitError::operation(operation, "no quantities given"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;

    fn lengths(catalog: &UnitCatalog) -> Vec<Quantity> {
        vec![
            catalog.quantity(100.0, "meter").unwrap(),
            catalog.quantity(1.0, "kilometer").unwrap(),
            catalog.quantity(50.0, "foot").unwrap(),
        ]
    }

    #[test]
    fn test_convert_all() {
        let catalog = UnitCatalog::new();
        let converted = convert_all(&lengths(&catalog), "meter", &catalog).unwrap();

        assert_eq!(converted.len(), 3);
        assert!(converted.iter().all(|q| q.unit().name() == "meter"));
        assert_eq!(converted[1].value(), Some(1000.0));
        assert!((converted[2].value().unwrap() - 15.24).abs() < 1e-9);
    }

    #[test]
    fn test_convert_all_fails_on_mismatch() {
        let catalog = UnitCatalog::new();
        let mut quantities = lengths(&catalog);
        quantities.push(catalog.quantity(3.0, "second").unwrap());
        let err = convert_all(&quantities, "meter", &catalog).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Dimensionality);
    }

    #[test]
    fn test_sum_and_mean() {
        let catalog = UnitCatalog::new();
        let quantities = vec![
            catalog.quantity(100.0, "meter").unwrap(),
            catalog.quantity(200.0, "meter").unwrap(),
            catalog.quantity(300.0, "meter").unwrap(),
        ];
        assert_eq!(sum(&quantities).unwrap().value(), Some(600.0));
        assert_eq!(mean(&quantities).unwrap().value(), Some(200.0));
    }

    #[test]
    fn test_sum_uses_first_unit() {
        let catalog = UnitCatalog::new();
        let total = sum(&lengths(&catalog)).unwrap();
        assert_eq!(total.unit().name(), "meter");
        assert!((total.value().unwrap() - 1115.24).abs() < 1e-9);
    }

    #[test]
    fn test_min_max_keep_own_unit() {
        let catalog = UnitCatalog::new();
        let quantities = lengths(&catalog);

        let smallest = min(&quantities).unwrap();
        assert_eq!(smallest.unit().name(), "foot");
        assert_eq!(smallest.value(), Some(50.0));

        let largest = max(&quantities).unwrap();
        assert_eq!(largest.unit().name(), "kilometer");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sum(&[]).unwrap_err().kind(), ErrorKind::Operation);
        assert_eq!(mean(&[]).unwrap_err().kind(), ErrorKind::Operation);
        assert_eq!(max(&[]).unwrap_err().kind(), ErrorKind::Operation);
    }
}
