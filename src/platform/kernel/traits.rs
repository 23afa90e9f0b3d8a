// ============================================================================
// Array Kernel Trait
// Abstract interface for elementwise work over array magnitudes
// ============================================================================

/// Elementwise transform over `f64` slices.
///
/// Implementations must preserve length and order, and must not let one
/// element's result depend on another's.
///
/// # Thread Safety
/// All implementations must be `Send + Sync`; the same kernel instance is
/// shared by every catalog and quantity in the process.
pub trait ArrayKernel: Send + Sync {
    /// Apply `op` to every element.
    fn map(&self, values: &[f64], op: &(dyn Fn(f64) -> f64 + Sync)) -> Vec<f64>;

    /// Apply `op` pairwise. Callers guarantee `lhs.len() == rhs.len()`.
    fn zip(&self, lhs: &[f64], rhs: &[f64], op: &(dyn Fn(f64, f64) -> f64 + Sync)) -> Vec<f64>;

    /// Get the name of this kernel.
    ///
    /// Used for logging and benchmarking.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockKernel;

    impl ArrayKernel for MockKernel {
        fn map(&self, values: &[f64], op: &(dyn Fn(f64) -> f64 + Sync)) -> Vec<f64> {
            values.iter().map(|&v| op(v)).collect()
        }

        fn zip(&self, lhs: &[f64], rhs: &[f64], op: &(dyn Fn(f64, f64) -> f64 + Sync)) -> Vec<f64> {
            lhs.iter().zip(rhs).map(|(&a, &b)| op(a, b)).collect()
        }

        fn name(&self) -> &'static str {
            "Mock"
        }
    }

    #[test]
    fn test_trait_can_be_implemented() {
        let kernel = MockKernel;
        assert_eq!(kernel.name(), "Mock");
        assert_eq!(kernel.map(&[1.0, 2.0], &|v| v * 2.0), vec![2.0, 4.0]);
        assert_eq!(kernel.zip(&[1.0, 2.0], &[3.0, 4.0], &|a, b| a + b), vec![4.0, 6.0]);
    }
}
