// ============================================================================
// Scalar Kernel
// Single-threaded fallback used for short arrays
// ============================================================================

use super::traits::ArrayKernel;

/// Sequential implementation; works everywhere and is the default below
/// the parallel threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarKernel;

impl ScalarKernel {
    pub fn new() -> Self {
        Self
    }
}

impl ArrayKernel for ScalarKernel {
    fn map(&self, values: &[f64], op: &(dyn Fn(f64) -> f64 + Sync)) -> Vec<f64> {
        values.iter().map(|&v| op(v)).collect()
    }

    fn zip(&self, lhs: &[f64], rhs: &[f64], op: &(dyn Fn(f64, f64) -> f64 + Sync)) -> Vec<f64> {
        lhs.iter().zip(rhs).map(|(&a, &b)| op(a, b)).collect()
    }

    fn name(&self) -> &'static str {
        "Scalar"
    }
}
