// ============================================================================
// Platform Module
// Host-specific execution of elementwise array work
//
// Usage:
// ```ignore
// use unit_engine::platform::{select_kernel, ArrayKernel};
// let kernel = select_kernel(values.len(), 1 << 16);
// let scaled = kernel.map(&values, &|v| v * 1000.0);
// ```
// ============================================================================

pub mod kernel;

pub use kernel::{
    scalar_kernel, select_kernel, ArrayKernel, ChunkedKernel, KernelCapabilities, ScalarKernel,
};
