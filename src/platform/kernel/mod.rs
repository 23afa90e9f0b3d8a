// ============================================================================
// Array Kernels
// Elementwise execution strategies for array magnitudes
//
// - Scalar: sequential loop, used for short arrays
// - Chunked: contiguous chunks on crossbeam scoped threads
// ============================================================================

mod chunked;
mod detector;
mod scalar;
mod traits;

pub use chunked::ChunkedKernel;
pub use detector::{scalar_kernel, select_kernel, KernelCapabilities};
pub use scalar::ScalarKernel;
pub use traits::ArrayKernel;
