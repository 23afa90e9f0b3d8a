// ============================================================================
// Kernel Detection and Selection
// Runtime detection of available parallelism and per-call kernel choice
// ============================================================================

use super::chunked::ChunkedKernel;
use super::scalar::ScalarKernel;
use super::traits::ArrayKernel;
use std::sync::LazyLock;

/// Detected host capabilities relevant to array kernels.
#[derive(Debug, Clone, Copy)]
pub struct KernelCapabilities {
    /// Threads the OS reports as usable by this process
    pub available_threads: usize,
}

impl KernelCapabilities {
    /// Detect capabilities at runtime. Falls back to one thread when the
    /// platform cannot report parallelism.
    pub fn detect() -> Self {
        Self {
            available_threads: std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }

    /// Whether splitting work across threads can help at all.
    pub fn supports_parallel(&self) -> bool {
        self.available_threads > 1
    }
}

impl std::fmt::Display for KernelCapabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} available thread(s)", self.available_threads)
    }
}

static CAPABILITIES: LazyLock<KernelCapabilities> = LazyLock::new(KernelCapabilities::detect);
static SCALAR: ScalarKernel = ScalarKernel;
static CHUNKED: LazyLock<ChunkedKernel> =
    LazyLock::new(|| ChunkedKernel::new(CAPABILITIES.available_threads));

/// Pick the kernel for an array of `len` elements.
///
/// Arrays shorter than `threshold` (or any array on a single-threaded host)
/// use [`ScalarKernel`]; the rest use the shared [`ChunkedKernel`].
pub fn select_kernel(len: usize, threshold: usize) -> &'static dyn ArrayKernel {
    if len >= threshold && CAPABILITIES.supports_parallel() {
        &*CHUNKED
    } else {
        &SCALAR
    }
}

/// The sequential kernel (for testing or comparison).
pub fn scalar_kernel() -> &'static dyn ArrayKernel {
    &SCALAR
}
