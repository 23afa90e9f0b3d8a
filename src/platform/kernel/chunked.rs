// ============================================================================
// Chunked Kernel
// Splits long arrays into contiguous chunks processed on scoped threads
// ============================================================================

use super::traits::ArrayKernel;

/// Parallel implementation over `crossbeam` scoped threads.
///
/// Each worker owns a disjoint output chunk, so no synchronization is
/// needed beyond the scope join.
#[derive(Debug, Clone, Copy)]
pub struct ChunkedKernel {
    workers: usize,
}

impl ChunkedKernel {
    /// Create a kernel using `workers` threads (at least one).
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    fn chunk_len(&self, len: usize) -> usize {
        len.div_ceil(self.workers).max(1)
    }
}

impl ArrayKernel for ChunkedKernel {
    fn map(&self, values: &[f64], op: &(dyn Fn(f64) -> f64 + Sync)) -> Vec<f64> {
        let mut out = vec![0.0; values.len()];
        let chunk = self.chunk_len(values.len());

        crossbeam::thread::scope(|s| {
            for (src, dst) in values.chunks(chunk).zip(out.chunks_mut(chunk)) {
                s.spawn(move |_| {
                    for (d, &v) in dst.iter_mut().zip(src) {
                        *d = op(v);
                    }
                });
            }
        })
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic));

        out
    }

    fn zip(&self, lhs: &[f64], rhs: &[f64], op: &(dyn Fn(f64, f64) -> f64 + Sync)) -> Vec<f64> {
        let mut out = vec![0.0; lhs.len().min(rhs.len())];
        let chunk = self.chunk_len(out.len());

        crossbeam::thread::scope(|s| {
            for ((a, b), dst) in lhs.chunks(chunk).zip(rhs.chunks(chunk)).zip(out.chunks_mut(chunk)) {
                s.spawn(move |_| {
                    for ((d, &x), &y) in dst.iter_mut().zip(a).zip(b) {
                        *d = op(x, y);
                    }
                });
            }
        })
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic));

        out
    }

    fn name(&self) -> &'static str {
        "Chunked"
    }
}
