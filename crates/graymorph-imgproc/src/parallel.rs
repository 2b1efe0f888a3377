use rayon::prelude::*;
use thiserror::Error;

use graymorph_image::{ImageError, ImageViewMut, RowBandMut, RowRange};

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The band height for AutoRows must be valid.
    #[error("band height must be > 0 for AutoRows strategy, got {0}")]
    InvalidBandHeight(usize),
}

/// Controls how the output rows of an operation are split into bands and run.
///
/// Every strategy produces the same output; only scheduling differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool with one band per output row.
    #[default]
    ParallelRows,

    /// Use the global Rayon thread pool with bands of the given number of rows.
    ///
    /// Taller bands amortize per-band setup at the cost of coarser load balancing.
    AutoRows(usize),

    /// Run sequentially on the current thread as a single band.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads, one band per thread.
    ///
    /// Band heights differ by at most one row.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

/// Split `dst` into disjoint row bands and apply `f` to each of them.
///
/// Bands never overlap and together cover every row of `dst`, so `f` can write
/// its band without synchronisation. The first error returned by `f` aborts the
/// remaining work.
///
/// # Arguments
///
/// * `dst` - The destination view to split.
/// * `strategy` - How bands are sized and scheduled.
/// * `f` - The per-band operation.
pub fn par_iter_bands<T, const C: usize, E>(
    dst: &mut ImageViewMut<'_, T, C>,
    strategy: ExecutionStrategy,
    f: impl Fn(RowBandMut<'_, T, C>) -> Result<(), E> + Send + Sync,
) -> Result<(), E>
where
    T: Send + Sync,
    E: From<ParallelError> + From<ImageError> + Send,
{
    match strategy {
        ExecutionStrategy::Serial => f(dst.band(RowRange::full(dst.rows()))?),
        ExecutionStrategy::ParallelRows => dst.bands(1)?.into_par_iter().try_for_each(&f),
        ExecutionStrategy::AutoRows(band_rows) => {
            if band_rows == 0 {
                return Err(ParallelError::InvalidBandHeight(band_rows).into());
            }
            dst.bands(band_rows)?.into_par_iter().try_for_each(&f)
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n).into());
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            let bands = dst.split_rows(n);
            log::debug!("running {} bands on a local pool of {n} threads", bands.len());
            pool.install(|| bands.into_par_iter().try_for_each(&f))
        }
    }
}
