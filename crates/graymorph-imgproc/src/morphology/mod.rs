// Morphological image processing operations.
/// Border resolution for out-of-image reads.
pub mod border;
pub use border::BorderType;

/// Error types used for morphological operations.
pub mod error;
pub use error::MorphologyError;

/// Structuring element utilities.
pub mod kernels;
pub use kernels::{KernelOffset, KernelShape, StructuringElement};

mod filter;
mod ops;

/// Band-level filters and the reduction traits they are generic over:
/// - `dilate_band` / `erode_band`: compute one disjoint output band.
/// - `dilate_rows` / `erode_rows`: compute a row range of a destination view.
pub use filter::{
    default_border_value, dilate_band, dilate_rows, erode_band, erode_rows, Dilate, Erode,
    MorphOp, MorphPixel,
};

/// Whole-image operations scheduled by an [`ExecutionStrategy`](crate::parallel::ExecutionStrategy).
pub use ops::{close, dilate, erode, open};
