use graymorph_image::{ImageError, RowRange};

use crate::parallel::ParallelError;

/// Errors related to morphological operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MorphologyError {
    /// The structuring element has a zero dimension.
    #[error("structuring element must be non-empty, got {0}x{1}")]
    EmptyKernel(usize, usize),

    /// The mask length does not match the structuring element size.
    #[error("mask length ({0}) does not match the structuring element size ({1})")]
    MaskSizeMismatch(usize, usize),

    /// All elements in the mask are inactive.
    #[error("structuring element has no active cells")]
    AllKernelElementsInactive,

    /// The output band does not belong to an image of the source size.
    #[error("output band {range:?} with {cols} columns does not fit a {src_cols}x{src_rows} source")]
    BandMismatch {
        /// Rows of the band.
        range: RowRange,
        /// Columns of the band.
        cols: usize,
        /// Columns of the source image.
        src_cols: usize,
        /// Rows of the source image.
        src_rows: usize,
    },

    /// Invalid image layout or size.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The execution strategy could not run.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
