#![deny(missing_docs)]
//! Image types for the graymorph morphology engine: owned images, strided
//! views and the row bands used to split work across threads.

/// Row ranges and writable row bands.
pub mod band;

/// Error types for the image module.
pub mod error;

/// Owned image representation.
pub mod image;

/// Borrowed strided views.
pub mod view;

pub use crate::band::{RowBandMut, RowRange};
pub use crate::error::ImageError;
pub use crate::image::{Image, ImageDtype, ImageSize};
pub use crate::view::{ImageView, ImageViewMut};
