/// An error type for the image containers.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the image has zero width or height.
    #[error("Image must be non-empty, got {0}x{1}")]
    EmptyImage(usize, usize),

    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the row stride cannot hold a full row of pixels.
    #[error("Row stride ({0}) is smaller than the row length ({1})")]
    InvalidStride(usize, usize),

    /// Error when the buffer is too short for the requested layout.
    #[error("Buffer length ({0}) is too small for the image layout, expected at least {1}")]
    InvalidBufferLength(usize, usize),

    /// Error when two images that must agree in size do not.
    #[error("Image size mismatch ({0}x{1} vs {2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} is out of bounds for {1} channels")]
    InvalidChannelIndex(usize, usize),

    /// Error when the pixel coordinate is out of bounds.
    #[error("Pixel ({0}, {1}) is out of bounds")]
    PixelIndexOutOfBounds(usize, usize),

    /// Error when a row range does not fit the image.
    #[error("Row range {0}..{1} is out of bounds for {2} rows")]
    InvalidRowRange(usize, usize, usize),

    /// Error when bands are requested with a zero height.
    #[error("Band height must be > 0")]
    InvalidBandHeight,
}
