use crate::error::ImageError;
use crate::view::{ImageView, ImageViewMut};

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use graymorph_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Trait for image element types.
///
/// Send and Sync is required to hand rows to worker threads.
pub trait ImageDtype: Copy + Default + Into<f32> + Send + Sync + 'static {
    /// Convert a f32 value to the image data type.
    fn from_f32(x: f32) -> Self;
}

impl ImageDtype for f32 {
    fn from_f32(x: f32) -> Self {
        x
    }
}

impl ImageDtype for u8 {
    fn from_f32(x: f32) -> Self {
        x.round().clamp(0.0, 255.0) as u8
    }
}

/// Checks that a buffer of `len` elements can hold `size` pixels of `C`
/// channels laid out with `stride` elements per row.
pub(crate) fn validate_layout<const C: usize>(
    size: ImageSize,
    stride: usize,
    len: usize,
) -> Result<(), ImageError> {
    if size.width == 0 || size.height == 0 || C == 0 {
        return Err(ImageError::EmptyImage(size.width, size.height));
    }

    let row_len = size.width * C;
    if stride < row_len {
        return Err(ImageError::InvalidStride(stride, row_len));
    }

    // the last row does not need to carry its padding
    let required = (size.height - 1) * stride + row_len;
    if len < required {
        return Err(ImageError::InvalidBufferLength(len, required));
    }

    Ok(())
}

/// Represents an owned image with interleaved pixel data.
///
/// Rows are `stride` elements apart, which allows padded rows. The pixel `(x, y)`
/// channel `c` lives at `y * stride + x * CHANNELS + c`.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const CHANNELS: usize> {
    data: Vec<T>,
    size: ImageSize,
    stride: usize,
}

impl<T, const CHANNELS: usize> Image<T, CHANNELS> {
    /// Create a new image from contiguous pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use graymorph_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![0u8; 10 * 20 * 3],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        let expected = size.width * size.height * CHANNELS;
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }
        validate_layout::<CHANNELS>(size, size.width * CHANNELS, data.len())?;

        Ok(Self {
            data,
            size,
            stride: size.width * CHANNELS,
        })
    }

    /// Create a new image whose rows are `stride` elements apart.
    ///
    /// # Errors
    ///
    /// Returns an error if the stride is shorter than a row or the buffer is too small.
    pub fn with_stride(size: ImageSize, stride: usize, data: Vec<T>) -> Result<Self, ImageError> {
        validate_layout::<CHANNELS>(size, stride, data.len())?;
        Ok(Self { data, size, stride })
    }

    /// Create a new image with the given size and default pixel data.
    ///
    /// # Examples
    ///
    /// ```
    /// use graymorph_image::{Image, ImageSize};
    ///
    /// let image = Image::<f32, 4>::from_size_val(
    ///     ImageSize {
    ///         width: 4,
    ///         height: 2,
    ///     },
    ///     1.5,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(image.as_slice().len(), 4 * 2 * 4);
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; size.width * size.height * CHANNELS];
        Image::new(size, data)
    }

    /// The size of the image in pixels.
    #[inline]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// The number of rows of the image.
    #[inline]
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// The number of columns of the image.
    #[inline]
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// The width of the image.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// The height of the image.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Elements between the start of two consecutive rows.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The number of channels of the image.
    pub fn num_channels(&self) -> usize {
        CHANNELS
    }

    /// The raw buffer, including row padding.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Borrow the image as a read-only strided view.
    pub fn view(&self) -> ImageView<'_, T, CHANNELS> {
        ImageView {
            data: &self.data,
            size: self.size,
            stride: self.stride,
        }
    }

    /// Borrow the image as a writable strided view.
    pub fn view_mut(&mut self) -> ImageViewMut<'_, T, CHANNELS> {
        ImageViewMut {
            data: &mut self.data,
            size: self.size,
            stride: self.stride,
        }
    }

    fn offset(&self, x: usize, y: usize, ch: usize) -> Result<usize, ImageError> {
        if x >= self.size.width || y >= self.size.height {
            return Err(ImageError::PixelIndexOutOfBounds(x, y));
        }
        if ch >= CHANNELS {
            return Err(ImageError::InvalidChannelIndex(ch, CHANNELS));
        }
        Ok(y * self.stride + x * CHANNELS + ch)
    }

    /// Get the value of a pixel channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate or the channel is out of bounds.
    pub fn get_pixel(&self, x: usize, y: usize, ch: usize) -> Result<T, ImageError>
    where
        T: Copy,
    {
        let idx = self.offset(x, y, ch)?;
        Ok(self.data[idx])
    }

    /// Set the value of a pixel channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate or the channel is out of bounds.
    pub fn set_pixel(&mut self, x: usize, y: usize, ch: usize, val: T) -> Result<(), ImageError> {
        let idx = self.offset(x, y, ch)?;
        self.data[idx] = val;
        Ok(())
    }

    /// Extract one channel as a contiguous single channel image.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel index is out of bounds.
    pub fn channel(&self, ch: usize) -> Result<Image<T, 1>, ImageError>
    where
        T: Copy,
    {
        if ch >= CHANNELS {
            return Err(ImageError::InvalidChannelIndex(ch, CHANNELS));
        }

        let view = self.view();
        let data = (0..self.rows())
            .flat_map(|y| view.row(y).chunks_exact(CHANNELS).map(move |px| px[ch]))
            .collect();

        Image::new(self.size, data)
    }
}
