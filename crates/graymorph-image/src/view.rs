use crate::band::{RowBandMut, RowRange};
use crate::error::ImageError;
use crate::image::{validate_layout, ImageSize};

/// A non-owning, read-only view into strided image data.
///
/// The view borrows a buffer holding `height` rows that start `stride`
/// elements apart. Each row holds `width * C` interleaved elements followed by
/// optional padding.
///
/// # Examples
///
/// ```
/// use graymorph_image::{ImageSize, ImageView};
///
/// // 2x2 single channel image with one padding element per row
/// let data = [1u8, 2, 0, 3, 4];
/// let view = ImageView::<u8, 1>::new(ImageSize { width: 2, height: 2 }, 3, &data).unwrap();
///
/// assert_eq!(view.row(1), &[3, 4]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a, T, const C: usize> {
    pub(crate) data: &'a [T],
    pub(crate) size: ImageSize,
    pub(crate) stride: usize,
}

impl<'a, T, const C: usize> ImageView<'a, T, C> {
    /// Create a view over `data`.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `stride` - Elements between the start of two consecutive rows.
    /// * `data` - The borrowed buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the image is empty, the stride is shorter than a row
    /// or the buffer cannot hold all rows.
    pub fn new(size: ImageSize, stride: usize, data: &'a [T]) -> Result<Self, ImageError> {
        validate_layout::<C>(size, stride, data.len())?;
        Ok(Self { data, size, stride })
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

    /// The pixels of row `y`, without row padding.
    ///
    /// # Panics
    ///
    /// Panics if `y` is out of bounds.
    #[inline]
    pub fn row(&self, y: usize) -> &'a [T] {
        let start = y * self.stride;
        &self.data[start..start + self.size.width * C]
    }
}

/// A non-owning, writable view into strided image data.
///
/// Disjoint row bands can be split off with [`ImageViewMut::band`],
/// [`ImageViewMut::split_at_row`], [`ImageViewMut::split_rows`] or
/// [`ImageViewMut::bands`] and handed to different workers.
#[derive(Debug)]
pub struct ImageViewMut<'a, T, const C: usize> {
    pub(crate) data: &'a mut [T],
    pub(crate) size: ImageSize,
    pub(crate) stride: usize,
}

impl<'a, T, const C: usize> ImageViewMut<'a, T, C> {
    /// Create a writable view over `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the image is empty, the stride is shorter than a row
    /// or the buffer cannot hold all rows.
    pub fn new(size: ImageSize, stride: usize, data: &'a mut [T]) -> Result<Self, ImageError> {
        validate_layout::<C>(size, stride, data.len())?;
        Ok(Self { data, size, stride })
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

    fn band_from(&mut self, range: RowRange) -> RowBandMut<'_, T, C> {
        // the last row carries no padding, so an empty band at the end starts past the buffer
        let lo = (range.start * self.stride).min(self.data.len());
        let hi = if range.is_empty() {
            lo
        } else {
            (range.end - 1) * self.stride + self.size.width * C
        };
        RowBandMut {
            data: &mut self.data[lo..hi],
            range,
            cols: self.size.width,
            stride: self.stride,
        }
    }

    /// Borrow the rows in `range` as a band.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is reversed or exceeds the image rows.
    pub fn band(&mut self, range: RowRange) -> Result<RowBandMut<'_, T, C>, ImageError> {
        if range.start > range.end || range.end > self.size.height {
            return Err(ImageError::InvalidRowRange(
                range.start,
                range.end,
                self.size.height,
            ));
        }
        Ok(self.band_from(range))
    }

    /// Split the view into the bands `[0, mid)` and `[mid, rows)`.
    ///
    /// # Errors
    ///
    /// Returns an error if `mid` exceeds the image rows.
    pub fn split_at_row(
        &mut self,
        mid: usize,
    ) -> Result<(RowBandMut<'_, T, C>, RowBandMut<'_, T, C>), ImageError> {
        let rows = self.size.height;
        if mid > rows {
            return Err(ImageError::InvalidRowRange(mid, rows, rows));
        }

        let (cols, stride) = (self.size.width, self.stride);
        let (top, bottom) = self.data.split_at_mut((mid * stride).min(self.data.len()));
        Ok((
            RowBandMut {
                data: top,
                range: RowRange::new(0, mid),
                cols,
                stride,
            },
            RowBandMut {
                data: bottom,
                range: RowRange::new(mid, rows),
                cols,
                stride,
            },
        ))
    }

    /// Split the view into `parts` disjoint bands whose heights differ by at most one row.
    ///
    /// Fewer bands are returned when the image has fewer rows than `parts`,
    /// and a zero count is treated as one.
    pub fn split_rows(&mut self, parts: usize) -> Vec<RowBandMut<'_, T, C>> {
        let (cols, stride) = (self.size.width, self.stride);
        let mut rest: &mut [T] = &mut self.data[..];
        let mut bands = Vec::new();
        for range in RowRange::split(self.size.height, parts) {
            let take = (range.len() * stride).min(rest.len());
            let (data, tail) = std::mem::take(&mut rest).split_at_mut(take);
            bands.push(RowBandMut {
                data,
                range,
                cols,
                stride,
            });
            rest = tail;
        }
        bands
    }

    /// Split the view into consecutive disjoint bands of `band_rows` rows.
    ///
    /// # Errors
    ///
    /// Returns an error if `band_rows` is zero.
    pub fn bands(&mut self, band_rows: usize) -> Result<Vec<RowBandMut<'_, T, C>>, ImageError> {
        if band_rows == 0 {
            return Err(ImageError::InvalidBandHeight);
        }

        let (rows, cols, stride) = (self.size.height, self.size.width, self.stride);
        Ok(self
            .data
            .chunks_mut(band_rows * stride)
            .zip(RowRange::bands(rows, band_rows))
            .map(|(data, range)| RowBandMut {
                data,
                range,
                cols,
                stride,
            })
            .collect())
    }
}
