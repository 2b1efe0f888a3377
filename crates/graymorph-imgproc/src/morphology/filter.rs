use graymorph_image::{ImageDtype, ImageView, ImageViewMut, RowBandMut, RowRange};
use num_traits::Bounded;

use super::{BorderType, KernelOffset, MorphologyError, StructuringElement};

/// Pixel element types the morphology engine runs on.
///
/// Comparison follows [`PartialOrd`]: integer order for `u8` and IEEE order
/// for `f32`. NaN inputs give an unspecified result.
pub trait MorphPixel: ImageDtype + PartialOrd + Bounded {}

impl<T: ImageDtype + PartialOrd + Bounded> MorphPixel for T {}

/// The reduction applied over a neighbourhood.
pub trait MorphOp: Send + Sync + 'static {
    /// Name of the operation, for logging.
    const NAME: &'static str;

    /// Fold `value` into the running result `acc`.
    fn combine<T: PartialOrd>(acc: T, value: T) -> T;

    /// The value that never wins the fold.
    fn neutral<T: Bounded>() -> T;
}

/// Dilation: the neighbourhood maximum.
#[derive(Debug, Clone, Copy)]
pub struct Dilate;

/// Erosion: the neighbourhood minimum.
#[derive(Debug, Clone, Copy)]
pub struct Erode;

impl MorphOp for Dilate {
    const NAME: &'static str = "dilate";

    #[inline(always)]
    fn combine<T: PartialOrd>(acc: T, value: T) -> T {
        if value > acc {
            value
        } else {
            acc
        }
    }

    fn neutral<T: Bounded>() -> T {
        T::min_value()
    }
}

impl MorphOp for Erode {
    const NAME: &'static str = "erode";

    #[inline(always)]
    fn combine<T: PartialOrd>(acc: T, value: T) -> T {
        if value < acc {
            value
        } else {
            acc
        }
    }

    fn neutral<T: Bounded>() -> T {
        T::max_value()
    }
}

/// The constant border value that never affects the result of `Op`.
///
/// With [`BorderType::Constant`] this makes out-of-image cells behave as if they
/// were skipped: the lowest value for dilation and the highest for erosion.
///
/// # Example
///
/// ```
/// use graymorph_imgproc::morphology::{default_border_value, Dilate, Erode};
///
/// assert_eq!(default_border_value::<Dilate, u8>(), 0);
/// assert_eq!(default_border_value::<Erode, u8>(), 255);
/// ```
pub fn default_border_value<Op: MorphOp, T: MorphPixel>() -> T {
    Op::neutral::<T>()
}

// The source pixel read by one kernel cell, or the border pixel.
#[inline(always)]
fn sample<'s, T, const C: usize>(
    rows: &[Option<&'s [T]>],
    fill: &'s [T; C],
    off: &KernelOffset,
    x: usize,
    cols: usize,
    border: BorderType,
) -> &'s [T] {
    match (rows[off.row], border.resolve(x as isize + off.dx, cols)) {
        (Some(row), Some(sx)) => &row[sx * C..sx * C + C],
        _ => fill,
    }
}

/// Run `Op` over one output band.
///
/// The band is computed from `src` alone, so bands may be produced in any
/// order or concurrently. Scratch is one resolved source row per kernel row.
pub(crate) fn filter_band<Op: MorphOp, T: MorphPixel, const C: usize>(
    src: &ImageView<'_, T, C>,
    mut dst: RowBandMut<'_, T, C>,
    kernel: &StructuringElement,
    border: BorderType,
    border_value: T,
) -> Result<(), MorphologyError> {
    let range = dst.range();
    if dst.cols() != src.cols() || range.end > src.rows() {
        return Err(MorphologyError::BandMismatch {
            range,
            cols: dst.cols(),
            src_cols: src.cols(),
            src_rows: src.rows(),
        });
    }

    let Some((first, rest)) = kernel.neighborhood().split_first() else {
        return Err(MorphologyError::AllKernelElementsInactive);
    };

    let (rows, cols) = (src.rows(), src.cols());
    let (_, anchor_y) = kernel.anchor();
    let fill = [border_value; C];
    let mut src_rows: Vec<Option<&[T]>> = vec![None; kernel.height()];

    for (y, out_row) in dst.rows_mut() {
        // resolve the source row of every kernel row once per output row
        for (ky, slot) in src_rows.iter_mut().enumerate() {
            let sy = y as isize + ky as isize - anchor_y as isize;
            *slot = border.resolve(sy, rows).map(|r| src.row(r));
        }

        for (x, out_px) in out_row.chunks_exact_mut(C).enumerate() {
            out_px.copy_from_slice(sample(&src_rows, &fill, first, x, cols, border));
            for off in rest {
                let px = sample(&src_rows, &fill, off, x, cols, border);
                for (acc, &v) in out_px.iter_mut().zip(px) {
                    *acc = Op::combine(*acc, v);
                }
            }
        }
    }

    Ok(())
}

fn filter_rows<Op: MorphOp, T: MorphPixel, const C: usize>(
    src: &ImageView<'_, T, C>,
    dst: &mut ImageViewMut<'_, T, C>,
    range: RowRange,
    kernel: &StructuringElement,
    border: BorderType,
    border_value: T,
) -> Result<(), MorphologyError> {
    if src.size() != dst.size() {
        return Err(graymorph_image::ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        )
        .into());
    }
    filter_band::<Op, T, C>(src, dst.band(range)?, kernel, border, border_value)
}

/// Dilate the rows of one output band.
///
/// Every output pixel of the band becomes the per-channel maximum of the source
/// pixels under the structuring element, with out-of-image reads resolved by
/// `border`. The band may belong to any destination whose size equals `src`.
///
/// # Arguments
///
/// * `src` - The source image view.
/// * `dst` - The output band, split off the destination view.
/// * `kernel` - The structuring element.
/// * `border` - The border handling mode.
/// * `border_value` - The value of every channel of out-of-image pixels for [`BorderType::Constant`].
///
/// # Errors
///
/// Returns an error if the band does not fit the source image.
pub fn dilate_band<T: MorphPixel, const C: usize>(
    src: &ImageView<'_, T, C>,
    dst: RowBandMut<'_, T, C>,
    kernel: &StructuringElement,
    border: BorderType,
    border_value: T,
) -> Result<(), MorphologyError> {
    filter_band::<Dilate, T, C>(src, dst, kernel, border, border_value)
}

/// Erode the rows of one output band.
///
/// Every output pixel of the band becomes the per-channel minimum of the source
/// pixels under the structuring element. See [`dilate_band`] for the arguments.
///
/// # Errors
///
/// Returns an error if the band does not fit the source image.
pub fn erode_band<T: MorphPixel, const C: usize>(
    src: &ImageView<'_, T, C>,
    dst: RowBandMut<'_, T, C>,
    kernel: &StructuringElement,
    border: BorderType,
    border_value: T,
) -> Result<(), MorphologyError> {
    filter_band::<Erode, T, C>(src, dst, kernel, border, border_value)
}

/// Dilate the output rows in `range`, leaving every other row of `dst` untouched.
///
/// Calls over ranges that partition the image produce the same output as one
/// call over the full range, in any order.
///
/// # Arguments
///
/// * `src` - The source image view.
/// * `dst` - The destination view, same size as `src`.
/// * `range` - The half-open band of output rows to compute.
/// * `kernel` - The structuring element.
/// * `border` - The border handling mode.
/// * `border_value` - The value of every channel of out-of-image pixels for [`BorderType::Constant`].
///
/// # Errors
///
/// Returns an error if the sizes differ or `range` exceeds the image.
///
/// # Example
///
/// ```
/// use graymorph_image::{Image, ImageSize, RowRange};
/// use graymorph_imgproc::morphology::{dilate_rows, BorderType, StructuringElement};
///
/// let src = Image::<u8, 1>::new(ImageSize { width: 3, height: 3 }, vec![0, 0, 0, 0, 9, 0, 0, 0, 0]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
/// let kernel = StructuringElement::rect(3, 3).unwrap();
///
/// dilate_rows(&src.view(), &mut dst.view_mut(), RowRange::new(0, 1), &kernel, BorderType::DEFAULT, 0).unwrap();
/// assert_eq!(dst.as_slice(), &[9, 9, 9, 0, 0, 0, 0, 0, 0]);
/// ```
pub fn dilate_rows<T: MorphPixel, const C: usize>(
    src: &ImageView<'_, T, C>,
    dst: &mut ImageViewMut<'_, T, C>,
    range: RowRange,
    kernel: &StructuringElement,
    border: BorderType,
    border_value: T,
) -> Result<(), MorphologyError> {
    filter_rows::<Dilate, T, C>(src, dst, range, kernel, border, border_value)
}

/// Erode the output rows in `range`, leaving every other row of `dst` untouched.
///
/// See [`dilate_rows`] for the arguments.
///
/// # Errors
///
/// Returns an error if the sizes differ or `range` exceeds the image.
pub fn erode_rows<T: MorphPixel, const C: usize>(
    src: &ImageView<'_, T, C>,
    dst: &mut ImageViewMut<'_, T, C>,
    range: RowRange,
    kernel: &StructuringElement,
    border: BorderType,
    border_value: T,
) -> Result<(), MorphologyError> {
    filter_rows::<Erode, T, C>(src, dst, range, kernel, border, border_value)
}
