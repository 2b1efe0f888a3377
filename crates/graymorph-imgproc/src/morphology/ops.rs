use graymorph_image::{Image, ImageError, ImageView, ImageViewMut};

use super::filter::{filter_band, Dilate, Erode, MorphOp, MorphPixel};
use super::{BorderType, MorphologyError, StructuringElement};
use crate::parallel::{par_iter_bands, ExecutionStrategy};

fn morphology<Op: MorphOp, T: MorphPixel, const C: usize>(
    src: &ImageView<'_, T, C>,
    dst: &mut ImageViewMut<'_, T, C>,
    kernel: &StructuringElement,
    border: BorderType,
    border_value: T,
    strategy: ExecutionStrategy,
) -> Result<(), MorphologyError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        )
        .into());
    }

    log::debug!(
        "{}: {} C={} kernel {}x{} ({} cells) border {:?} strategy {:?}",
        Op::NAME,
        src.size(),
        C,
        kernel.width(),
        kernel.height(),
        kernel.neighborhood().len(),
        border,
        strategy,
    );

    par_iter_bands(dst, strategy, |band| {
        filter_band::<Op, T, C>(src, band, kernel, border, border_value)
    })
}

/// Dilate an image using a [`StructuringElement`].
///
/// Dilation expands bright regions in the image. Each pixel is replaced
/// by the maximum value in the neighborhood defined by the kernel.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `kernel` - The morphological structuring element.
/// * `border` - The border handling mode ([`BorderType`]).
/// * `border_value` - The fill value for constant borders, used for every channel.
/// * `strategy` - How the output rows are split and scheduled.
///
/// # Returns
///
/// Ok(()) on success, or [`MorphologyError`] if shapes don't match or the strategy is invalid.
///
/// # Example
///
/// ```
/// use graymorph_image::{Image, ImageSize};
/// use graymorph_imgproc::morphology::{dilate, BorderType, KernelShape, StructuringElement};
/// use graymorph_imgproc::parallel::ExecutionStrategy;
///
/// let mut data = vec![0u8; 25];
/// data[12] = 200;
/// let src = Image::<u8, 1>::new(ImageSize { width: 5, height: 5 }, data).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
///
/// let kernel = StructuringElement::from_shape(KernelShape::Cross { width: 3, height: 3 }).unwrap();
/// dilate(
///     &src.view(),
///     &mut dst.view_mut(),
///     &kernel,
///     BorderType::DEFAULT,
///     0,
///     ExecutionStrategy::Serial,
/// )
/// .unwrap();
///
/// assert_eq!(dst.get_pixel(2, 1, 0).unwrap(), 200);
/// assert_eq!(dst.get_pixel(1, 1, 0).unwrap(), 0);
/// ```
pub fn dilate<T: MorphPixel, const C: usize>(
    src: &ImageView<'_, T, C>,
    dst: &mut ImageViewMut<'_, T, C>,
    kernel: &StructuringElement,
    border: BorderType,
    border_value: T,
    strategy: ExecutionStrategy,
) -> Result<(), MorphologyError> {
    morphology::<Dilate, T, C>(src, dst, kernel, border, border_value, strategy)
}

/// Erode an image using a [`StructuringElement`].
///
/// Erosion shrinks bright regions in the image. Each pixel is replaced
/// by the minimum value in the neighborhood defined by the kernel.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `kernel` - The morphological structuring element.
/// * `border` - The border handling mode ([`BorderType`]).
/// * `border_value` - The fill value for constant borders, used for every channel.
/// * `strategy` - How the output rows are split and scheduled.
///
/// # Returns
///
/// Ok(()) on success, or [`MorphologyError`] if shapes don't match or the strategy is invalid.
pub fn erode<T: MorphPixel, const C: usize>(
    src: &ImageView<'_, T, C>,
    dst: &mut ImageViewMut<'_, T, C>,
    kernel: &StructuringElement,
    border: BorderType,
    border_value: T,
    strategy: ExecutionStrategy,
) -> Result<(), MorphologyError> {
    morphology::<Erode, T, C>(src, dst, kernel, border, border_value, strategy)
}

/// Opening: erosion followed by dilation.
///
/// Removes small bright objects and smooths object boundaries. The
/// intermediate erosion is stored in a temporary image.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `kernel` - The morphological structuring element.
/// * `border` - The border handling mode ([`BorderType`]) of both passes.
/// * `border_value` - The fill value for constant borders of both passes.
/// * `strategy` - How the output rows are split and scheduled.
pub fn open<T: MorphPixel, const C: usize>(
    src: &ImageView<'_, T, C>,
    dst: &mut ImageViewMut<'_, T, C>,
    kernel: &StructuringElement,
    border: BorderType,
    border_value: T,
    strategy: ExecutionStrategy,
) -> Result<(), MorphologyError> {
    let mut temp_img = Image::<T, C>::from_size_val(src.size(), T::default())?;
    erode(src, &mut temp_img.view_mut(), kernel, border, border_value, strategy)?;
    dilate(&temp_img.view(), dst, kernel, border, border_value, strategy)?;
    Ok(())
}

/// Closing: dilation followed by erosion.
///
/// Fills small dark holes and smooths object boundaries. The
/// intermediate dilation is stored in a temporary image.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `kernel` - The morphological structuring element.
/// * `border` - The border handling mode ([`BorderType`]) of both passes.
/// * `border_value` - The fill value for constant borders of both passes.
/// * `strategy` - How the output rows are split and scheduled.
pub fn close<T: MorphPixel, const C: usize>(
    src: &ImageView<'_, T, C>,
    dst: &mut ImageViewMut<'_, T, C>,
    kernel: &StructuringElement,
    border: BorderType,
    border_value: T,
    strategy: ExecutionStrategy,
) -> Result<(), MorphologyError> {
    let mut temp_img = Image::<T, C>::from_size_val(src.size(), T::default())?;
    dilate(src, &mut temp_img.view_mut(), kernel, border, border_value, strategy)?;
    erode(&temp_img.view(), dst, kernel, border, border_value, strategy)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::KernelShape;
    use crate::parallel::ParallelError;

    fn binary_square() -> Result<Image<u8, 1>, ImageError> {
        // 7x7 with a 3x3 white square and an isolated white pixel
        #[rustfmt::skip]
        let data = vec![
            0,   0,   0,   0,   0,   0,   0,
            0, 255, 255, 255,   0,   0,   0,
            0, 255, 255, 255,   0,   0,   0,
            0, 255, 255, 255,   0,   0,   0,
            0,   0,   0,   0,   0,   0,   0,
            0,   0,   0,   0,   0, 255,   0,
            0,   0,   0,   0,   0,   0,   0,
        ];
        Image::new([7, 7].into(), data)
    }

    #[test]
    fn test_open_removes_isolated_pixel() -> Result<(), MorphologyError> {
        let src = binary_square()?;
        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;
        let kernel = StructuringElement::rect(3, 3)?;
        open(
            &src.view(),
            &mut dst.view_mut(),
            &kernel,
            BorderType::DEFAULT,
            0,
            ExecutionStrategy::ParallelRows,
        )?;
        // the square survives, the lone pixel does not
        assert_eq!(dst.get_pixel(2, 2, 0)?, 255);
        assert_eq!(dst.get_pixel(1, 1, 0)?, 255);
        assert_eq!(dst.get_pixel(5, 5, 0)?, 0);
        assert_eq!(dst.as_slice().iter().filter(|&&v| v == 255).count(), 9);
        Ok(())
    }

    #[test]
    fn test_close_fills_hole() -> Result<(), MorphologyError> {
        let mut src = Image::<u8, 1>::from_size_val([5, 5].into(), 100)?;
        src.set_pixel(2, 2, 0, 0)?;
        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;
        let kernel = StructuringElement::from_shape(KernelShape::Cross {
            width: 3,
            height: 3,
        })?;
        close(
            &src.view(),
            &mut dst.view_mut(),
            &kernel,
            BorderType::DEFAULT,
            0,
            ExecutionStrategy::AutoRows(2),
        )?;
        assert!(dst.as_slice().iter().all(|&v| v == 100));
        Ok(())
    }

    #[test]
    fn test_strategies_agree() -> Result<(), MorphologyError> {
        let data: Vec<u8> = (0..20 * 13 * 3).map(|i| ((i * 37) % 251) as u8).collect();
        let src = Image::<u8, 3>::new([20, 13].into(), data)?;
        let kernel = StructuringElement::from_shape(KernelShape::Ellipse {
            width: 5,
            height: 5,
        })?;

        let mut expected = Image::<u8, 3>::from_size_val(src.size(), 0)?;
        erode(
            &src.view(),
            &mut expected.view_mut(),
            &kernel,
            BorderType::Constant,
            1,
            ExecutionStrategy::Serial,
        )?;

        for strategy in [
            ExecutionStrategy::ParallelRows,
            ExecutionStrategy::AutoRows(4),
            ExecutionStrategy::AutoRows(100),
            ExecutionStrategy::Fixed(3),
        ] {
            let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0)?;
            erode(
                &src.view(),
                &mut dst.view_mut(),
                &kernel,
                BorderType::Constant,
                1,
                strategy,
            )?;
            assert_eq!(dst, expected, "strategy {strategy:?}");
        }
        Ok(())
    }

    #[test]
    fn test_invalid_strategy() -> Result<(), MorphologyError> {
        let src = Image::<f32, 1>::from_size_val([4, 4].into(), 0.0)?;
        let mut dst = src.clone();
        let kernel = StructuringElement::rect(3, 3)?;
        let res = dilate(
            &src.view(),
            &mut dst.view_mut(),
            &kernel,
            BorderType::DEFAULT,
            0.0,
            ExecutionStrategy::Fixed(0),
        );
        assert_eq!(
            res,
            Err(MorphologyError::Parallel(ParallelError::InvalidThreadCount(0)))
        );
        Ok(())
    }

    #[test]
    fn test_size_mismatch() -> Result<(), MorphologyError> {
        let src = Image::<u8, 1>::from_size_val([4, 4].into(), 0)?;
        let mut dst = Image::<u8, 1>::from_size_val([4, 5].into(), 0)?;
        let kernel = StructuringElement::rect(3, 3)?;
        let res = open(
            &src.view(),
            &mut dst.view_mut(),
            &kernel,
            BorderType::DEFAULT,
            0,
            ExecutionStrategy::Serial,
        );
        assert!(matches!(
            res,
            Err(MorphologyError::Image(ImageError::InvalidImageSize(..)))
        ));
        Ok(())
    }
}
