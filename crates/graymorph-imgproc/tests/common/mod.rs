#![allow(dead_code)]

use std::fmt::Debug;

use graymorph_image::{Image, ImageError, ImageSize};
use graymorph_imgproc::morphology::{
    dilate, erode, BorderType, KernelShape, MorphPixel, MorphologyError, StructuringElement,
};
use graymorph_imgproc::parallel::ExecutionStrategy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Border fill used when dilating with a constant border.
pub const DILATE_FILL: f32 = 253.0;
/// Border fill used when eroding with a constant border.
pub const ERODE_FILL: f32 = 1.0;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Dilate,
    Erode,
}

impl Op {
    pub fn fill<T: MorphPixel>(self) -> T {
        match self {
            Op::Dilate => T::from_f32(DILATE_FILL),
            Op::Erode => T::from_f32(ERODE_FILL),
        }
    }

    pub fn run<T: MorphPixel, const C: usize>(
        self,
        src: &Image<T, C>,
        dst: &mut Image<T, C>,
        kernel: &StructuringElement,
        border: BorderType,
        border_value: T,
        strategy: ExecutionStrategy,
    ) -> Result<(), MorphologyError> {
        let (src, mut dst) = (src.view(), dst.view_mut());
        match self {
            Op::Dilate => dilate(&src, &mut dst, kernel, border, border_value, strategy),
            Op::Erode => erode(&src, &mut dst, kernel, border, border_value, strategy),
        }
    }
}

/// Pixel types the sweep runs over.
pub trait TestPixel: MorphPixel + Debug {
    fn sample(rng: &mut StdRng) -> Self;

    fn close_to(a: Self, b: Self) -> bool;
}

impl TestPixel for u8 {
    fn sample(rng: &mut StdRng) -> Self {
        rng.random()
    }

    fn close_to(a: Self, b: Self) -> bool {
        a.abs_diff(b) <= 1
    }
}

impl TestPixel for f32 {
    fn sample(rng: &mut StdRng) -> Self {
        rng.random_range(0.0f32..255.0)
    }

    fn close_to(a: Self, b: Self) -> bool {
        approx::relative_eq!(a, b, epsilon = 1e-6, max_relative = 1e-6)
    }
}

/// A random image whose rows carry `pad` extra elements.
pub fn random_image<T: TestPixel, const C: usize>(
    rng: &mut StdRng,
    size: ImageSize,
    pad: usize,
) -> Result<Image<T, C>, ImageError> {
    let stride = size.width * C + pad;
    let data = (0..stride * size.height).map(|_| T::sample(rng)).collect();
    Image::with_stride(size, stride, data)
}

pub fn shape(ksize: usize, masked: bool) -> KernelShape {
    if masked {
        KernelShape::Ellipse {
            width: ksize,
            height: ksize,
        }
    } else {
        KernelShape::Rect {
            width: ksize,
            height: ksize,
        }
    }
}

// Reflect-101 in closed form: the index sequence is periodic with period 2 * (len - 1).
fn reflect101(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let m = i.rem_euclid(period);
    if m < len as isize {
        m as usize
    } else {
        (period - m) as usize
    }
}

/// The element as a `height x width` boolean matrix.
pub fn mask_matrix(kernel: &StructuringElement) -> Vec<Vec<bool>> {
    kernel
        .to_mask()
        .chunks(kernel.width())
        .map(|row| row.iter().map(|&v| v != 0).collect())
        .collect()
}

/// Naive morphology: pad the source explicitly, then scan the full mask at every pixel.
///
/// `anchor` is the `(x, y)` mask cell aligned with the output pixel.
pub fn oracle<T: MorphPixel, const C: usize>(
    src: &Image<T, C>,
    mask: &[Vec<bool>],
    anchor: (usize, usize),
    op: Op,
    border: BorderType,
    border_value: T,
) -> Result<Image<T, C>, ImageError> {
    let (cols, rows) = (src.cols(), src.rows());
    let kernel_height = mask.len();
    let kernel_width = mask.first().map_or(0, |row| row.len());
    let (ax, ay) = anchor;
    let (pw, ph) = (cols + kernel_width - 1, rows + kernel_height - 1);

    let mut padded = vec![[border_value; C]; pw * ph];
    for py in 0..ph {
        for px in 0..pw {
            let sy = py as isize - ay as isize;
            let sx = px as isize - ax as isize;
            let inside = (0..rows as isize).contains(&sy) && (0..cols as isize).contains(&sx);
            let coord = match border {
                _ if inside => Some((sx as usize, sy as usize)),
                BorderType::Constant => None,
                BorderType::Reflect101 => Some((reflect101(sx, cols), reflect101(sy, rows))),
                other => panic!("oracle does not model {other:?}"),
            };
            if let Some((x, y)) = coord {
                let cell = &mut padded[py * pw + px];
                for (ch, v) in cell.iter_mut().enumerate() {
                    *v = src.get_pixel(x, y, ch)?;
                }
            }
        }
    }

    let mut out = Image::<T, C>::from_size_val(src.size(), T::default())?;
    for y in 0..rows {
        for x in 0..cols {
            for ch in 0..C {
                let mut acc: Option<T> = None;
                for ky in 0..kernel_height {
                    for kx in 0..kernel_width {
                        if !mask[ky][kx] {
                            continue;
                        }
                        let v = padded[(y + ky) * pw + x + kx][ch];
                        acc = Some(match (acc, op) {
                            (None, _) => v,
                            (Some(a), Op::Dilate) if v > a => v,
                            (Some(a), Op::Erode) if v < a => v,
                            (Some(a), _) => a,
                        });
                    }
                }
                let v = acc.unwrap_or(border_value);
                out.set_pixel(x, y, ch, v)?;
            }
        }
    }

    Ok(out)
}

/// Assert two images agree within the per-type tolerance, ignoring row padding.
pub fn assert_images_close<T: TestPixel, const C: usize>(
    actual: &Image<T, C>,
    expected: &Image<T, C>,
    context: &str,
) {
    assert_eq!(actual.size(), expected.size(), "{context}");
    for y in 0..actual.rows() {
        for x in 0..actual.cols() {
            for ch in 0..C {
                let a = actual.get_pixel(x, y, ch).unwrap();
                let e = expected.get_pixel(x, y, ch).unwrap();
                assert!(
                    T::close_to(a, e),
                    "{context}: pixel ({x}, {y}) channel {ch}: got {a:?}, expected {e:?}"
                );
            }
        }
    }
}
