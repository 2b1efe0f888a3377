use super::MorphologyError;

/// Shapes of structuring elements.
///
/// All shapes are anchored at their geometric center `(width / 2, height / 2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelShape {
    /// A rectangular box structuring element.
    ///
    /// All pixels within the box are included in the morphological operation.
    Rect {
        /// The width of the kernel.
        width: usize,
        /// The height of the kernel.
        height: usize,
    },

    /// A cross (plus) shaped structuring element.
    ///
    /// Only pixels on the anchor row and the anchor column are included.
    Cross {
        /// The width of the kernel.
        width: usize,
        /// The height of the kernel.
        height: usize,
    },

    /// An ellipse (or circle) inscribed in the kernel rectangle.
    Ellipse {
        /// The width of the ellipse.
        width: usize,
        /// The height of the ellipse.
        height: usize,
    },
}

/// A participating kernel cell: its kernel row and its column offset from the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelOffset {
    /// Row of the cell inside the kernel.
    pub row: usize,
    /// Horizontal offset from the anchor.
    pub dx: isize,
}

/// A binary structuring element.
///
/// The element is a `height x width` rectangle with an optional flat row-major
/// mask where a nonzero entry includes the cell. Without a mask every cell
/// participates. The participating offsets are computed once at construction
/// and the element is guaranteed to hold at least one of them.
///
/// # Example
///
/// ```rust
/// use graymorph_imgproc::morphology::{KernelShape, StructuringElement};
///
/// let kernel = StructuringElement::from_shape(KernelShape::Cross { width: 3, height: 3 }).unwrap();
/// assert_eq!(kernel.anchor(), (1, 1));
/// assert_eq!(kernel.neighborhood().len(), 5);
/// assert_eq!(kernel.mask(), Some(&[0, 1, 0, 1, 1, 1, 0, 1, 0][..]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    width: usize,
    height: usize,
    mask: Option<Vec<u8>>,
    offsets: Vec<KernelOffset>,
}

impl StructuringElement {
    fn build(height: usize, width: usize, mask: Option<Vec<u8>>) -> Result<Self, MorphologyError> {
        if height == 0 || width == 0 {
            return Err(MorphologyError::EmptyKernel(height, width));
        }
        if let Some(mask) = &mask {
            if mask.len() != height * width {
                return Err(MorphologyError::MaskSizeMismatch(mask.len(), height * width));
            }
        }

        let ax = width / 2;
        let offsets: Vec<KernelOffset> = (0..height)
            .flat_map(|row| (0..width).map(move |col| (row, col)))
            .filter(|&(row, col)| mask.as_ref().map_or(true, |m| m[row * width + col] != 0))
            .map(|(row, col)| KernelOffset {
                row,
                dx: col as isize - ax as isize,
            })
            .collect();

        if offsets.is_empty() {
            return Err(MorphologyError::AllKernelElementsInactive);
        }

        Ok(Self {
            width,
            height,
            mask,
            offsets,
        })
    }

    /// Create a full rectangular element of `height x width` cells.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the dimensions is zero.
    pub fn rect(height: usize, width: usize) -> Result<Self, MorphologyError> {
        Self::build(height, width, None)
    }

    /// Create an element from a flat row-major mask of `height * width` entries.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is zero, the mask length does not match
    /// or no entry is set.
    pub fn from_mask(height: usize, width: usize, mask: Vec<u8>) -> Result<Self, MorphologyError> {
        Self::build(height, width, Some(mask))
    }

    /// Create an element from a [`KernelShape`].
    ///
    /// A `1x1` request of any shape yields the single anchor cell.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the dimensions is zero.
    pub fn from_shape(shape: KernelShape) -> Result<Self, MorphologyError> {
        match shape {
            KernelShape::Rect { width, height } => Self::rect(height, width),
            KernelShape::Cross { width, height } => {
                Self::from_mask(height, width, cross_mask(height, width))
            }
            KernelShape::Ellipse { width, height } => {
                Self::from_mask(height, width, ellipse_mask(height, width))
            }
        }
    }

    /// The width of the element.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The height of the element.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The anchor `(x, y)`, i.e. the cell aligned with the output pixel.
    pub fn anchor(&self) -> (usize, usize) {
        (self.width / 2, self.height / 2)
    }

    /// The inclusion mask, `None` for a full rectangle.
    pub fn mask(&self) -> Option<&[u8]> {
        self.mask.as_deref()
    }

    /// Whether every cell participates.
    pub fn is_full(&self) -> bool {
        self.offsets.len() == self.width * self.height
    }

    /// The participating cells in row-major order.
    pub fn neighborhood(&self) -> &[KernelOffset] {
        &self.offsets
    }

    /// The dense row-major mask, with `1` for every participating cell.
    pub fn to_mask(&self) -> Vec<u8> {
        let mut mask = vec![0u8; self.width * self.height];
        let (ax, _) = self.anchor();
        for off in &self.offsets {
            let col = (off.dx + ax as isize) as usize;
            mask[off.row * self.width + col] = 1;
        }
        mask
    }
}

fn cross_mask(height: usize, width: usize) -> Vec<u8> {
    let mut data = vec![0u8; height * width];
    let (cx, cy) = (width / 2, height / 2);

    // fill anchor row
    data[cy * width..(cy + 1) * width].fill(1);

    // fill anchor column
    for i in 0..height {
        data[i * width + cx] = 1;
    }

    data
}

fn ellipse_mask(height: usize, width: usize) -> Vec<u8> {
    let mut data = vec![0u8; height * width];
    if height == 0 || width == 0 {
        return data;
    }

    let r = height / 2;
    let c = width / 2;
    let inv_r2 = if r > 0 { 1.0 / (r * r) as f64 } else { 0.0 };

    for i in 0..height {
        let dy = i as isize - r as isize;
        let span = ((r * r) as isize - dy * dy) as f64 * inv_r2;
        let dx = (c as f64 * span.sqrt()).round_ties_even() as usize;
        let j1 = c.saturating_sub(dx);
        let j2 = (c + dx + 1).min(width);
        data[i * width + j1..i * width + j2].fill(1);
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn print_kernel(kernel: &[u8], rows: usize, cols: usize) {
        for r in 0..rows {
            for c in 0..cols {
                print!("{} ", kernel[r * cols + c]);
            }
            println!();
        }
    }

    #[test]
    fn test_rect_kernel() -> Result<(), MorphologyError> {
        let kernel = StructuringElement::rect(3, 5)?;
        assert_eq!(kernel.height(), 3);
        assert_eq!(kernel.width(), 5);
        assert_eq!(kernel.anchor(), (2, 1));
        assert!(kernel.is_full());
        assert!(kernel.mask().is_none());
        assert_eq!(kernel.neighborhood().len(), 15);
        assert_eq!(
            kernel.neighborhood()[0],
            KernelOffset { row: 0, dx: -2 }
        );
        assert!(kernel.to_mask().iter().all(|&v| v == 1));
        Ok(())
    }

    #[test]
    fn test_cross_kernel() -> Result<(), MorphologyError> {
        let kernel = StructuringElement::from_shape(KernelShape::Cross {
            width: 5,
            height: 3,
        })?;
        print_kernel(&kernel.to_mask(), 3, 5);
        #[rustfmt::skip]
        let expected = vec![
            0, 0, 1, 0, 0,
            1, 1, 1, 1, 1,
            0, 0, 1, 0, 0,
        ];
        assert_eq!(kernel.to_mask(), expected);
        assert!(!kernel.is_full());
        Ok(())
    }

    #[test]
    fn test_ellipse_kernel_3x3() -> Result<(), MorphologyError> {
        let kernel = StructuringElement::from_shape(KernelShape::Ellipse {
            width: 3,
            height: 3,
        })?;
        assert_eq!(kernel.mask(), Some(&[0, 1, 0, 1, 1, 1, 0, 1, 0][..]));
        Ok(())
    }

    #[test]
    fn test_ellipse_kernel_5x5() -> Result<(), MorphologyError> {
        let kernel = StructuringElement::from_shape(KernelShape::Ellipse {
            width: 5,
            height: 5,
        })?;
        print_kernel(&kernel.to_mask(), 5, 5);
        #[rustfmt::skip]
        let expected = vec![
            0, 0, 1, 0, 0,
            1, 1, 1, 1, 1,
            1, 1, 1, 1, 1,
            1, 1, 1, 1, 1,
            0, 0, 1, 0, 0,
        ];
        assert_eq!(kernel.to_mask(), expected);
        Ok(())
    }

    #[test]
    fn test_ellipse_kernel_symmetric() -> Result<(), MorphologyError> {
        for size in [7, 11, 15] {
            let kernel = StructuringElement::from_shape(KernelShape::Ellipse {
                width: size,
                height: size,
            })?;
            let mask = kernel.to_mask();
            for r in 0..size {
                for c in 0..size {
                    assert_eq!(mask[r * size + c], mask[(size - 1 - r) * size + c]);
                    assert_eq!(mask[r * size + c], mask[r * size + size - 1 - c]);
                }
            }
            // the anchor row is full and the corners are empty
            assert!(mask[(size / 2) * size..(size / 2 + 1) * size]
                .iter()
                .all(|&v| v == 1));
            assert_eq!(mask[0], 0);
        }
        Ok(())
    }

    #[test]
    fn test_single_cell() -> Result<(), MorphologyError> {
        for shape in [
            KernelShape::Rect {
                width: 1,
                height: 1,
            },
            KernelShape::Cross {
                width: 1,
                height: 1,
            },
            KernelShape::Ellipse {
                width: 1,
                height: 1,
            },
        ] {
            let kernel = StructuringElement::from_shape(shape)?;
            assert_eq!(
                kernel.neighborhood(),
                &[KernelOffset { row: 0, dx: 0 }]
            );
        }
        Ok(())
    }

    #[test]
    fn test_masked_neighborhood_skips_zero_cells() -> Result<(), MorphologyError> {
        let kernel = StructuringElement::from_mask(3, 3, vec![0, 1, 0, 1, 1, 1, 0, 1, 0])?;
        let offsets: Vec<_> = kernel
            .neighborhood()
            .iter()
            .map(|o| (o.row, o.dx))
            .collect();
        assert_eq!(offsets, vec![(0, 0), (1, -1), (1, 0), (1, 1), (2, 0)]);
        Ok(())
    }

    #[test]
    fn test_invalid_kernels() {
        assert_eq!(
            StructuringElement::rect(0, 3),
            Err(MorphologyError::EmptyKernel(0, 3))
        );
        assert_eq!(
            StructuringElement::from_mask(3, 3, vec![1; 8]),
            Err(MorphologyError::MaskSizeMismatch(8, 9))
        );
        assert_eq!(
            StructuringElement::from_mask(3, 3, vec![0; 9]),
            Err(MorphologyError::AllKernelElementsInactive)
        );
    }
}
