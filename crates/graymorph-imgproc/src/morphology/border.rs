/// Border handling modes for morphological operations.
///
/// A border type decides what a neighbourhood read outside of the image sees.
/// Each axis is resolved on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderType {
    /// Every out-of-bounds read takes the constant border value.
    ///
    /// Example: ...d c b a | v v v v...
    Constant,

    /// Takes the outermost row or column of pixels and repeats it.
    ///
    /// Example: ...d c b a | a a a a...
    Replicate,

    /// Reflects the pixel values at the boundary, starting with the edge pixel itself.
    ///
    /// Example: ...d c b a | a b c d...
    Reflect,

    /// Reflects the pixel values at the boundary, starting with the pixel next to the edge.
    ///
    /// Example: ...d c b a | b c d e...
    #[default]
    Reflect101,

    /// Wraps the content from the opposite side.
    ///
    /// Example: ...d c b a | w x y z...
    Wrap,
}

impl BorderType {
    /// The default border, reflecting without duplicating the edge pixel.
    pub const DEFAULT: BorderType = BorderType::Reflect101;

    #[inline]
    fn reflect(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i - 1;
            } else {
                i = 2 * len - i - 1;
            }
        }
        i as usize
    }

    #[inline]
    fn reflect101(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i;
            } else {
                i = 2 * len - i - 2;
            }
        }
        i as usize
    }

    /// Maps index `i` along an axis of `len` pixels to a source index.
    ///
    /// Returns `None` when the read must take the constant border value, which
    /// only happens for [`BorderType::Constant`] or an empty axis. Reflections are
    /// applied repeatedly, so offsets larger than the axis are still resolved.
    ///
    /// # Arguments
    ///
    /// * `i` - The (possibly out-of-range) coordinate.
    /// * `len` - The valid length of the axis.
    ///
    /// # Example
    ///
    /// ```
    /// use graymorph_imgproc::morphology::BorderType;
    ///
    /// assert_eq!(BorderType::Reflect101.resolve(-1, 5), Some(1));
    /// assert_eq!(BorderType::Reflect101.resolve(5, 5), Some(3));
    /// assert_eq!(BorderType::Constant.resolve(-1, 5), None);
    /// ```
    #[inline]
    pub fn resolve(&self, i: isize, len: usize) -> Option<usize> {
        if i >= 0 && (i as usize) < len {
            return Some(i as usize);
        }
        if len == 0 {
            return None;
        }

        match self {
            BorderType::Constant => None,
            BorderType::Replicate => Some(i.clamp(0, len as isize - 1) as usize),
            BorderType::Reflect => Some(Self::reflect(i, len)),
            BorderType::Reflect101 => Some(Self::reflect101(i, len)),
            BorderType::Wrap => Some(i.rem_euclid(len as isize) as usize),
        }
    }
}
