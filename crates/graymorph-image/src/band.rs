use std::ops::Range;

/// A half-open band `[start, end)` of image rows.
///
/// Row ranges are the unit of parallel work: a set of ranges covering an
/// image is pairwise disjoint and leaves no gaps.
///
/// # Examples
///
/// ```
/// use graymorph_image::RowRange;
///
/// let bands: Vec<_> = RowRange::bands(10, 4).collect();
/// assert_eq!(bands, vec![RowRange::new(0, 4), RowRange::new(4, 8), RowRange::new(8, 10)]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowRange {
    /// First row of the band.
    pub start: usize,
    /// One past the last row of the band.
    pub end: usize,
}

impl RowRange {
    /// Create a new row range.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The range covering all `rows` rows.
    pub fn full(rows: usize) -> Self {
        Self { start: 0, end: rows }
    }

    /// Number of rows in the range.
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the range holds no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Iterate over the rows of the range.
    pub fn iter(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Partition `rows` rows into consecutive bands of `band_rows` rows.
    ///
    /// The last band holds the remainder. A zero band height is treated as one.
    pub fn bands(rows: usize, band_rows: usize) -> impl Iterator<Item = RowRange> {
        let band_rows = band_rows.max(1);
        (0..rows)
            .step_by(band_rows)
            .map(move |start| RowRange::new(start, (start + band_rows).min(rows)))
    }

    /// Partition `rows` rows into at most `parts` bands whose sizes differ by at most one row.
    pub fn split(rows: usize, parts: usize) -> Vec<RowRange> {
        let parts = parts.clamp(1, rows.max(1));
        let base = rows / parts;
        let extra = rows % parts;

        let mut start = 0;
        (0..parts)
            .map(|i| {
                let len = base + usize::from(i < extra);
                let range = RowRange::new(start, start + len);
                start += len;
                range
            })
            .collect()
    }
}

/// A writable band of rows borrowed from an [`crate::ImageViewMut`].
///
/// Rows are addressed with their absolute index in the parent image, so the
/// same per-row code runs whatever band it was handed.
#[derive(Debug)]
pub struct RowBandMut<'a, T, const C: usize> {
    pub(crate) data: &'a mut [T],
    pub(crate) range: RowRange,
    pub(crate) cols: usize,
    pub(crate) stride: usize,
}

impl<'a, T, const C: usize> RowBandMut<'a, T, C> {
    /// The absolute rows covered by the band.
    #[inline]
    pub fn range(&self) -> RowRange {
        self.range
    }

    /// The number of columns of the parent image.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Iterate over `(absolute row, row pixels)` pairs of the band.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = (usize, &mut [T])> + '_ {
        let row_len = self.cols * C;
        self.data
            .chunks_mut(self.stride)
            .zip(self.range.iter())
            .map(move |(chunk, y)| (y, &mut chunk[..row_len]))
    }
}
