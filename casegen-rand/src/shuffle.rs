use std::ops::Range;

use crate::engine::SeededRng;
use crate::error::RandError;

impl SeededRng {
    /// In-place Fisher-Yates shuffle of the whole slice.
    ///
    /// Walks the indices from the last down to the first, swapping each with
    /// a uniformly chosen index at or before it; with a uniform `randint`
    /// this makes every ordering equally likely. An empty slice is a no-op.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        self.shuffle_span(items)
    }

    /// Shuffle only the elements whose indices fall in `range`.
    ///
    /// A range that ends before it begins, or that extends past the end of
    /// the slice, fails with [`RandError::NegativeRange`].
    pub fn shuffle_range<T>(
        &mut self,
        items: &mut [T],
        range: Range<usize>,
    ) -> Result<(), RandError> {
        if range.start > range.end || range.end > items.len() {
            return Err(RandError::NegativeRange);
        }
        self.shuffle_span(&mut items[range]);
        Ok(())
    }

    fn shuffle_span<T>(&mut self, items: &mut [T]) {
        for index in (0..items.len()).rev() {
            let other = self.randint(0, index as i64) as usize;
            items.swap(index, other);
        }
    }

    /// Random permutation of `[offset, offset + size)`.
    ///
    /// Builds the identity sequence and shuffles it. A non-positive size
    /// fails with [`RandError::NonPositiveSize`].
    pub fn permutation(&mut self, size: i64, offset: i64) -> Result<Vec<i64>, RandError> {
        if size <= 0 {
            return Err(RandError::NonPositiveSize(size));
        }
        let mut items: Vec<i64> = (offset..offset + size).collect();
        self.shuffle(&mut items);
        Ok(items)
    }
}
