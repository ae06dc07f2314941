//! HeightIndex - O(log n) prefix sums and lower_bound via Fenwick tree
//!
//! Provides efficient operations for computing row offsets and finding the row
//! under a vertical offset (scroll position).
//!
//! # Complexity
//!
//! - `set`: O(log n)
//! - `prefix_sum` / `offset_of`: O(log n)
//! - `lower_bound`: O(log² n)
//! - `push`: O(log n) amortized
//! - `height`: O(1)
//! - `len`: O(1)
//!
//! Out-of-range probes never panic: heights read as 0 and offsets clamp to
//! the total, because virtual lists probe indices speculatively.

/// Fenwick tree of row heights plus the plain heights for O(1) reads.
///
/// The tree always spans the whole backing capacity, so every node past `len`
/// already holds the sums it needs once a new row is pushed.
#[derive(Debug, Clone)]
pub struct HeightIndex {
    /// Fenwick tree backing storage (0-indexed API over the `fenwick` crate).
    tree: Vec<isize>,
    /// Height of each row.
    heights: Vec<usize>,
}

impl Default for HeightIndex {
    fn default() -> Self {
        Self::new(0)
    }
}

impl HeightIndex {
    /// Creates a new HeightIndex with the given initial capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// # use evsheet::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::new(100);
    /// assert_eq!(index.len(), 0);
    /// assert_eq!(index.total(), 0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            tree: vec![0; capacity],
            heights: Vec::with_capacity(capacity),
        }
    }

    /// Builds an index from row heights.
    pub fn from_heights(heights: impl IntoIterator<Item = usize>) -> Self {
        let heights: Vec<usize> = heights.into_iter().collect();
        let mut index = Self {
            tree: vec![0; heights.len()],
            heights,
        };
        index.rebuild();
        index
    }

    /// Sets the height at the given index.
    ///
    /// Returns `false` (and does nothing) when `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use evsheet::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(10);
    /// index.push(5);
    /// assert!(index.set(0, 10));
    /// assert!(!index.set(3, 10));
    /// assert_eq!(index.prefix_sum(0), 10);
    /// ```
    pub fn set(&mut self, index: usize, height: usize) -> bool {
        let Some(current) = self.heights.get_mut(index) else {
            return false;
        };
        let delta = height as isize - *current as isize;
        *current = height;
        if delta != 0 {
            fenwick::array::update(&mut self.tree, index, delta);
        }
        true
    }

    /// Height of the row at `index`, 0 when out of range.
    pub fn height(&self, index: usize) -> usize {
        self.heights.get(index).copied().unwrap_or(0)
    }

    /// Cumulative height up to and including `index`.
    ///
    /// Indices past the end return the total.
    ///
    /// # Examples
    ///
    /// ```
    /// # use evsheet::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([3, 4, 5]);
    /// assert_eq!(index.prefix_sum(0), 3);
    /// assert_eq!(index.prefix_sum(1), 7);
    /// assert_eq!(index.prefix_sum(2), 12);
    /// assert_eq!(index.prefix_sum(99), 12);
    /// ```
    pub fn prefix_sum(&self, index: usize) -> usize {
        if self.heights.is_empty() {
            return 0;
        }
        let index = index.min(self.heights.len() - 1);
        let sum = fenwick::array::prefix_sum(&self.tree, index);
        sum.max(0) as usize
    }

    /// Vertical offset of the top of row `index` (sum of the rows before it).
    ///
    /// `offset_of(len())` is the total height; larger indices clamp to it.
    pub fn offset_of(&self, index: usize) -> usize {
        if index == 0 {
            0
        } else {
            self.prefix_sum(index - 1)
        }
    }

    /// Binary search for the first index where `prefix_sum(index) > value`.
    ///
    /// Returns the index of the row containing the given vertical offset.
    ///
    /// # Returns
    ///
    /// - `Some(index)` if there exists an index where `prefix_sum(index) > value`
    /// - `None` if `value >= total()` or the index is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use evsheet::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([10, 20, 15]);
    /// assert_eq!(index.lower_bound(0), Some(0));
    /// assert_eq!(index.lower_bound(10), Some(1));
    /// assert_eq!(index.lower_bound(30), Some(2));
    /// assert_eq!(index.lower_bound(100), None);
    /// ```
    pub fn lower_bound(&self, value: usize) -> Option<usize> {
        if self.is_empty() {
            return None;
        }

        // Row i covers [prefix_sum(i-1), prefix_sum(i))
        let mut left = 0;
        let mut right = self.len();

        while left < right {
            let mid = left + (right - left) / 2;
            if self.prefix_sum(mid) > value {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        (left < self.len()).then_some(left)
    }

    /// Total height of all rows.
    pub fn total(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.prefix_sum(self.len() - 1)
        }
    }

    /// Number of rows in the index.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Returns true if the index contains no rows.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Appends a row with the given height.
    ///
    /// Doubles the backing storage when full and rebuilds the tree over it.
    pub fn push(&mut self, height: usize) {
        let index = self.heights.len();
        self.heights.push(height);
        if index >= self.tree.len() {
            self.tree = vec![0; self.tree.len().max(1) * 2];
            self.rebuild();
        } else {
            fenwick::array::update(&mut self.tree, index, height as isize);
        }
    }

    /// Drops every row from `len` on.
    pub fn truncate(&mut self, len: usize) {
        while self.heights.len() > len {
            let index = self.heights.len() - 1;
            let height = self.heights.pop().unwrap_or(0);
            if height != 0 {
                fenwick::array::update(&mut self.tree, index, -(height as isize));
            }
        }
    }

    /// Clears all rows, keeping the allocated capacity.
    pub fn clear(&mut self) {
        self.tree.fill(0);
        self.heights.clear();
    }

    fn rebuild(&mut self) {
        self.tree.fill(0);
        for (index, height) in self.heights.iter().enumerate() {
            if *height != 0 {
                fenwick::array::update(&mut self.tree, index, *height as isize);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_index() {
        let index = HeightIndex::new(10);
        assert_eq!(index.len(), 0);
        assert_eq!(index.total(), 0);
        assert!(index.is_empty());
        assert_eq!(index.prefix_sum(0), 0);
    }

    #[test]
    fn test_set_updates_height() {
        let mut index = HeightIndex::from_heights([3, 4, 5]);
        assert!(index.set(1, 10));

        assert_eq!(index.prefix_sum(0), 3);
        assert_eq!(index.prefix_sum(1), 13);
        assert_eq!(index.prefix_sum(2), 18);
        assert_eq!(index.height(1), 10);
        assert_eq!(index.total(), 18);
    }

    #[test]
    fn test_out_of_range_probes_are_zero() {
        let mut index = HeightIndex::from_heights([3, 4]);
        assert_eq!(index.height(2), 0);
        assert_eq!(index.height(usize::MAX), 0);
        assert!(!index.set(5, 1));
        assert_eq!(index.total(), 7);
        assert_eq!(index.offset_of(2), 7);
        assert_eq!(index.offset_of(40), 7);
    }

    #[test]
    fn test_offset_of_is_exclusive_prefix() {
        let index = HeightIndex::from_heights([10, 20, 15]);
        assert_eq!(index.offset_of(0), 0);
        assert_eq!(index.offset_of(1), 10);
        assert_eq!(index.offset_of(2), 30);
        assert_eq!(index.offset_of(3), 45);
    }

    #[test]
    fn test_lower_bound_edge_cases() {
        let index = HeightIndex::from_heights([5, 5, 5]);
        assert_eq!(index.lower_bound(0), Some(0));
        assert_eq!(index.lower_bound(5), Some(1));
        assert_eq!(index.lower_bound(10), Some(2));
        assert_eq!(index.lower_bound(15), None);
        assert_eq!(HeightIndex::new(4).lower_bound(0), None);
    }

    #[test]
    fn test_push_past_capacity_keeps_sums() {
        let mut index = HeightIndex::new(1);
        for height in 1..=9 {
            index.push(height);
        }
        assert_eq!(index.total(), 45);
        assert_eq!(index.prefix_sum(4), 15);
        assert_eq!(index.offset_of(8), 36);
    }

    #[test]
    fn test_clear_and_reuse() {
        let mut index = HeightIndex::new(4);
        index.push(5);
        index.push(7);
        index.clear();

        index.push(10);
        assert_eq!(index.len(), 1);
        assert_eq!(index.total(), 10);
        index.push(1);
        assert_eq!(index.total(), 11);
    }

    #[test]
    fn test_truncate_then_push() {
        let mut index = HeightIndex::from_heights([1, 2, 3, 4]);
        index.truncate(2);
        assert_eq!(index.len(), 2);
        assert_eq!(index.total(), 3);
        index.push(10);
        assert_eq!(index.total(), 13);
        assert_eq!(index.height(2), 10);
    }

    #[test]
    fn test_zero_height_rows() {
        let index = HeightIndex::from_heights([0, 5, 0, 5]);
        assert_eq!(index.lower_bound(0), Some(1));
        assert_eq!(index.lower_bound(5), Some(3));
    }

    proptest! {
        /// prefix_sum(i) == sum(heights[0..=i]), whatever the growth pattern.
        #[test]
        fn prop_prefix_sum_is_cumulative(
            heights in prop::collection::vec(0usize..=100, 1..80),
            capacity in 0usize..8,
        ) {
            let mut index = HeightIndex::new(capacity);
            for &h in &heights {
                index.push(h);
            }

            let mut expected_sum = 0;
            for (i, &h) in heights.iter().enumerate() {
                expected_sum += h;
                prop_assert_eq!(index.prefix_sum(i), expected_sum);
            }
        }

        /// After set(i, h), height(i) == h and the total moves by the delta.
        #[test]
        fn prop_set_updates_height(
            heights in prop::collection::vec(1usize..=100, 1..50),
            update_index in 0usize..50,
            new_height in 0usize..=100
        ) {
            let mut index = HeightIndex::from_heights(heights.clone());
            if update_index < index.len() {
                let before = index.total();
                index.set(update_index, new_height);
                prop_assert_eq!(index.height(update_index), new_height);
                prop_assert_eq!(
                    index.total() + heights[update_index],
                    before + new_height
                );
            }
        }

        /// lower_bound(offset) is the row whose span contains offset.
        #[test]
        fn prop_lower_bound_contains_offset(
            heights in prop::collection::vec(1usize..=20, 1..40),
            probe in 0usize..1000,
        ) {
            let index = HeightIndex::from_heights(heights);
            match index.lower_bound(probe) {
                Some(row) => {
                    prop_assert!(index.offset_of(row) <= probe);
                    prop_assert!(probe < index.offset_of(row + 1));
                }
                None => prop_assert!(probe >= index.total()),
            }
        }
    }
}
