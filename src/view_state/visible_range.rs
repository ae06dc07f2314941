//! Visible range calculation result

/// Rows of a virtual list intersecting the viewport.
///
/// Computed via binary search on cumulative row offsets. The rendered range
/// extends the visible one by the overscan margin on both sides.
///
/// # Invariants
/// - `render_start <= start_index <= end_index <= render_end`
/// - `render_end <= row count`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibleRange {
    /// Index of first visible row (inclusive).
    pub start_index: usize,
    /// Index of last visible row (exclusive).
    pub end_index: usize,
    /// First row to render, overscan included.
    pub render_start: usize,
    /// Last row to render (exclusive), overscan included.
    pub render_end: usize,
    /// Scroll offset the range was computed for.
    pub scroll_top: usize,
    /// Viewport height in lines.
    pub viewport_height: usize,
}

impl VisibleRange {
    /// Create new visible range, rendering exactly the visible rows.
    ///
    /// # Panics
    /// In debug builds, panics if start_index > end_index.
    pub fn new(
        start_index: usize,
        end_index: usize,
        scroll_top: usize,
        viewport_height: usize,
    ) -> Self {
        debug_assert!(
            start_index <= end_index,
            "start_index ({start_index}) must be <= end_index ({end_index})"
        );
        Self {
            start_index,
            end_index,
            render_start: start_index,
            render_end: end_index,
            scroll_top,
            viewport_height,
        }
    }

    /// Extends the rendered rows by `overscan` on both sides, within `row_count`.
    pub fn with_overscan(mut self, overscan: usize, row_count: usize) -> Self {
        self.render_start = self.start_index.saturating_sub(overscan);
        self.render_end = self
            .end_index
            .saturating_add(overscan)
            .min(row_count)
            .max(self.end_index);
        self
    }

    /// Number of visible rows.
    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    /// Check if range is empty.
    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }

    /// Iterate over visible row indices.
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        self.start_index..self.end_index
    }

    /// Iterate over rendered row indices, overscan included.
    pub fn rendered_indices(&self) -> impl Iterator<Item = usize> {
        self.render_start..self.render_end
    }

    /// Check if a specific row is visible.
    pub fn contains(&self, index: usize) -> bool {
        (self.start_index..self.end_index).contains(&index)
    }

    /// Check if a specific row is rendered.
    pub fn is_rendered(&self, index: usize) -> bool {
        (self.render_start..self.render_end).contains(&index)
    }
}
