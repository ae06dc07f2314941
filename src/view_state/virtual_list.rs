//! Windowed list of rows with heterogeneous heights.
//!
//! [`VirtualList`] owns the cumulative row heights and the scroll position.
//! It decides which rows intersect the viewport and answers imperative
//! scroll requests. Scroll requests issued before the first render are kept
//! (the last one wins) and applied by [`VirtualList::mark_rendered`].

use std::fmt;

use tracing::{debug, trace};

use super::height_index::HeightIndex;
use super::row_height::RowHeightProvider;
use super::visible_range::VisibleRange;

/// Rows rendered above and below the viewport.
pub const DEFAULT_OVERSCAN: usize = 20;

/// Where a row lands in the viewport after [`VirtualList::scroll_to_row`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollAlignment {
    /// Scroll as little as possible to make the row fully visible.
    #[default]
    Auto,
    /// Row at the top of the viewport.
    Start,
    /// Row centered in the viewport.
    Center,
    /// Row at the bottom of the viewport.
    End,
}

/// Scroll state reported to the host after every scroll change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollMetrics {
    /// Offset of the viewport top.
    pub scroll_top: usize,
    /// Total height of all rows.
    pub scroll_height: usize,
    /// Height of the viewport.
    pub client_height: usize,
}

/// Host callback receiving scroll changes.
pub type ScrollCallback = Box<dyn FnMut(ScrollMetrics)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScrollCommand {
    ToRow { row: usize, alignment: ScrollAlignment },
    By(i64),
    To(usize),
}

/// Scroll state and row geometry of a windowed list.
pub struct VirtualList {
    heights: HeightIndex,
    client_height: usize,
    scroll_top: usize,
    overscan: usize,
    on_scroll: Option<ScrollCallback>,
    pending: Option<ScrollCommand>,
    rendered: bool,
}

impl fmt::Debug for VirtualList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualList")
            .field("rows", &self.heights.len())
            .field("client_height", &self.client_height)
            .field("scroll_top", &self.scroll_top)
            .field("overscan", &self.overscan)
            .field("pending", &self.pending)
            .field("rendered", &self.rendered)
            .finish_non_exhaustive()
    }
}

impl Default for VirtualList {
    fn default() -> Self {
        Self::new(0)
    }
}

impl VirtualList {
    /// Creates an empty list with a viewport of `client_height` lines.
    pub fn new(client_height: usize) -> Self {
        Self {
            heights: HeightIndex::default(),
            client_height,
            scroll_top: 0,
            overscan: DEFAULT_OVERSCAN,
            on_scroll: None,
            pending: None,
            rendered: false,
        }
    }

    /// Sets the overscan margin.
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    /// Registers the scroll callback, replacing any previous one.
    pub fn on_scroll(&mut self, callback: impl FnMut(ScrollMetrics) + 'static) {
        self.on_scroll = Some(Box::new(callback));
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.heights.len()
    }

    /// Height of `row`, 0 when out of range.
    pub fn row_height(&self, row: usize) -> usize {
        self.heights.height(row)
    }

    /// Offset of the top of `row`; the total height past the end.
    pub fn row_offset(&self, row: usize) -> usize {
        self.heights.offset_of(row)
    }

    /// Current scroll offset.
    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    /// Total height of all rows.
    pub fn scroll_height(&self) -> usize {
        self.heights.total()
    }

    /// Viewport height.
    pub fn client_height(&self) -> usize {
        self.client_height
    }

    /// Overscan margin in rows.
    pub fn overscan(&self) -> usize {
        self.overscan
    }

    /// Current scroll state.
    pub fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top: self.scroll_top,
            scroll_height: self.scroll_height(),
            client_height: self.client_height,
        }
    }

    /// Largest valid scroll offset.
    pub fn max_scroll_top(&self) -> usize {
        self.scroll_height().saturating_sub(self.client_height)
    }

    /// Whether the viewport shows the first line.
    pub fn is_scrolled_top(&self) -> bool {
        self.scroll_top == 0
    }

    /// Whether the viewport shows the last line.
    pub fn is_scrolled_bottom(&self) -> bool {
        self.scroll_top >= self.max_scroll_top()
    }

    /// Whether the first render happened.
    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    /// Resizes the viewport, keeping the scroll offset in range.
    pub fn set_client_height(&mut self, client_height: usize) {
        self.client_height = client_height;
        self.apply_scroll_top(self.scroll_top);
    }

    /// Row under the vertical offset `offset`, `None` past the end.
    pub fn row_at_offset(&self, offset: usize) -> Option<usize> {
        self.heights.lower_bound(offset)
    }

    /// Rows intersecting the viewport, extended by the overscan margin.
    pub fn visible_range(&self) -> VisibleRange {
        let row_count = self.row_count();
        if row_count == 0 {
            return VisibleRange::new(0, 0, self.scroll_top, self.client_height);
        }

        let start = self.row_at_offset(self.scroll_top).unwrap_or(row_count);
        let end = if self.client_height == 0 {
            start
        } else {
            let last_line = self.scroll_top + self.client_height - 1;
            self.row_at_offset(last_line)
                .map_or(row_count, |row| row + 1)
                .max(start)
        };

        VisibleRange::new(start, end, self.scroll_top, self.client_height)
            .with_overscan(self.overscan, row_count)
    }

    /// Reloads heights from row `from` onward; earlier rows keep theirs.
    ///
    /// Must be called whenever rows are added, removed, or change height.
    pub fn recompute_row_heights(&mut self, from: usize, provider: &impl RowHeightProvider) {
        let row_count = provider.row_count();
        let from = from.min(row_count).min(self.heights.len());
        self.heights.truncate(from);
        for row in from..row_count {
            self.heights.push(provider.row_height(row));
        }
        trace!(from, row_count, total = self.heights.total(), "Recomputed row heights");
        self.apply_scroll_top(self.scroll_top);
    }

    /// Brings `row` into view. Rows past the end clamp to the last row.
    pub fn scroll_to_row(&mut self, row: usize, alignment: ScrollAlignment) {
        self.run(ScrollCommand::ToRow { row, alignment });
    }

    /// Scrolls by `delta` lines (negative scrolls up).
    pub fn scroll_by(&mut self, delta: i64) {
        self.run(ScrollCommand::By(delta));
    }

    /// Scrolls to the absolute offset `offset`.
    pub fn scroll_to(&mut self, offset: usize) {
        self.run(ScrollCommand::To(offset));
    }

    /// Notifies that the list was rendered; replays a buffered scroll request.
    pub fn mark_rendered(&mut self) {
        self.rendered = true;
        if let Some(command) = self.pending.take() {
            debug!(?command, "Replaying scroll request issued before render");
            self.execute(command);
        }
    }

    fn run(&mut self, command: ScrollCommand) {
        if self.rendered {
            self.execute(command);
        } else {
            self.pending = Some(command);
        }
    }

    fn execute(&mut self, command: ScrollCommand) {
        let target = match command {
            ScrollCommand::ToRow { row, alignment } => {
                let Some(last) = self.row_count().checked_sub(1) else {
                    return;
                };
                self.row_target(row.min(last), alignment)
            }
            ScrollCommand::By(delta) => {
                let magnitude = usize::try_from(delta.unsigned_abs()).unwrap_or(usize::MAX);
                if delta < 0 {
                    self.scroll_top.saturating_sub(magnitude)
                } else {
                    self.scroll_top.saturating_add(magnitude)
                }
            }
            ScrollCommand::To(offset) => offset,
        };
        self.apply_scroll_top(target);
    }

    fn row_target(&self, row: usize, alignment: ScrollAlignment) -> usize {
        let top = self.heights.offset_of(row);
        let bottom = top + self.heights.height(row);
        match alignment {
            ScrollAlignment::Start => top,
            ScrollAlignment::End => bottom.saturating_sub(self.client_height),
            ScrollAlignment::Center => (top + bottom)
                .saturating_sub(self.client_height)
                / 2,
            ScrollAlignment::Auto => {
                if top < self.scroll_top {
                    top
                } else if bottom > self.scroll_top + self.client_height {
                    bottom.saturating_sub(self.client_height)
                } else {
                    self.scroll_top
                }
            }
        }
    }

    fn apply_scroll_top(&mut self, target: usize) {
        let clamped = target.min(self.max_scroll_top());
        if clamped == self.scroll_top {
            return;
        }
        self.scroll_top = clamped;
        let metrics = self.metrics();
        if let Some(callback) = self.on_scroll.as_mut() {
            callback(metrics);
        }
    }
}

#[cfg(test)]
#[path = "virtual_list_tests.rs"]
mod tests;
