//! View-state layer - Flattening, windowing, and scrolling
//!
//! This module turns the event tree into the rows a host paints, and keeps
//! track of which slice of those rows is on screen.
//!
//! # Module Structure
//!
//! - `flatten`: TreeSource, FlatRow and decorated EventRow lists
//! - `search_matches`: SearchMatches - matching row indices and focused row
//! - `height_index`: HeightIndex - O(log n) prefix sums via Fenwick tree
//! - `heights_cache`: EventHeightsCache - measured event heights
//! - `row_height`: RowHeightProvider and its implementations
//! - `visible_range`: VisibleRange - result of visible range calculation
//! - `virtual_list`: VirtualList - scroll position and windowing
//! - `outline`: plain-text rendering of rows

pub mod flatten;
pub mod height_index;
pub mod heights_cache;
pub mod outline;
pub mod row_height;
pub mod search_matches;
pub mod virtual_list;
pub mod visible_range;

pub use flatten::{
    build_event_rows, event_contexts_at_rows, event_row, flatten, EventRow, FlatRow, TreeSource,
};
pub use height_index::HeightIndex;
pub use heights_cache::EventHeightsCache;
pub use outline::{render_outline, render_outline_window};
pub use row_height::{
    CachedEventRowHeights, FixedRowHeight, RowHeightProvider, WrappedTextRowHeight,
};
pub use search_matches::{compute_search_matches, SearchMatches};
pub use virtual_list::{
    ScrollAlignment, ScrollCallback, ScrollMetrics, VirtualList, DEFAULT_OVERSCAN,
};
pub use visible_range::VisibleRange;
