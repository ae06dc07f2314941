//! Row height providers for the virtual list.
//!
//! Every provider is total: a row index past the end has height 0, since
//! scroll physics probe indices speculatively.

use unicode_width::UnicodeWidthStr;

use super::flatten::EventRow;
use super::heights_cache::EventHeightsCache;
use crate::model::{EventId, EventsSheet};
use crate::state::search::SentenceFormatter;

/// Heights of the rows of a virtual list.
pub trait RowHeightProvider {
    /// Number of rows.
    fn row_count(&self) -> usize;

    /// Height of `row` in lines, 0 when out of range.
    fn row_height(&self, row: usize) -> usize;
}

/// Every row has the same height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRowHeight {
    /// Number of rows.
    pub rows: usize,
    /// Height of each row.
    pub height: usize,
}

impl RowHeightProvider for FixedRowHeight {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn row_height(&self, row: usize) -> usize {
        if row < self.rows {
            self.height
        } else {
            0
        }
    }
}

/// Measured event heights, with estimates for rows not measured yet.
#[derive(Debug, Clone, Copy)]
pub struct CachedEventRowHeights<'a, E = FixedRowHeight> {
    rows: &'a [EventRow],
    cache: &'a EventHeightsCache,
    estimates: E,
}

impl<'a> CachedEventRowHeights<'a> {
    /// Heights of `rows` from `cache`, `estimate` when unmeasured.
    pub fn new(rows: &'a [EventRow], cache: &'a EventHeightsCache, estimate: usize) -> Self {
        let estimates = FixedRowHeight {
            rows: rows.len(),
            height: estimate,
        };
        Self::with_estimates(rows, cache, estimates)
    }
}

impl<'a, E: RowHeightProvider> CachedEventRowHeights<'a, E> {
    /// Heights of `rows` from `cache`, falling back to `estimates` for
    /// the same row index.
    pub fn with_estimates(
        rows: &'a [EventRow],
        cache: &'a EventHeightsCache,
        estimates: E,
    ) -> Self {
        Self {
            rows,
            cache,
            estimates,
        }
    }
}

impl<E: RowHeightProvider> RowHeightProvider for CachedEventRowHeights<'_, E> {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row_height(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, |event_row| {
            self.cache
                .event_height(event_row.event())
                .unwrap_or_else(|| self.estimates.row_height(row))
        })
    }
}

/// Estimates row heights from the text each row shows, wrapped at the
/// available width.
#[derive(Debug, Clone)]
pub struct WrappedTextRowHeight {
    texts: Vec<(usize, Vec<String>)>,
    width: usize,
    indent_width: usize,
}

impl WrappedTextRowHeight {
    /// Rows given as `(depth, lines)`.
    pub fn new(texts: Vec<(usize, Vec<String>)>, width: usize, indent_width: usize) -> Self {
        Self {
            texts,
            width,
            indent_width,
        }
    }

    /// Rows of an event sheet, each showing [`event_text_lines`].
    pub fn for_event_rows(
        sheet: &EventsSheet,
        rows: &[EventRow],
        formatter: &dyn SentenceFormatter,
        width: usize,
        indent_width: usize,
    ) -> Self {
        let texts = rows
            .iter()
            .map(|row| (row.row.depth, event_text_lines(sheet, row.event(), formatter)))
            .collect();
        Self::new(texts, width, indent_width)
    }
}

impl RowHeightProvider for WrappedTextRowHeight {
    fn row_count(&self) -> usize {
        self.texts.len()
    }

    fn row_height(&self, row: usize) -> usize {
        let Some((depth, lines)) = self.texts.get(row) else {
            return 0;
        };
        let available = self
            .width
            .saturating_sub(depth * self.indent_width)
            .max(1);
        lines
            .iter()
            .map(|line| wrapped_line_count(line, available))
            .sum::<usize>()
            .max(1)
    }
}

/// Number of lines `text` takes when wrapped at `width` columns.
///
/// Empty lines still take one line.
pub fn wrapped_line_count(text: &str, width: usize) -> usize {
    let width = width.max(1);
    text.lines()
        .map(|line| UnicodeWidthStr::width(line).div_ceil(width).max(1))
        .sum::<usize>()
        .max(1)
}

/// Text lines an event shows: its strings, then conditions, then actions.
pub fn event_text_lines(
    sheet: &EventsSheet,
    event: EventId,
    formatter: &dyn SentenceFormatter,
) -> Vec<String> {
    let strings = sheet.event_strings(event).iter().cloned();
    let conditions = sheet
        .conditions(event)
        .iter()
        .map(|id| formatter.sentence(sheet, *id, true));
    let actions = sheet
        .actions(event)
        .iter()
        .map(|id| formatter.sentence(sheet, *id, false));
    strings.chain(conditions).chain(actions).collect()
}
