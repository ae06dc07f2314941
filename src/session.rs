//! Editing session over one events sheet.
//!
//! [`SheetSession`] wires the pure pieces together: selection transitions,
//! the searcher, folding, and the virtual list showing the flattened rows.
//! Rows are rebuilt lazily, only when the sheet, the selection or the search
//! state changed since the last build.

use tracing::{debug, warn};

use crate::config::ResolvedConfig;
use crate::model::{
    EventId, EventsSheet, InstructionId, InstructionsListContext, InstructionsListId,
};
use crate::state::search::{EventsSearcher, PlainSentenceFormatter, SearchInEventsInputs};
use crate::state::selection::{self, Selection};
use crate::state::unfolder;
use crate::view_state::flatten::{build_event_rows, event_row, EventRow};
use crate::view_state::heights_cache::EventHeightsCache;
use crate::view_state::outline::render_outline_window;
use crate::view_state::row_height::{CachedEventRowHeights, WrappedTextRowHeight};
use crate::view_state::search_matches::{compute_search_matches, SearchMatches};
use crate::view_state::virtual_list::{ScrollAlignment, VirtualList, DEFAULT_OVERSCAN};

/// Layout parameters of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Viewport height in lines.
    pub viewport_height: usize,
    /// Rows rendered above and below the viewport.
    pub overscan: usize,
    /// Height assumed for events not measured yet.
    pub default_row_height: usize,
    /// Columns lost per nesting level.
    pub indent_width: usize,
    /// Columns available to event text. When set, unmeasured events are
    /// estimated from their wrapped text instead of `default_row_height`.
    pub text_width: Option<usize>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            viewport_height: 24,
            overscan: DEFAULT_OVERSCAN,
            default_row_height: 1,
            indent_width: 3,
            text_width: None,
        }
    }
}

impl From<&ResolvedConfig> for SessionOptions {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            viewport_height: config.viewport_height,
            overscan: config.overscan_count,
            default_row_height: config.default_row_height,
            indent_width: config.indent_width,
            text_width: config.text_width,
        }
    }
}

/// Inputs the cached rows were built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RowsKey {
    revision: u64,
    selection: u64,
    search: u64,
}

/// One sheet with its selection, search results and viewport.
#[derive(Debug)]
pub struct SheetSession {
    sheet: EventsSheet,
    selection: Selection,
    selection_generation: u64,
    searcher: EventsSearcher,
    list: VirtualList,
    heights: EventHeightsCache,
    options: SessionOptions,
    rows: Vec<EventRow>,
    rows_key: Option<RowsKey>,
    laid_out_revision: Option<u64>,
}

impl SheetSession {
    /// Starts a session with an empty selection and no search results.
    pub fn new(sheet: EventsSheet, options: SessionOptions) -> Self {
        Self {
            sheet,
            selection: selection::get_initial_selection(),
            selection_generation: 0,
            searcher: EventsSearcher::new(),
            list: VirtualList::new(options.viewport_height).with_overscan(options.overscan),
            heights: EventHeightsCache::new(),
            options,
            rows: Vec::new(),
            rows_key: None,
            laid_out_revision: None,
        }
    }

    // ===== Accessors =====

    /// The sheet.
    pub fn sheet(&self) -> &EventsSheet {
        &self.sheet
    }

    /// Mutable sheet. Rows are rebuilt on the next read if it changed.
    pub fn sheet_mut(&mut self) -> &mut EventsSheet {
        &mut self.sheet
    }

    /// Ends the session, returning the sheet.
    pub fn into_sheet(self) -> EventsSheet {
        self.sheet
    }

    /// Current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Search state.
    pub fn searcher(&self) -> &EventsSearcher {
        &self.searcher
    }

    /// Viewport state.
    pub fn virtual_list(&self) -> &VirtualList {
        &self.list
    }

    /// Mutable viewport state, for scroll input and callbacks.
    pub fn virtual_list_mut(&mut self) -> &mut VirtualList {
        &mut self.list
    }

    /// Flattened, decorated rows.
    pub fn rows(&mut self) -> &[EventRow] {
        self.refresh_rows();
        &self.rows
    }

    // ===== Selection =====

    /// Selects an event. Returns `false` if the event is not in the sheet.
    pub fn select_event(&mut self, event: EventId, multi_selection: bool) -> bool {
        let Some(context) = self.sheet.event_context(event) else {
            return false;
        };
        let previous = std::mem::take(&mut self.selection);
        self.set_selection(selection::select_event(previous, context, multi_selection));
        true
    }

    /// Selects an instruction. Returns `false` if it is not in the sheet.
    pub fn select_instruction(
        &mut self,
        instruction: InstructionId,
        multi_selection: bool,
    ) -> bool {
        let Some(context) = self.sheet.instruction_context(instruction) else {
            return false;
        };
        let Some(event_context) = self
            .sheet
            .owning_event(instruction)
            .and_then(|event| self.sheet.event_context(event))
        else {
            return false;
        };
        let previous = std::mem::take(&mut self.selection);
        self.set_selection(selection::select_instruction(
            event_context,
            previous,
            context,
            multi_selection,
        ));
        true
    }

    /// Selects a conditions or actions list. Returns `false` if its owner is
    /// not in the sheet.
    pub fn select_instructions_list(
        &mut self,
        list: InstructionsListId,
        multi_selection: bool,
    ) -> bool {
        let owner = match list {
            InstructionsListId::Conditions(event) | InstructionsListId::Actions(event) => {
                Some(event)
            }
            InstructionsListId::SubInstructions(instruction) => {
                self.sheet.owning_event(instruction)
            }
        };
        let Some(event_context) = owner.and_then(|event| self.sheet.event_context(event)) else {
            return false;
        };
        let context = InstructionsListContext {
            is_condition: self.sheet.is_conditions_list(list),
            instrs_list: list,
        };
        let previous = std::mem::take(&mut self.selection);
        self.set_selection(selection::select_instructions_list(
            event_context,
            previous,
            context,
            multi_selection,
        ));
        true
    }

    /// Empties the selection.
    pub fn clear_selection(&mut self) {
        self.set_selection(selection::clear_selection());
    }

    fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
        self.selection_generation = self.selection_generation.wrapping_add(1);
    }

    // ===== Search =====

    /// Searches the sheet. Returns the number of matching events.
    pub fn search(&mut self, inputs: &SearchInEventsInputs) -> usize {
        let mut count = 0;
        self.searcher
            .search_in_events(&self.sheet, inputs, |results| count = results.len());
        count
    }

    /// Replaces in the sheet. Returns the modified events.
    pub fn replace(&mut self, inputs: &SearchInEventsInputs) -> Vec<EventId> {
        self.searcher.replace_in_events(&mut self.sheet, inputs)
    }

    /// Focuses the next result, unfolds its ancestors and requests a
    /// centered scroll to it.
    pub fn go_to_next_search_result(&mut self) -> Option<EventId> {
        let focused = self
            .searcher
            .go_to_next_search_result(&self.sheet, &self.selection);
        self.reveal(focused)
    }

    /// Focuses the previous result, unfolds its ancestors and requests a
    /// centered scroll to it.
    pub fn go_to_previous_search_result(&mut self) -> Option<EventId> {
        let focused = self
            .searcher
            .go_to_previous_search_result(&self.sheet, &self.selection);
        self.reveal(focused)
    }

    /// Drops the search results.
    pub fn clear_search_results(&mut self) {
        self.searcher.clear_search_results();
    }

    /// Visible rows holding search results, and the focused one.
    ///
    /// Results hidden in folded subtrees have no row, so the focus is
    /// resolved among the visible matches only.
    pub fn search_matches(&mut self) -> SearchMatches {
        self.refresh_rows();
        let focus_offset = self
            .rows
            .iter()
            .filter(|row| row.highlighted)
            .position(|row| row.focused);
        compute_search_matches(&self.rows, |row, _: &()| row.highlighted, &(), focus_offset)
    }

    fn reveal(&mut self, focused: Option<EventId>) -> Option<EventId> {
        let event = focused?;
        if !unfolder::unfold_when_containing(&mut self.sheet, event) {
            warn!(?event, "Focused search result is no longer in the sheet");
            return None;
        }
        self.refresh_rows();
        if let Some(row) = event_row(&self.rows, event) {
            self.list.scroll_to_row(row, ScrollAlignment::Center);
        }
        Some(event)
    }

    // ===== Folding and edits =====

    /// Flips the folded flag of `event`. Returns `false` if it is unknown.
    pub fn toggle_folded(&mut self, event: EventId) -> bool {
        let folded = self.sheet.is_folded(event);
        self.sheet.set_folded(event, !folded).is_ok()
    }

    /// Folds every event owning sub-events.
    pub fn fold_all(&mut self) {
        unfolder::fold_all(&mut self.sheet);
    }

    /// Unfolds events down to depth `level`.
    pub fn unfold_to_level(&mut self, level: usize) {
        unfolder::unfold_to_level(&mut self.sheet, level);
    }

    /// Flips the disabled flag of `event`. Returns `false` if it is unknown.
    pub fn toggle_disabled(&mut self, event: EventId) -> bool {
        let disabled = self.sheet.is_disabled(event);
        self.sheet.set_disabled(event, !disabled).is_ok()
    }

    /// Deletes the outermost selected events and the selected instructions,
    /// then clears the selection. Returns the number of removed nodes.
    pub fn delete_selection(&mut self) -> usize {
        let events =
            selection::get_selected_top_most_only_event_contexts(&self.selection, &self.sheet);
        let instructions = selection::get_selected_instructions(&self.selection);

        // Instructions first: some may belong to events removed below.
        let removed_instructions = instructions
            .into_iter()
            .filter(|instruction| self.sheet.remove_instruction(*instruction).is_ok())
            .count();
        let removed_events = events
            .iter()
            .filter(|context| self.sheet.remove_event(context.event).is_ok())
            .count();

        debug!(removed_events, removed_instructions, "Deleted selection");
        self.clear_selection();
        removed_events + removed_instructions
    }

    // ===== Layout =====

    /// Records a measured event height, recomputing offsets from its row
    /// when the height changed.
    pub fn set_event_height(&mut self, event: EventId, height: usize) {
        if !self.heights.set_event_height(event, height) {
            return;
        }
        self.refresh_rows();
        if let Some(row) = event_row(&self.rows, event) {
            self.recompute_heights_from(row);
        }
    }

    /// Notifies that the rows were painted; applies a pending scroll request.
    pub fn on_rendered(&mut self) {
        self.refresh_rows();
        self.list.mark_rendered();
    }

    /// Outline of the rows in the viewport.
    pub fn visible_outline(&mut self) -> String {
        self.refresh_rows();
        let range = self.list.visible_range();
        render_outline_window(
            &self.sheet,
            &self.rows,
            range.indices(),
            &PlainSentenceFormatter,
        )
    }

    /// Row heights from `row` on: measured heights, else the configured
    /// estimate.
    fn recompute_heights_from(&mut self, row: usize) {
        match self.options.text_width {
            Some(width) => {
                let estimates = WrappedTextRowHeight::for_event_rows(
                    &self.sheet,
                    &self.rows,
                    &PlainSentenceFormatter,
                    width,
                    self.options.indent_width,
                );
                let provider =
                    CachedEventRowHeights::with_estimates(&self.rows, &self.heights, estimates);
                self.list.recompute_row_heights(row, &provider);
            }
            None => {
                let provider = CachedEventRowHeights::new(
                    &self.rows,
                    &self.heights,
                    self.options.default_row_height,
                );
                self.list.recompute_row_heights(row, &provider);
            }
        }
    }

    fn refresh_rows(&mut self) {
        let key = RowsKey {
            revision: self.sheet.revision(),
            selection: self.selection_generation,
            search: self.searcher.generation(),
        };
        if self.rows_key == Some(key) {
            return;
        }

        self.rows = build_event_rows(&self.sheet, &self.selection, &self.searcher);
        self.rows_key = Some(key);

        if self.laid_out_revision != Some(key.revision) {
            let sheet = &self.sheet;
            self.heights.retain(|event| sheet.contains_event(event));
            self.recompute_heights_from(0);
            self.laid_out_revision = Some(key.revision);
        }
        debug!(rows = self.rows.len(), "Rebuilt rows");
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
