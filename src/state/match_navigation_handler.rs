//! Match navigation handler.
//!
//! Pure functions for navigating between search results.
//! Handles next/prev navigation with wrap-around and the anchored first step.

use tracing::debug;

use crate::model::{EventId, EventsSheet};
use crate::state::position_finder::find_positions;
use crate::state::search::SearchState;
use crate::state::selection::{get_selected_events, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Next,
    Previous,
}

// ===== Public API =====

/// Navigate to the next search result.
///
/// Behavior:
/// - Outside `HasResults`, does nothing and returns `None`
/// - With zero results, resets the focus and returns `None`
/// - Without a focus yet, lands on the anchored result (see [`initial_focus_offset`])
/// - Otherwise increments the focus, wrapping from last to first
pub fn next_match(
    state: SearchState,
    sheet: &EventsSheet,
    selection: &Selection,
) -> (SearchState, Option<EventId>) {
    step(state, sheet, selection, Direction::Next)
}

/// Navigate to the previous search result.
///
/// Same as [`next_match`] but decrements, wrapping from first to last.
pub fn prev_match(
    state: SearchState,
    sheet: &EventsSheet,
    selection: &Selection,
) -> (SearchState, Option<EventId>) {
    step(state, sheet, selection, Direction::Previous)
}

/// Index of the first result at or after the first selected event.
///
/// Positions come from the pre-order linearization of the whole sheet.
/// Results no longer in the sheet never qualify. Falls back to 0 when nothing
/// is selected, the selected event is gone, or no result qualifies.
pub fn initial_focus_offset(
    sheet: &EventsSheet,
    selection: &Selection,
    results: &[EventId],
) -> usize {
    let Some(anchor) = get_selected_events(selection).first().copied() else {
        return 0;
    };

    let mut targets = Vec::with_capacity(results.len() + 1);
    targets.push(anchor);
    targets.extend_from_slice(results);
    let positions = find_positions(sheet, &targets);

    let Some(anchor_position) = positions.first().copied().flatten() else {
        return 0;
    };
    positions[1..]
        .iter()
        .position(|position| position.is_some_and(|p| p >= anchor_position))
        .unwrap_or(0)
}

// ===== Helper Functions =====

fn step(
    state: SearchState,
    sheet: &EventsSheet,
    selection: &Selection,
    direction: Direction,
) -> (SearchState, Option<EventId>) {
    let (results, focus_offset) = match state {
        SearchState::HasResults {
            results,
            focus_offset,
        } => (results, focus_offset),
        other => return (other, None),
    };

    if results.is_empty() {
        return (
            SearchState::HasResults {
                results,
                focus_offset: None,
            },
            None,
        );
    }

    let len = results.len();
    let offset = match (focus_offset, direction) {
        (None, _) => initial_focus_offset(sheet, selection, &results),
        (Some(current), Direction::Next) => (current + 1) % len,
        (Some(current), Direction::Previous) => (current % len + len - 1) % len,
    };
    let focused = results[offset];
    debug!(offset, len, ?direction, "Focused search result");

    (
        SearchState::HasResults {
            results,
            focus_offset: Some(offset),
        },
        Some(focused),
    )
}

// ===== Tests =====

#[cfg(test)]
#[path = "match_navigation_handler_tests.rs"]
mod tests;
