//! Tests for match navigation handler.

use super::*;
use crate::model::{EventDocument, SheetDocument};
use crate::state::selection::{clear_selection, select_event};

// ===== Test Helpers =====

/// Five top-level events, the third with two sub-events.
///
/// Pre-order positions: e0=0 e1=1 e2=2 e2a=3 e2b=4 e3=5 e4=6.
fn make_sheet() -> EventsSheet {
    let standard = || EventDocument::new("Standard");
    EventsSheet::from_document(&SheetDocument {
        events: vec![
            standard(),
            standard(),
            standard().with_sub_event(standard()).with_sub_event(standard()),
            standard(),
            standard(),
        ],
    })
}

fn has_results(results: Vec<EventId>, focus_offset: Option<usize>) -> SearchState {
    SearchState::HasResults {
        results,
        focus_offset,
    }
}

fn select(sheet: &EventsSheet, event: EventId) -> Selection {
    select_event(
        clear_selection(),
        sheet.event_context(event).unwrap(),
        false,
    )
}

// ===== Inactive states =====

#[test]
fn next_match_when_idle_does_nothing() {
    let sheet = make_sheet();
    let (state, focused) = next_match(SearchState::Idle, &sheet, &clear_selection());
    assert_eq!(state, SearchState::Idle);
    assert_eq!(focused, None);
}

#[test]
fn prev_match_when_editing_does_nothing() {
    let sheet = make_sheet();
    let (state, focused) = prev_match(SearchState::Editing, &sheet, &clear_selection());
    assert_eq!(state, SearchState::Editing);
    assert_eq!(focused, None);
}

#[test]
fn navigating_zero_results_resets_focus() {
    let sheet = make_sheet();
    let (state, focused) = next_match(has_results(vec![], Some(3)), &sheet, &clear_selection());
    assert_eq!(focused, None);
    assert_eq!(state.focus_offset(), None);
}

// ===== Initial offset =====

#[test]
fn first_step_without_selection_lands_on_first_result() {
    let sheet = make_sheet();
    let roots = sheet.roots().to_vec();
    let results = vec![roots[1], roots[3]];

    let (state, focused) = next_match(has_results(results, None), &sheet, &clear_selection());

    assert_eq!(focused, Some(roots[1]));
    assert_eq!(state.focus_offset(), Some(0));
}

#[test]
fn first_step_is_anchored_at_or_after_selection() {
    let sheet = make_sheet();
    let roots = sheet.roots().to_vec();
    let e2a = sheet.sub_events(roots[2])[0];
    let results = vec![roots[0], e2a, roots[4]];

    let selection = select(&sheet, roots[2]);
    let (state, focused) = next_match(has_results(results, None), &sheet, &selection);

    assert_eq!(
        focused,
        Some(e2a),
        "Nearest result after the selected event"
    );
    assert_eq!(state.focus_offset(), Some(1));
}

#[test]
fn selected_result_is_its_own_anchor() {
    let sheet = make_sheet();
    let roots = sheet.roots().to_vec();
    let results = vec![roots[1], roots[3]];
    let selection = select(&sheet, roots[3]);

    assert_eq!(initial_focus_offset(&sheet, &selection, &results), 1);
}

#[test]
fn anchor_past_last_result_wraps_to_zero() {
    let sheet = make_sheet();
    let roots = sheet.roots().to_vec();
    let results = vec![roots[0], roots[1]];
    let selection = select(&sheet, roots[4]);

    assert_eq!(initial_focus_offset(&sheet, &selection, &results), 0);
}

#[test]
fn stale_results_never_qualify_as_anchor() {
    let mut sheet = make_sheet();
    let roots = sheet.roots().to_vec();
    let results = vec![roots[0], roots[3], roots[4]];
    let selection = select(&sheet, roots[2]);
    sheet.remove_event(roots[3]).unwrap();

    assert_eq!(initial_focus_offset(&sheet, &selection, &results), 2);
}

#[test]
fn removed_anchor_falls_back_to_zero() {
    let mut sheet = make_sheet();
    let roots = sheet.roots().to_vec();
    let results = vec![roots[0], roots[4]];
    let selection = select(&sheet, roots[3]);
    sheet.remove_event(roots[3]).unwrap();

    assert_eq!(initial_focus_offset(&sheet, &selection, &results), 0);
}

#[test]
fn first_step_backward_is_also_anchored() {
    let sheet = make_sheet();
    let roots = sheet.roots().to_vec();
    let results = vec![roots[0], roots[3], roots[4]];
    let selection = select(&sheet, roots[2]);

    let (state, focused) = prev_match(has_results(results, None), &sheet, &selection);
    assert_eq!(focused, Some(roots[3]));
    assert_eq!(state.focus_offset(), Some(1));
}

// ===== Wrapping =====

#[test]
fn next_match_wraps_to_first() {
    let sheet = make_sheet();
    let roots = sheet.roots().to_vec();
    let results = vec![roots[0], roots[1], roots[2]];

    let (state, focused) = next_match(has_results(results, Some(2)), &sheet, &clear_selection());
    assert_eq!(focused, Some(roots[0]));
    assert_eq!(state.focus_offset(), Some(0));
}

#[test]
fn prev_match_wraps_to_last() {
    let sheet = make_sheet();
    let roots = sheet.roots().to_vec();
    let results = vec![roots[0], roots[1], roots[2]];

    let (state, focused) = prev_match(has_results(results, Some(0)), &sheet, &clear_selection());
    assert_eq!(focused, Some(roots[2]));
    assert_eq!(state.focus_offset(), Some(2));
}

#[test]
fn n_further_steps_return_to_anchored_result() {
    let sheet = make_sheet();
    let roots = sheet.roots().to_vec();
    let results = vec![roots[0], roots[1], roots[3], roots[4]];
    let selection = select(&sheet, roots[2]);

    let (mut state, anchored) = next_match(has_results(results.clone(), None), &sheet, &selection);
    assert_eq!(anchored, Some(roots[3]));

    let mut last = None;
    for _ in 0..results.len() {
        let (next_state, focused) = next_match(state, &sheet, &selection);
        state = next_state;
        last = focused;
    }
    assert_eq!(last, anchored);
}
