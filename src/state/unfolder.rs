//! Bulk fold and unfold operations on an events sheet.

use tracing::debug;

use crate::model::{EventId, EventsSheet};

/// Folds every event owning sub-events, at any depth.
pub fn fold_all(sheet: &mut EventsSheet) {
    let mut stack: Vec<EventId> = sheet.roots().to_vec();
    let mut folded = 0usize;
    while let Some(event) = stack.pop() {
        let children = sheet.sub_events(event).to_vec();
        if !children.is_empty() && sheet.set_folded(event, true).is_ok() {
            folded += 1;
        }
        stack.extend(children);
    }
    debug!(folded, "Folded all events");
}

/// Unfolds events from the top level down to depth `max_level` included.
///
/// Deeper events keep their folded state. Returns how many events were
/// folded before.
pub fn unfold_to_level(sheet: &mut EventsSheet, max_level: usize) -> usize {
    let mut stack: Vec<(EventId, usize)> = sheet.roots().iter().map(|id| (*id, 0)).collect();
    let mut unfolded = 0usize;
    while let Some((event, level)) = stack.pop() {
        if level > max_level {
            continue;
        }
        if sheet.is_folded(event) && sheet.set_folded(event, false).is_ok() {
            unfolded += 1;
        }
        if sheet.can_have_sub_events(event) {
            stack.extend(sheet.sub_events(event).iter().map(|id| (*id, level + 1)));
        }
    }
    debug!(max_level, unfolded, "Unfolded to level");
    unfolded
}

/// Unfolds every ancestor of `event` so that it appears in the flattened rows.
///
/// Returns `false` when the event is not in the sheet.
pub fn unfold_when_containing(sheet: &mut EventsSheet, event: EventId) -> bool {
    if !sheet.contains_event(event) {
        return false;
    }
    let mut current = sheet.parent_event(event);
    while let Some(ancestor) = current {
        if sheet.set_folded(ancestor, false).is_err() {
            return false;
        }
        current = sheet.parent_event(ancestor);
    }
    true
}

// ===== Tests =====
