//! Linearization of the events tree.
//!
//! Positions come from a single depth-first, pre-order walk of the whole
//! sheet. Folding is ignored: the order is that of the conceptual tree, so
//! positions of events in unrelated branches can be compared directly.

use std::collections::HashMap;

use crate::model::{EventId, EventsSheet};

/// Finds the pre-order position of each target.
///
/// The result is aligned with `targets`: `None` marks a target that is not
/// in the sheet (removed, or never part of it). Duplicate targets share the
/// same position.
pub fn find_positions(sheet: &EventsSheet, targets: &[EventId]) -> Vec<Option<usize>> {
    if targets.is_empty() {
        return Vec::new();
    }

    let mut wanted: HashMap<EventId, Option<usize>> =
        targets.iter().map(|target| (*target, None)).collect();
    let mut remaining = wanted.len();

    let mut position = 0usize;
    let mut stack: Vec<EventId> = sheet.roots().iter().rev().copied().collect();
    while let Some(event) = stack.pop() {
        if let Some(slot) = wanted.get_mut(&event) {
            *slot = Some(position);
            remaining -= 1;
            if remaining == 0 {
                break;
            }
        }
        position += 1;
        stack.extend(sheet.sub_events(event).iter().rev().copied());
    }

    targets
        .iter()
        .map(|target| wanted.get(target).copied().flatten())
        .collect()
}

// ===== Tests =====
