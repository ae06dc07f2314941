//! Selection model (pure).
//!
//! A [`Selection`] records selected events, instructions and instruction
//! lists, each keyed by identity and ordered by insertion. Every transition
//! takes the previous selection by value and returns the next one.
//!
//! A plain click replaces the whole selection (`multi_selection = false`
//! clears all three maps before inserting). A modifier click adds to the map
//! it targets and leaves the other two untouched.

use indexmap::IndexMap;
use tracing::debug;

use crate::model::{
    EventContext, EventId, EventsSheet, InstructionContext, InstructionId, InstructionsListContext,
    InstructionsListId,
};

// ===== Selection =====

/// A selected instruction together with the event owning it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedInstruction {
    /// Locator of the instruction.
    pub context: InstructionContext,
    /// Locator of the event owning the instruction.
    pub event_context: EventContext,
}

/// A selected conditions or actions column together with its event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedInstructionsList {
    /// Locator of the list.
    pub context: InstructionsListContext,
    /// Locator of the event owning the list.
    pub event_context: EventContext,
}

/// Transient selection state of one editing session.
///
/// Identity is the map key, so re-selecting a node overwrites its stored
/// context and moves it to the most-recent position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    events: IndexMap<EventId, EventContext>,
    instructions: IndexMap<InstructionId, SelectedInstruction>,
    instructions_lists: IndexMap<InstructionsListId, SelectedInstructionsList>,
}

/// Structural queries the selection needs from the tree.
///
/// The selection never walks the tree itself. Implemented by
/// [`EventsSheet`].
pub trait EventAncestry {
    /// Whether `ancestor` strictly contains `descendant`.
    fn is_ancestor_of(&self, ancestor: EventId, descendant: EventId) -> bool;

    /// Whether `event` may own sub-events.
    fn can_have_sub_events(&self, event: EventId) -> bool;
}

impl EventAncestry for EventsSheet {
    fn is_ancestor_of(&self, ancestor: EventId, descendant: EventId) -> bool {
        EventsSheet::is_ancestor_of(self, ancestor, descendant)
    }

    fn can_have_sub_events(&self, event: EventId) -> bool {
        EventsSheet::can_have_sub_events(self, event)
    }
}

// ===== Transitions =====

/// The canonical empty selection.
pub fn clear_selection() -> Selection {
    Selection::default()
}

/// Selection at the start of an editing session.
pub fn get_initial_selection() -> Selection {
    clear_selection()
}

/// Selects an event.
pub fn select_event(
    selection: Selection,
    event_context: EventContext,
    multi_selection: bool,
) -> Selection {
    let mut next = if multi_selection {
        selection
    } else {
        clear_selection()
    };
    debug!(event = ?event_context.event, multi_selection, "Select event");
    next.events.shift_remove(&event_context.event);
    next.events.insert(event_context.event, event_context);
    next
}

/// Selects an instruction owned by the event located by `event_context`.
pub fn select_instruction(
    event_context: EventContext,
    selection: Selection,
    instruction_context: InstructionContext,
    multi_selection: bool,
) -> Selection {
    let mut next = if multi_selection {
        selection
    } else {
        clear_selection()
    };
    let key = instruction_context.instruction;
    debug!(instruction = ?key, multi_selection, "Select instruction");
    next.instructions.shift_remove(&key);
    next.instructions.insert(
        key,
        SelectedInstruction {
            context: instruction_context,
            event_context,
        },
    );
    next
}

/// Selects a whole conditions or actions list.
pub fn select_instructions_list(
    event_context: EventContext,
    selection: Selection,
    list_context: InstructionsListContext,
    multi_selection: bool,
) -> Selection {
    let mut next = if multi_selection {
        selection
    } else {
        clear_selection()
    };
    let key = list_context.instrs_list;
    debug!(list = ?key, multi_selection, "Select instructions list");
    next.instructions_lists.shift_remove(&key);
    next.instructions_lists.insert(
        key,
        SelectedInstructionsList {
            context: list_context,
            event_context,
        },
    );
    next
}

// ===== Queries =====

/// Whether the event is selected.
pub fn is_event_selected(selection: &Selection, event: EventId) -> bool {
    selection.events.contains_key(&event)
}

/// Whether the instruction is selected.
pub fn is_instruction_selected(selection: &Selection, instruction: InstructionId) -> bool {
    selection.instructions.contains_key(&instruction)
}

/// Whether the instructions list is selected.
pub fn is_instructions_list_selected(selection: &Selection, list: InstructionsListId) -> bool {
    selection.instructions_lists.contains_key(&list)
}

/// Whether at least one event is selected.
pub fn has_event_selected(selection: &Selection) -> bool {
    !selection.events.is_empty()
}

/// Whether at least one instruction is selected.
pub fn has_instruction_selected(selection: &Selection) -> bool {
    !selection.instructions.is_empty()
}

/// Whether at least one instructions list is selected.
pub fn has_instructions_list_selected(selection: &Selection) -> bool {
    !selection.instructions_lists.is_empty()
}

/// Whether anything at all is selected.
pub fn has_something_selected(selection: &Selection) -> bool {
    has_event_selected(selection)
        || has_instruction_selected(selection)
        || has_instructions_list_selected(selection)
}

/// Whether any selected instruction is a condition.
pub fn has_selected_at_least_one_condition(selection: &Selection) -> bool {
    selection
        .instructions
        .values()
        .any(|selected| selected.context.is_condition)
}

/// Selected event contexts, in selection order.
pub fn get_selected_event_contexts(selection: &Selection) -> Vec<EventContext> {
    selection.events.values().cloned().collect()
}

/// Selected events, in selection order.
pub fn get_selected_events(selection: &Selection) -> Vec<EventId> {
    selection.events.keys().copied().collect()
}

/// Selected instructions, in selection order.
pub fn get_selected_instructions(selection: &Selection) -> Vec<InstructionId> {
    selection.instructions.keys().copied().collect()
}

/// Selected instruction contexts, in selection order.
pub fn get_selected_instruction_contexts(selection: &Selection) -> Vec<InstructionContext> {
    selection
        .instructions
        .values()
        .map(|selected| selected.context)
        .collect()
}

/// Events owning the selected instructions, one entry per selected instruction.
pub fn get_selected_instructions_locating_events(selection: &Selection) -> Vec<EventId> {
    selection
        .instructions
        .values()
        .map(|selected| selected.event_context.event)
        .collect()
}

/// Selected instructions lists, in selection order.
pub fn get_selected_instructions_list_contexts(
    selection: &Selection,
) -> Vec<SelectedInstructionsList> {
    selection.instructions_lists.values().cloned().collect()
}

/// Most recently selected event.
pub fn get_last_selected_event_context(selection: &Selection) -> Option<EventContext> {
    selection.events.last().map(|(_, context)| context.clone())
}

/// Most recently selected event able to own sub-events.
pub fn get_last_selected_event_context_which_can_have_sub_events(
    selection: &Selection,
    tree: &impl EventAncestry,
) -> Option<EventContext> {
    selection
        .events
        .values()
        .rev()
        .find(|context| tree.can_have_sub_events(context.event))
        .cloned()
}

/// Most recently selected instruction, with its owning event.
pub fn get_last_selected_instruction_context(selection: &Selection) -> Option<SelectedInstruction> {
    selection
        .instructions
        .last()
        .map(|(_, selected)| selected.clone())
}

/// Selected events with every descendant of another selected event removed.
///
/// Unrelated events are all kept, in selection order.
pub fn get_selected_top_most_only_event_contexts(
    selection: &Selection,
    tree: &impl EventAncestry,
) -> Vec<EventContext> {
    selection
        .events
        .values()
        .filter(|candidate| {
            !selection
                .events
                .keys()
                .any(|other| {
                    *other != candidate.event && tree.is_ancestor_of(*other, candidate.event)
                })
        })
        .cloned()
        .collect()
}

/// Most recently selected entry of the topmost-only set.
pub fn get_last_selected_top_most_only_event_context(
    selection: &Selection,
    tree: &impl EventAncestry,
) -> Option<EventContext> {
    get_selected_top_most_only_event_contexts(selection, tree).pop()
}

// ===== Tests =====

#[cfg(test)]
#[path = "selection_tests.rs"]
mod tests;
