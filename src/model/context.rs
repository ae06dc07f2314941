//! Locators pairing a node identity with its position in a list.
//!
//! Contexts are snapshots: they stay valid until the next mutation of the
//! sheet. Refresh them from identity with
//! [`EventsSheet::event_context`](super::EventsSheet::event_context) and
//! [`EventsSheet::instruction_context`](super::EventsSheet::instruction_context).

use super::identifiers::{EventId, EventsListId, InstructionId, InstructionsListId};

/// Locates an event inside its parent events list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventContext {
    /// List containing the event.
    pub events_list: EventsListId,
    /// The event itself.
    pub event: EventId,
    /// Index of the event in `events_list` when the context was taken.
    pub index_in_list: usize,
    /// Enclosing events declaring local variables, outermost first.
    ///
    /// Includes the event itself when it declares variables.
    pub scoped_containers: Vec<EventId>,
}

/// Locates an instruction inside its owning instructions list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstructionContext {
    /// Whether the instruction is a condition.
    pub is_condition: bool,
    /// List containing the instruction.
    pub instrs_list: InstructionsListId,
    /// The instruction itself.
    pub instruction: InstructionId,
    /// Index of the instruction in `instrs_list` when the context was taken.
    pub index_in_list: usize,
}

/// Locates a whole instructions list (a conditions or actions column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstructionsListContext {
    /// Whether the list holds conditions.
    pub is_condition: bool,
    /// The list.
    pub instrs_list: InstructionsListId,
}
