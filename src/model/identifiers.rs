//! Node identifiers and list locators.
//!
//! Event and instruction identities are arena keys: stable for the lifetime of
//! the node, process-unique, and never handed out again once the node is
//! removed (the arena bumps the slot generation). A stale identifier therefore
//! resolves to `None` instead of aliasing a newer node.

use slotmap::new_key_type;

new_key_type! {
    /// Stable identity of an event in an [`EventsSheet`](super::EventsSheet).
    pub struct EventId;

    /// Stable identity of an instruction (condition or action).
    pub struct InstructionId;
}

/// Locates an ordered list of events.
///
/// The top-level list of a sheet, or the sub-events list owned by exactly one
/// parent event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventsListId {
    /// Top-level events of the sheet.
    Root,
    /// Sub-events of the given event.
    SubEvents(EventId),
}

impl EventsListId {
    /// Event owning this list, `None` for the root list.
    pub fn owner(&self) -> Option<EventId> {
        match self {
            EventsListId::Root => None,
            EventsListId::SubEvents(event) => Some(*event),
        }
    }
}

/// Locates an ordered list of instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionsListId {
    /// Conditions of the given event.
    Conditions(EventId),
    /// Actions of the given event.
    Actions(EventId),
    /// Sub-instructions of the given instruction.
    SubInstructions(InstructionId),
}

impl InstructionsListId {
    /// Whether instructions stored in this list are conditions.
    ///
    /// Sub-instruction lists report `false`; whether they hold conditions is
    /// decided by the list owning their parent instruction
    /// (see [`EventsSheet::is_conditions_list`](super::EventsSheet::is_conditions_list)).
    pub fn is_conditions(&self) -> bool {
        matches!(self, InstructionsListId::Conditions(_))
    }
}

// ===== Tests =====
