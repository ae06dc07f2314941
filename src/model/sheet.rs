//! Arena-backed events sheet.
//!
//! Events and instructions live in two generation-checked arenas. Lists are
//! vectors of ids owned by their parent node (or by the sheet for the root
//! list), and every node records the list it belongs to so contexts can be
//! recomputed from identity alone.
//!
//! Queries addressed at stale ids return empty slices, `false` or `None`.
//! Structural edits addressed at stale ids return a [`TreeError`].

use slotmap::SlotMap;
use tracing::warn;

use super::context::{EventContext, InstructionContext};
use super::document::{EventDocument, InstructionDocument, SheetDocument};
use super::error::TreeError;
use super::identifiers::{EventId, EventsListId, InstructionId, InstructionsListId};

/// Type tag of comment events. Comments cannot own sub-events.
pub const COMMENT_EVENT_TYPE: &str = "BuiltinCommonInstructions::Comment";

#[derive(Debug, Clone)]
struct Event {
    type_name: String,
    conditions: Vec<InstructionId>,
    actions: Vec<InstructionId>,
    sub_events: Vec<EventId>,
    strings: Vec<String>,
    variables: Vec<String>,
    folded: bool,
    disabled: bool,
    parent: EventsListId,
}

#[derive(Debug, Clone)]
struct Instruction {
    type_name: String,
    inverted: bool,
    parameters: Vec<String>,
    sub_instructions: Vec<InstructionId>,
    owner: InstructionsListId,
}

/// An ordered, mutable tree of events with their conditions and actions.
///
/// Every mutation bumps [`revision`](Self::revision), which downstream caches
/// use to decide whether derived data (flattened rows, positions) is stale.
#[derive(Debug, Clone, Default)]
pub struct EventsSheet {
    events: SlotMap<EventId, Event>,
    instructions: SlotMap<InstructionId, Instruction>,
    roots: Vec<EventId>,
    revision: u64,
}

impl EventsSheet {
    /// Creates an empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a sheet from its serialized form.
    pub fn from_document(document: &SheetDocument) -> Self {
        let mut sheet = Self::new();
        for event in &document.events {
            let id = sheet.build_event(EventsListId::Root, event);
            sheet.roots.push(id);
        }
        sheet
    }

    /// Serializes the sheet.
    pub fn to_document(&self) -> SheetDocument {
        SheetDocument {
            events: self.roots.iter().filter_map(|id| self.event_document(*id)).collect(),
        }
    }

    /// Monotonic mutation counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Top-level events, in order.
    pub fn roots(&self) -> &[EventId] {
        &self.roots
    }

    /// Total number of events in the sheet, at any depth.
    pub fn total_events(&self) -> usize {
        self.events.len()
    }

    /// Whether the event exists.
    pub fn contains_event(&self, event: EventId) -> bool {
        self.events.contains_key(event)
    }

    /// Whether the instruction exists.
    pub fn contains_instruction(&self, instruction: InstructionId) -> bool {
        self.instructions.contains_key(instruction)
    }

    // ===== Events lists =====

    /// Events of a list, empty when the list no longer exists.
    pub fn events_in(&self, list: EventsListId) -> &[EventId] {
        match list {
            EventsListId::Root => &self.roots,
            EventsListId::SubEvents(owner) => self.sub_events(owner),
        }
    }

    /// Number of events in a list.
    pub fn events_count(&self, list: EventsListId) -> usize {
        self.events_in(list).len()
    }

    /// Event at `index` in a list.
    pub fn event_at(&self, list: EventsListId, index: usize) -> Option<EventId> {
        self.events_in(list).get(index).copied()
    }

    /// Inserts an event (and its whole serialized subtree) into a list.
    ///
    /// `index` past the end appends. Comments cannot receive sub-events.
    pub fn insert_event(
        &mut self,
        list: EventsListId,
        event: &EventDocument,
        index: usize,
    ) -> Result<EventId, TreeError> {
        if self.events_list_mut(list).is_none() {
            return Err(TreeError::UnknownEventsList(list));
        }
        if let EventsListId::SubEvents(owner) = list {
            if !self.can_have_sub_events(owner) {
                return Err(TreeError::CannotHaveSubEvents(owner));
            }
        }
        let id = self.build_event(list, event);
        let siblings = self
            .events_list_mut(list)
            .ok_or(TreeError::UnknownEventsList(list))?;
        let at = index.min(siblings.len());
        siblings.insert(at, id);
        self.touch();
        Ok(id)
    }

    /// Removes an event with its whole subtree.
    pub fn remove_event(&mut self, event: EventId) -> Result<(), TreeError> {
        let parent = self
            .events
            .get(event)
            .map(|e| e.parent)
            .ok_or(TreeError::UnknownEvent(event))?;
        if let Some(siblings) = self.events_list_mut(parent) {
            siblings.retain(|id| *id != event);
        }

        let mut pending = vec![event];
        while let Some(id) = pending.pop() {
            if let Some(removed) = self.events.remove(id) {
                for instruction in removed.conditions.into_iter().chain(removed.actions) {
                    self.free_instruction(instruction);
                }
                pending.extend(removed.sub_events);
            }
        }
        self.touch();
        Ok(())
    }

    // ===== Events =====

    /// Sub-events of an event.
    pub fn sub_events(&self, event: EventId) -> &[EventId] {
        self.events.get(event).map_or(&[], |e| e.sub_events.as_slice())
    }

    /// Conditions of an event.
    pub fn conditions(&self, event: EventId) -> &[InstructionId] {
        self.events.get(event).map_or(&[], |e| e.conditions.as_slice())
    }

    /// Actions of an event.
    pub fn actions(&self, event: EventId) -> &[InstructionId] {
        self.events.get(event).map_or(&[], |e| e.actions.as_slice())
    }

    /// Type tag of an event.
    pub fn event_type(&self, event: EventId) -> Option<&str> {
        self.events.get(event).map(|e| e.type_name.as_str())
    }

    /// Free-text strings of an event.
    pub fn event_strings(&self, event: EventId) -> &[String] {
        self.events.get(event).map_or(&[], |e| e.strings.as_slice())
    }

    /// Replaces one event string.
    pub fn set_event_string(
        &mut self,
        event: EventId,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), TreeError> {
        let target = self
            .events
            .get_mut(event)
            .ok_or(TreeError::UnknownEvent(event))?;
        let len = target.strings.len();
        let slot = target
            .strings
            .get_mut(index)
            .ok_or(TreeError::IndexOutOfBounds { index, len })?;
        *slot = value.into();
        self.touch();
        Ok(())
    }

    /// Local variables declared by an event.
    pub fn local_variables(&self, event: EventId) -> &[String] {
        self.events.get(event).map_or(&[], |e| e.variables.as_slice())
    }

    /// Whether the event is collapsed. Unknown events report `false`.
    pub fn is_folded(&self, event: EventId) -> bool {
        self.events.get(event).is_some_and(|e| e.folded)
    }

    /// Collapses or expands an event.
    pub fn set_folded(&mut self, event: EventId, folded: bool) -> Result<(), TreeError> {
        let target = self
            .events
            .get_mut(event)
            .ok_or(TreeError::UnknownEvent(event))?;
        if target.folded != folded {
            target.folded = folded;
            self.touch();
        }
        Ok(())
    }

    /// Whether the event itself is disabled (ignores ancestors).
    pub fn is_disabled(&self, event: EventId) -> bool {
        self.events.get(event).is_some_and(|e| e.disabled)
    }

    /// Enables or disables an event.
    pub fn set_disabled(&mut self, event: EventId, disabled: bool) -> Result<(), TreeError> {
        let target = self
            .events
            .get_mut(event)
            .ok_or(TreeError::UnknownEvent(event))?;
        if target.disabled != disabled {
            target.disabled = disabled;
            self.touch();
        }
        Ok(())
    }

    /// Whether the event may own sub-events.
    pub fn can_have_sub_events(&self, event: EventId) -> bool {
        self.event_type(event)
            .is_some_and(|type_name| type_name != COMMENT_EVENT_TYPE)
    }

    /// List containing an event.
    pub fn parent_list(&self, event: EventId) -> Option<EventsListId> {
        self.events.get(event).map(|e| e.parent)
    }

    /// Event owning the list that contains `event`; `None` for top-level events.
    pub fn parent_event(&self, event: EventId) -> Option<EventId> {
        self.parent_list(event).and_then(|list| list.owner())
    }

    /// Whether `ancestor` strictly contains `descendant` at any depth.
    pub fn is_ancestor_of(&self, ancestor: EventId, descendant: EventId) -> bool {
        let mut current = self.parent_event(descendant);
        while let Some(event) = current {
            if event == ancestor {
                return true;
            }
            current = self.parent_event(event);
        }
        false
    }

    /// Nesting depth of an event: 0 for top-level events.
    pub fn depth(&self, event: EventId) -> Option<usize> {
        if !self.contains_event(event) {
            return None;
        }
        let mut depth = 0;
        let mut current = self.parent_event(event);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent_event(parent);
        }
        Some(depth)
    }

    /// Current locator of an event.
    pub fn event_context(&self, event: EventId) -> Option<EventContext> {
        let parent = self.parent_list(event)?;
        let index_in_list = self.events_in(parent).iter().position(|id| *id == event)?;

        let mut scoped_containers = Vec::new();
        let mut current = Some(event);
        while let Some(id) = current {
            if !self.local_variables(id).is_empty() {
                scoped_containers.push(id);
            }
            current = self.parent_event(id);
        }
        scoped_containers.reverse();

        Some(EventContext {
            events_list: parent,
            event,
            index_in_list,
            scoped_containers,
        })
    }

    // ===== Instructions lists =====

    /// Instructions of a list, empty when the list no longer exists.
    pub fn instructions_in(&self, list: InstructionsListId) -> &[InstructionId] {
        match list {
            InstructionsListId::Conditions(event) => self.conditions(event),
            InstructionsListId::Actions(event) => self.actions(event),
            InstructionsListId::SubInstructions(instruction) => self.sub_instructions(instruction),
        }
    }

    /// Number of instructions in a list.
    pub fn instructions_count(&self, list: InstructionsListId) -> usize {
        self.instructions_in(list).len()
    }

    /// Instruction at `index` in a list.
    pub fn instruction_at(&self, list: InstructionsListId, index: usize) -> Option<InstructionId> {
        self.instructions_in(list).get(index).copied()
    }

    /// Inserts an instruction (with its sub-instructions) into a list.
    ///
    /// `index` past the end appends.
    pub fn insert_instruction(
        &mut self,
        list: InstructionsListId,
        instruction: &InstructionDocument,
        index: usize,
    ) -> Result<InstructionId, TreeError> {
        if self.instructions_list_mut(list).is_none() {
            return Err(TreeError::UnknownInstructionsList(list));
        }
        let id = self.build_instruction(list, instruction);
        let siblings = self
            .instructions_list_mut(list)
            .ok_or(TreeError::UnknownInstructionsList(list))?;
        let at = index.min(siblings.len());
        siblings.insert(at, id);
        self.touch();
        Ok(id)
    }

    /// Removes an instruction with its sub-instructions.
    pub fn remove_instruction(&mut self, instruction: InstructionId) -> Result<(), TreeError> {
        let owner = self
            .instructions
            .get(instruction)
            .map(|i| i.owner)
            .ok_or(TreeError::UnknownInstruction(instruction))?;
        if let Some(siblings) = self.instructions_list_mut(owner) {
            siblings.retain(|id| *id != instruction);
        }
        self.free_instruction(instruction);
        self.touch();
        Ok(())
    }

    /// Whether instructions of `list` are conditions.
    ///
    /// Sub-instruction lists inherit from the list owning their parent.
    pub fn is_conditions_list(&self, list: InstructionsListId) -> bool {
        let mut current = list;
        loop {
            match current {
                InstructionsListId::Conditions(_) => return true,
                InstructionsListId::Actions(_) => return false,
                InstructionsListId::SubInstructions(parent) => match self.instruction_list(parent) {
                    Some(owner) => current = owner,
                    None => return false,
                },
            }
        }
    }

    // ===== Instructions =====

    /// Type tag of an instruction.
    pub fn instruction_type(&self, instruction: InstructionId) -> Option<&str> {
        self.instructions
            .get(instruction)
            .map(|i| i.type_name.as_str())
    }

    /// Whether a condition is inverted. Unknown instructions report `false`.
    pub fn is_inverted(&self, instruction: InstructionId) -> bool {
        self.instructions.get(instruction).is_some_and(|i| i.inverted)
    }

    /// Parameters of an instruction.
    pub fn parameters(&self, instruction: InstructionId) -> &[String] {
        self.instructions
            .get(instruction)
            .map_or(&[], |i| i.parameters.as_slice())
    }

    /// One parameter of an instruction.
    pub fn parameter(&self, instruction: InstructionId, index: usize) -> Option<&str> {
        self.parameters(instruction).get(index).map(String::as_str)
    }

    /// Replaces one parameter of an instruction.
    pub fn set_parameter(
        &mut self,
        instruction: InstructionId,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), TreeError> {
        let target = self
            .instructions
            .get_mut(instruction)
            .ok_or(TreeError::UnknownInstruction(instruction))?;
        let len = target.parameters.len();
        let slot = target
            .parameters
            .get_mut(index)
            .ok_or(TreeError::IndexOutOfBounds { index, len })?;
        *slot = value.into();
        self.touch();
        Ok(())
    }

    /// Sub-instructions of an instruction.
    pub fn sub_instructions(&self, instruction: InstructionId) -> &[InstructionId] {
        self.instructions
            .get(instruction)
            .map_or(&[], |i| i.sub_instructions.as_slice())
    }

    /// List containing an instruction.
    pub fn instruction_list(&self, instruction: InstructionId) -> Option<InstructionsListId> {
        self.instructions.get(instruction).map(|i| i.owner)
    }

    /// Event owning an instruction, following sub-instruction nesting.
    pub fn owning_event(&self, instruction: InstructionId) -> Option<EventId> {
        let mut current = self.instruction_list(instruction)?;
        loop {
            match current {
                InstructionsListId::Conditions(event) | InstructionsListId::Actions(event) => {
                    return self.contains_event(event).then_some(event)
                }
                InstructionsListId::SubInstructions(parent) => {
                    current = self.instruction_list(parent)?;
                }
            }
        }
    }

    /// Current locator of an instruction.
    pub fn instruction_context(&self, instruction: InstructionId) -> Option<InstructionContext> {
        let list = self.instruction_list(instruction)?;
        let index_in_list = self
            .instructions_in(list)
            .iter()
            .position(|id| *id == instruction)?;
        Some(InstructionContext {
            is_condition: self.is_conditions_list(list),
            instrs_list: list,
            instruction,
            index_in_list,
        })
    }

    // ===== Internals =====

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn events_list_mut(&mut self, list: EventsListId) -> Option<&mut Vec<EventId>> {
        match list {
            EventsListId::Root => Some(&mut self.roots),
            EventsListId::SubEvents(owner) => self.events.get_mut(owner).map(|e| &mut e.sub_events),
        }
    }

    fn instructions_list_mut(
        &mut self,
        list: InstructionsListId,
    ) -> Option<&mut Vec<InstructionId>> {
        match list {
            InstructionsListId::Conditions(event) => {
                self.events.get_mut(event).map(|e| &mut e.conditions)
            }
            InstructionsListId::Actions(event) => {
                self.events.get_mut(event).map(|e| &mut e.actions)
            }
            InstructionsListId::SubInstructions(instruction) => self
                .instructions
                .get_mut(instruction)
                .map(|i| &mut i.sub_instructions),
        }
    }

    fn build_event(&mut self, parent: EventsListId, document: &EventDocument) -> EventId {
        let id = self.events.insert(Event {
            type_name: document.type_name.clone(),
            conditions: Vec::new(),
            actions: Vec::new(),
            sub_events: Vec::new(),
            strings: document.strings.clone(),
            variables: document.variables.clone(),
            folded: document.folded,
            disabled: document.disabled,
            parent,
        });

        let conditions: Vec<InstructionId> = document
            .conditions
            .iter()
            .map(|c| self.build_instruction(InstructionsListId::Conditions(id), c))
            .collect();
        let actions: Vec<InstructionId> = document
            .actions
            .iter()
            .map(|a| self.build_instruction(InstructionsListId::Actions(id), a))
            .collect();
        let sub_events: Vec<EventId> = if document.type_name == COMMENT_EVENT_TYPE {
            if !document.events.is_empty() {
                warn!(
                    dropped = document.events.len(),
                    "Comment event owns sub-events; dropping them"
                );
            }
            Vec::new()
        } else {
            document
                .events
                .iter()
                .map(|e| self.build_event(EventsListId::SubEvents(id), e))
                .collect()
        };

        if let Some(event) = self.events.get_mut(id) {
            event.conditions = conditions;
            event.actions = actions;
            event.sub_events = sub_events;
        }
        id
    }

    fn build_instruction(
        &mut self,
        owner: InstructionsListId,
        document: &InstructionDocument,
    ) -> InstructionId {
        let id = self.instructions.insert(Instruction {
            type_name: document.type_name.clone(),
            inverted: document.inverted,
            parameters: document.parameters.clone(),
            sub_instructions: Vec::new(),
            owner,
        });
        let sub_instructions: Vec<InstructionId> = document
            .sub_instructions
            .iter()
            .map(|s| self.build_instruction(InstructionsListId::SubInstructions(id), s))
            .collect();
        if let Some(instruction) = self.instructions.get_mut(id) {
            instruction.sub_instructions = sub_instructions;
        }
        id
    }

    fn free_instruction(&mut self, instruction: InstructionId) {
        let mut pending = vec![instruction];
        while let Some(id) = pending.pop() {
            if let Some(removed) = self.instructions.remove(id) {
                pending.extend(removed.sub_instructions);
            }
        }
    }

    fn event_document(&self, id: EventId) -> Option<EventDocument> {
        let event = self.events.get(id)?;
        Some(EventDocument {
            type_name: event.type_name.clone(),
            conditions: event
                .conditions
                .iter()
                .filter_map(|i| self.instruction_document(*i))
                .collect(),
            actions: event
                .actions
                .iter()
                .filter_map(|i| self.instruction_document(*i))
                .collect(),
            events: event
                .sub_events
                .iter()
                .filter_map(|e| self.event_document(*e))
                .collect(),
            strings: event.strings.clone(),
            variables: event.variables.clone(),
            folded: event.folded,
            disabled: event.disabled,
        })
    }

    fn instruction_document(&self, id: InstructionId) -> Option<InstructionDocument> {
        let instruction = self.instructions.get(id)?;
        Some(InstructionDocument {
            type_name: instruction.type_name.clone(),
            inverted: instruction.inverted,
            parameters: instruction.parameters.clone(),
            sub_instructions: instruction
                .sub_instructions
                .iter()
                .filter_map(|i| self.instruction_document(*i))
                .collect(),
        })
    }
}

#[cfg(test)]
#[path = "sheet_tests.rs"]
mod tests;
