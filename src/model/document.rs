//! Serialized sheet documents.
//!
//! A [`SheetDocument`] is the JSON form of an [`EventsSheet`](super::EventsSheet):
//! nested events owning their instructions and sub-events. Missing fields take
//! their defaults so hand-written sheets stay short:
//!
//! ```json
//! { "events": [
//!     { "type": "Standard",
//!       "conditions": [ { "type": "PosX", "parameters": ["Player", ">", "100"] } ],
//!       "actions": [ { "type": "Delete", "parameters": ["Player"] } ],
//!       "events": [] }
//! ] }
//! ```

use serde::{Deserialize, Serialize};

/// Root of a serialized events sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetDocument {
    /// Top-level events, in order.
    #[serde(default)]
    pub events: Vec<EventDocument>,
}

/// A serialized event and its whole subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDocument {
    /// Event type tag (for example `"Standard"` or a comment type).
    #[serde(rename = "type")]
    pub type_name: String,

    /// Conditions, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<InstructionDocument>,

    /// Actions, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<InstructionDocument>,

    /// Sub-events, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EventDocument>,

    /// Free-text strings of the event (comment text, group name).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strings: Vec<String>,

    /// Names of local variables declared by the event.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<String>,

    /// Whether the event is collapsed in the editor.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub folded: bool,

    /// Whether the event is disabled.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

impl EventDocument {
    /// Creates an empty event of the given type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// Appends a condition.
    pub fn with_condition(mut self, condition: InstructionDocument) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Appends an action.
    pub fn with_action(mut self, action: InstructionDocument) -> Self {
        self.actions.push(action);
        self
    }

    /// Appends a sub-event.
    pub fn with_sub_event(mut self, event: EventDocument) -> Self {
        self.events.push(event);
        self
    }

    /// Appends an event string.
    pub fn with_string(mut self, text: impl Into<String>) -> Self {
        self.strings.push(text.into());
        self
    }

    /// Declares a local variable.
    pub fn with_variable(mut self, name: impl Into<String>) -> Self {
        self.variables.push(name.into());
        self
    }

    /// Sets the folded flag.
    pub fn folded(mut self, folded: bool) -> Self {
        self.folded = folded;
        self
    }

    /// Sets the disabled flag.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// A serialized instruction (condition or action).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionDocument {
    /// Instruction type tag.
    #[serde(rename = "type")]
    pub type_name: String,

    /// Inverted flag (meaningful for conditions only).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub inverted: bool,

    /// Plain-string parameters, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<String>,

    /// Nested instructions.
    #[serde(default, rename = "subInstructions", skip_serializing_if = "Vec::is_empty")]
    pub sub_instructions: Vec<InstructionDocument>,
}

impl InstructionDocument {
    /// Creates an instruction of the given type with the given parameters.
    pub fn new<I, S>(type_name: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            type_name: type_name.into(),
            parameters: parameters.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the inverted flag.
    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// Appends a sub-instruction.
    pub fn with_sub_instruction(mut self, instruction: InstructionDocument) -> Self {
        self.sub_instructions.push(instruction);
        self
    }
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_event_uses_defaults() {
        let doc: SheetDocument =
            serde_json::from_str(r#"{ "events": [ { "type": "Standard" } ] }"#).unwrap();
        assert_eq!(doc.events.len(), 1);
        let event = &doc.events[0];
        assert_eq!(event.type_name, "Standard");
        assert!(event.conditions.is_empty());
        assert!(!event.folded);
        assert!(!event.disabled);
    }

    #[test]
    fn nested_instructions_parse() {
        let json = r#"{
            "events": [{
                "type": "Standard",
                "conditions": [{
                    "type": "Or",
                    "subInstructions": [
                        { "type": "KeyPressed", "inverted": true, "parameters": ["Space"] }
                    ]
                }],
                "events": [ { "type": "Comment", "strings": ["hello"] } ]
            }]
        }"#;
        let doc: SheetDocument = serde_json::from_str(json).unwrap();
        let or = &doc.events[0].conditions[0];
        assert_eq!(or.sub_instructions.len(), 1);
        assert!(or.sub_instructions[0].inverted);
        assert_eq!(doc.events[0].events[0].strings, vec!["hello".to_string()]);
    }

    #[test]
    fn serialization_skips_defaults() {
        let doc = SheetDocument {
            events: vec![EventDocument::new("Standard")],
        };
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"events":[{"type":"Standard"}]}"#);
    }

    #[test]
    fn missing_type_is_rejected() {
        let result = serde_json::from_str::<SheetDocument>(r#"{ "events": [ {} ] }"#);
        assert!(result.is_err());
    }

    #[test]
    fn builders_compose() {
        let event = EventDocument::new("Standard")
            .with_condition(InstructionDocument::new("PosX", ["Player"]).inverted(true))
            .with_action(InstructionDocument::new("Delete", ["Player"]))
            .with_sub_event(EventDocument::new("Standard").folded(true))
            .with_variable("Counter");
        assert!(event.conditions[0].inverted);
        assert_eq!(event.actions[0].parameters, vec!["Player".to_string()]);
        assert!(event.events[0].folded);
        assert_eq!(event.variables, vec!["Counter".to_string()]);
    }
}
