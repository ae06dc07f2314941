//! Search and replace over an events sheet.
//!
//! Two layers:
//! - [`search_in_events`] / [`replace_in_events`]: the primitives. Search
//!   returns raw [`MatchHandle`]s (one per matching surface, so an event may
//!   appear several times); replace rewrites parameters and event strings and
//!   returns the events it modified.
//! - [`EventsSearcher`]: the stateful searcher kept by an editing session.
//!   It owns the [`SearchState`] machine, deduplicates results by event and
//!   drives next/previous navigation.
//!
//! Confining a search to the current selection is not supported. Asking for
//! it logs a warning and searches the whole sheet.

use std::fmt;

use indexmap::IndexSet;
use tracing::{debug, info, warn};

use crate::model::{EventId, EventsSheet, InstructionId};
use crate::state::match_navigation_handler::{next_match, prev_match};
use crate::state::selection::Selection;

/// Characters ignored when matching instruction sentences.
pub const SENTENCE_IGNORED_CHARACTERS: &str = ";:,#()";

// ===== SearchQuery =====

/// Validated search text. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Smart constructor: returns `None` for an empty string.
    ///
    /// Whitespace is significant and kept as is.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let s = raw.into();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    /// The query text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ===== Inputs =====

/// Parameters of a search or replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchInEventsInputs {
    /// Text to look for.
    pub search_text: String,
    /// Replacement text (replace only).
    pub replace_text: String,
    /// Case-sensitive matching.
    pub match_case: bool,
    /// Look into condition parameters.
    pub search_in_conditions: bool,
    /// Look into action parameters.
    pub search_in_actions: bool,
    /// Look into event strings (comments, group names).
    pub search_in_event_strings: bool,
    /// Look into the sentences describing instructions (search only).
    pub search_in_event_sentences: bool,
    /// Confine to the selection. Unsupported: falls back to the whole sheet.
    pub search_in_selection: bool,
}

impl Default for SearchInEventsInputs {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            replace_text: String::new(),
            match_case: false,
            search_in_conditions: true,
            search_in_actions: true,
            search_in_event_strings: true,
            search_in_event_sentences: true,
            search_in_selection: false,
        }
    }
}

impl SearchInEventsInputs {
    /// Inputs searching `text` with the default scopes.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            search_text: text.into(),
            ..Self::default()
        }
    }

    /// Sets the replacement text.
    pub fn replace_with(mut self, text: impl Into<String>) -> Self {
        self.replace_text = text.into();
        self
    }

    /// Sets case-sensitive matching.
    pub fn match_case(mut self, match_case: bool) -> Self {
        self.match_case = match_case;
        self
    }
}

// ===== Sentences =====

/// Renders the human-readable sentence of an instruction.
///
/// Sentences are derived text: they can be searched but never replaced.
pub trait SentenceFormatter {
    /// Full sentence of `instruction`, as displayed.
    fn sentence(
        &self,
        sheet: &EventsSheet,
        instruction: InstructionId,
        is_condition: bool,
    ) -> String;

    /// Text that sentence search matches against. Defaults to
    /// [`sentence`](Self::sentence).
    ///
    /// Any text here that replace cannot rewrite keeps matching after a
    /// replace of that text.
    fn searchable_sentence(
        &self,
        sheet: &EventsSheet,
        instruction: InstructionId,
        is_condition: bool,
    ) -> String {
        self.sentence(sheet, instruction, is_condition)
    }
}

/// Formats instructions as `Type(param1, param2)`, prefixed with `Not ` for
/// inverted conditions.
///
/// Only the parameters, joined by spaces, are searchable: the type and the
/// inversion are not text a replace can rewrite.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainSentenceFormatter;

impl SentenceFormatter for PlainSentenceFormatter {
    fn sentence(
        &self,
        sheet: &EventsSheet,
        instruction: InstructionId,
        is_condition: bool,
    ) -> String {
        let prefix = if is_condition && sheet.is_inverted(instruction) {
            "Not "
        } else {
            ""
        };
        format!(
            "{}{}({})",
            prefix,
            sheet.instruction_type(instruction).unwrap_or_default(),
            sheet.parameters(instruction).join(", ")
        )
    }

    fn searchable_sentence(
        &self,
        sheet: &EventsSheet,
        instruction: InstructionId,
        _is_condition: bool,
    ) -> String {
        sheet.parameters(instruction).join(" ")
    }
}

/// Drops ignored characters and collapses runs of spaces.
pub fn normalize_sentence(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for c in text.chars() {
        if SENTENCE_IGNORED_CHARACTERS.contains(c) {
            continue;
        }
        if c == ' ' && normalized.ends_with(' ') {
            continue;
        }
        normalized.push(c);
    }
    normalized
}

// ===== Match handles =====

/// Text surface where a match was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchSurface {
    /// A parameter of a condition (possibly nested).
    Condition(InstructionId),
    /// A parameter of an action (possibly nested).
    Action(InstructionId),
    /// The sentence of an instruction.
    Sentence(InstructionId),
    /// One of the event strings.
    EventString(usize),
}

/// A raw search hit, resolvable to the event owning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchHandle {
    event: EventId,
    surface: MatchSurface,
}

impl MatchHandle {
    /// Where the match was found.
    pub fn surface(&self) -> MatchSurface {
        self.surface
    }

    /// Event owning the match, `None` once that event left the sheet.
    pub fn resolve(&self, sheet: &EventsSheet) -> Option<EventId> {
        sheet.contains_event(self.event).then_some(self.event)
    }
}

/// Collapses handles to their owning events, first occurrence order.
///
/// Handles that no longer resolve are dropped.
pub fn dedupe_by_event(sheet: &EventsSheet, handles: &[MatchHandle]) -> Vec<EventId> {
    let events: IndexSet<EventId> = handles
        .iter()
        .filter_map(|handle| handle.resolve(sheet))
        .collect();
    events.into_iter().collect()
}

// ===== Text matching =====

fn chars_equal(a: char, b: char, match_case: bool) -> bool {
    a == b || (!match_case && a.to_lowercase().eq(b.to_lowercase()))
}

/// Byte length of the match of `needle` at byte offset `start`, if any.
fn match_len_at(haystack: &str, start: usize, needle: &str, match_case: bool) -> Option<usize> {
    let rest = &haystack[start..];
    let mut hay = rest.char_indices();
    for n in needle.chars() {
        let (_, h) = hay.next()?;
        if !chars_equal(h, n, match_case) {
            return None;
        }
    }
    Some(hay.next().map_or(rest.len(), |(offset, _)| offset))
}

/// Byte offset of the first occurrence of `needle` in `haystack`.
pub fn find_text(haystack: &str, needle: &str, match_case: bool) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .char_indices()
        .map(|(offset, _)| offset)
        .find(|offset| match_len_at(haystack, *offset, needle, match_case).is_some())
}

/// Replaces every non-overlapping occurrence of `needle`, left to right.
pub fn replace_all(haystack: &str, needle: &str, replacement: &str, match_case: bool) -> String {
    if needle.is_empty() {
        return haystack.to_string();
    }
    let mut replaced = String::with_capacity(haystack.len());
    let mut copied_up_to = 0;
    let mut offset = 0;
    while offset < haystack.len() {
        match match_len_at(haystack, offset, needle, match_case) {
            Some(len) if len > 0 => {
                replaced.push_str(&haystack[copied_up_to..offset]);
                replaced.push_str(replacement);
                offset += len;
                copied_up_to = offset;
            }
            _ => {
                offset += haystack[offset..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    replaced.push_str(&haystack[copied_up_to..]);
    replaced
}

// ===== Traversal =====

/// Events in pre-order, descending only into events able to own sub-events.
fn searchable_events(sheet: &EventsSheet) -> Vec<EventId> {
    let mut order = Vec::with_capacity(sheet.total_events());
    let mut stack: Vec<EventId> = sheet.roots().iter().rev().copied().collect();
    while let Some(event) = stack.pop() {
        order.push(event);
        if sheet.can_have_sub_events(event) {
            stack.extend(sheet.sub_events(event).iter().rev().copied());
        }
    }
    order
}

/// Instructions of a list and all their nested sub-instructions, pre-order.
fn instructions_deep(sheet: &EventsSheet, roots: &[InstructionId]) -> Vec<InstructionId> {
    let mut order = Vec::new();
    let mut stack: Vec<InstructionId> = roots.iter().rev().copied().collect();
    while let Some(instruction) = stack.pop() {
        order.push(instruction);
        stack.extend(sheet.sub_instructions(instruction).iter().rev().copied());
    }
    order
}

fn warn_if_selection_scoped(inputs: &SearchInEventsInputs, operation: &str) {
    if inputs.search_in_selection {
        warn!(
            operation,
            "Searching in the selection is not supported, using the whole sheet instead"
        );
    }
}

// ===== Primitives =====

/// Searches the sheet with the default sentence formatter.
pub fn search_in_events(sheet: &EventsSheet, inputs: &SearchInEventsInputs) -> Vec<MatchHandle> {
    search_in_events_with(sheet, inputs, &PlainSentenceFormatter)
}

/// Searches the sheet, returning one handle per matching surface in pre-order.
pub fn search_in_events_with(
    sheet: &EventsSheet,
    inputs: &SearchInEventsInputs,
    formatter: &dyn SentenceFormatter,
) -> Vec<MatchHandle> {
    warn_if_selection_scoped(inputs, "search");
    let Some(query) = SearchQuery::new(inputs.search_text.as_str()) else {
        return Vec::new();
    };
    let text = query.as_str();
    let match_case = inputs.match_case;
    let sentence_query = normalize_sentence(text.trim());

    let mut handles = Vec::new();
    for event in searchable_events(sheet) {
        let columns = [
            (inputs.search_in_conditions, true, sheet.conditions(event)),
            (inputs.search_in_actions, false, sheet.actions(event)),
        ];
        for (enabled, is_condition, list) in columns {
            if !enabled {
                continue;
            }
            for instruction in instructions_deep(sheet, list) {
                let in_parameters = sheet
                    .parameters(instruction)
                    .iter()
                    .any(|parameter| find_text(parameter, text, match_case).is_some());
                if in_parameters {
                    let surface = if is_condition {
                        MatchSurface::Condition(instruction)
                    } else {
                        MatchSurface::Action(instruction)
                    };
                    handles.push(MatchHandle { event, surface });
                }
                if inputs.search_in_event_sentences && !sentence_query.is_empty() {
                    let sentence = normalize_sentence(&formatter.searchable_sentence(
                        sheet,
                        instruction,
                        is_condition,
                    ));
                    if find_text(&sentence, &sentence_query, match_case).is_some() {
                        handles.push(MatchHandle {
                            event,
                            surface: MatchSurface::Sentence(instruction),
                        });
                    }
                }
            }
        }

        if inputs.search_in_event_strings {
            for (index, string) in sheet.event_strings(event).iter().enumerate() {
                if find_text(string, text, match_case).is_some() {
                    handles.push(MatchHandle {
                        event,
                        surface: MatchSurface::EventString(index),
                    });
                }
            }
        }
    }

    debug!(query = text, handles = handles.len(), "Searched events");
    handles
}

/// Replaces `search_text` by `replace_text` in parameters and event strings.
///
/// Returns the modified events, deduplicated, in pre-order. Sentences are
/// never rewritten.
pub fn replace_in_events(sheet: &mut EventsSheet, inputs: &SearchInEventsInputs) -> Vec<EventId> {
    warn_if_selection_scoped(inputs, "replace");
    let Some(query) = SearchQuery::new(inputs.search_text.as_str()) else {
        return Vec::new();
    };
    let needle = query.as_str();
    let replacement = inputs.replace_text.as_str();
    let match_case = inputs.match_case;

    let mut modified = IndexSet::new();
    for event in searchable_events(sheet) {
        let mut instructions = Vec::new();
        if inputs.search_in_conditions {
            instructions.extend(instructions_deep(sheet, sheet.conditions(event)));
        }
        if inputs.search_in_actions {
            instructions.extend(instructions_deep(sheet, sheet.actions(event)));
        }

        for instruction in instructions {
            let rewrites: Vec<(usize, String)> = sheet
                .parameters(instruction)
                .iter()
                .enumerate()
                .filter_map(|(index, parameter)| {
                    let rewritten = replace_all(parameter, needle, replacement, match_case);
                    (rewritten != *parameter).then_some((index, rewritten))
                })
                .collect();
            for (index, value) in rewrites {
                if sheet.set_parameter(instruction, index, value).is_ok() {
                    modified.insert(event);
                }
            }
        }

        if inputs.search_in_event_strings {
            let rewrites: Vec<(usize, String)> = sheet
                .event_strings(event)
                .iter()
                .enumerate()
                .filter_map(|(index, string)| {
                    let rewritten = replace_all(string, needle, replacement, match_case);
                    (rewritten != *string).then_some((index, rewritten))
                })
                .collect();
            for (index, value) in rewrites {
                if sheet.set_event_string(event, index, value).is_ok() {
                    modified.insert(event);
                }
            }
        }
    }

    modified.into_iter().collect()
}

// ===== SearchState =====

/// Search state machine.
/// Sum type enforces exactly one state at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchState {
    /// No active search results.
    #[default]
    Idle,
    /// Deduplicated results of the last search or replace.
    HasResults {
        /// Matching events, in pre-order.
        results: Vec<EventId>,
        /// Index of the focused result, if navigation started.
        focus_offset: Option<usize>,
    },
    /// A replace is running.
    Editing,
}

impl SearchState {
    /// Current results, empty unless in `HasResults`.
    pub fn results(&self) -> &[EventId] {
        match self {
            SearchState::HasResults { results, .. } => results,
            SearchState::Idle | SearchState::Editing => &[],
        }
    }

    /// Current focus offset.
    pub fn focus_offset(&self) -> Option<usize> {
        match self {
            SearchState::HasResults { focus_offset, .. } => *focus_offset,
            SearchState::Idle | SearchState::Editing => None,
        }
    }
}

// ===== EventsSearcher =====

/// Stateful searcher of one editing session.
///
/// Each search, replace or reset replaces the previous result set and bumps
/// [`generation`](Self::generation).
pub struct EventsSearcher {
    state: SearchState,
    generation: u64,
    formatter: Box<dyn SentenceFormatter>,
}

impl fmt::Debug for EventsSearcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventsSearcher")
            .field("state", &self.state)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl Default for EventsSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl EventsSearcher {
    /// Creates an idle searcher with the default sentence formatter.
    pub fn new() -> Self {
        Self::with_formatter(Box::new(PlainSentenceFormatter))
    }

    /// Creates an idle searcher with a custom sentence formatter.
    pub fn with_formatter(formatter: Box<dyn SentenceFormatter>) -> Self {
        Self {
            state: SearchState::Idle,
            generation: 0,
            formatter,
        }
    }

    /// Current state.
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Counter bumped whenever results or focus change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Runs a search and calls `on_done` with the deduplicated results.
    pub fn search_in_events(
        &mut self,
        sheet: &EventsSheet,
        inputs: &SearchInEventsInputs,
        on_done: impl FnOnce(&[EventId]),
    ) {
        let handles = search_in_events_with(sheet, inputs, self.formatter.as_ref());
        let results = dedupe_by_event(sheet, &handles);
        info!(
            query = %inputs.search_text,
            results = results.len(),
            "Search completed"
        );
        self.set_state(SearchState::HasResults {
            results,
            focus_offset: None,
        });
        on_done(self.state.results());
    }

    /// Runs a replace; the modified events become the new results.
    pub fn replace_in_events(
        &mut self,
        sheet: &mut EventsSheet,
        inputs: &SearchInEventsInputs,
    ) -> Vec<EventId> {
        self.state = SearchState::Editing;
        let modified = replace_in_events(sheet, inputs);
        info!(
            query = %inputs.search_text,
            replacement = %inputs.replace_text,
            modified = modified.len(),
            "Replace completed"
        );
        self.set_state(SearchState::HasResults {
            results: modified.clone(),
            focus_offset: None,
        });
        modified
    }

    /// Focuses the next result, wrapping to the first.
    pub fn go_to_next_search_result(
        &mut self,
        sheet: &EventsSheet,
        selection: &Selection,
    ) -> Option<EventId> {
        let (state, focused) = next_match(std::mem::take(&mut self.state), sheet, selection);
        self.set_state(state);
        focused
    }

    /// Focuses the previous result, wrapping to the last.
    pub fn go_to_previous_search_result(
        &mut self,
        sheet: &EventsSheet,
        selection: &Selection,
    ) -> Option<EventId> {
        let (state, focused) = prev_match(std::mem::take(&mut self.state), sheet, selection);
        self.set_state(state);
        focused
    }

    /// Drops the results.
    pub fn clear_search_results(&mut self) {
        self.set_state(SearchState::Idle);
    }

    /// Current deduplicated results.
    pub fn search_results(&self) -> &[EventId] {
        self.state.results()
    }

    /// Index of the focused result.
    pub fn search_focus_offset(&self) -> Option<usize> {
        self.state.focus_offset()
    }

    /// The focused result.
    pub fn focused_result(&self) -> Option<EventId> {
        self.search_focus_offset()
            .and_then(|offset| self.search_results().get(offset).copied())
    }

    fn set_state(&mut self, state: SearchState) {
        self.state = state;
        self.generation = self.generation.wrapping_add(1);
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
