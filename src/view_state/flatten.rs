//! Tree flattening.
//!
//! [`flatten`] turns a nested, partially expanded tree into the ordered list
//! of visible rows. Collapsed nodes contribute exactly one row whatever the
//! size of their subtree, which keeps the row count bounded by what can be
//! shown.
//!
//! [`build_event_rows`] flattens an [`EventsSheet`] (folded events are
//! collapsed) and decorates each row with what the sheet view needs: the
//! event context, inherited disabled state, selection and search
//! highlighting.

use std::collections::HashSet;

use crate::model::{EventContext, EventId, EventsListId, EventsSheet};
use crate::state::search::EventsSearcher;
use crate::state::selection::{is_event_selected, Selection};

// ===== Generic flattening =====

/// A tree that can be flattened.
pub trait TreeSource {
    /// Node identity.
    type Node: Copy;

    /// Ordered children of `node`.
    fn children(&self, node: Self::Node) -> &[Self::Node];

    /// Whether the children of `node` are shown.
    fn is_expanded(&self, node: Self::Node) -> bool;
}

impl TreeSource for EventsSheet {
    type Node = EventId;

    fn children(&self, node: EventId) -> &[EventId] {
        self.sub_events(node)
    }

    fn is_expanded(&self, node: EventId) -> bool {
        !self.is_folded(node)
    }
}

/// One visible row of a flattened tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRow<N> {
    /// Node shown on this row.
    pub node: N,
    /// Nesting depth, 0 for roots.
    pub depth: usize,
    /// Entry `i` is true iff the ancestor at depth `i` has a later sibling.
    ///
    /// Always `depth` entries long.
    pub ancestor_line_continuation: Vec<bool>,
    /// Whether the node has children (shown or not).
    pub has_children: bool,
    /// Whether the node is the last of its siblings.
    pub is_last_sibling: bool,
    /// Index of the node among its siblings.
    pub index_in_parent: usize,
}

/// Flattens the visible part of a tree in depth-first order.
pub fn flatten<S: TreeSource>(source: &S, roots: &[S::Node]) -> Vec<FlatRow<S::Node>> {
    struct Pending<N> {
        node: N,
        continuation: Vec<bool>,
        is_last: bool,
        index: usize,
    }

    let mut rows = Vec::new();
    let last_root = roots.len().saturating_sub(1);
    let mut stack: Vec<Pending<S::Node>> = roots
        .iter()
        .enumerate()
        .rev()
        .map(|(index, node)| Pending {
            node: *node,
            continuation: Vec::new(),
            is_last: index == last_root,
            index,
        })
        .collect();

    while let Some(pending) = stack.pop() {
        let children = source.children(pending.node);
        let has_children = !children.is_empty();

        if has_children && source.is_expanded(pending.node) {
            let mut child_continuation = pending.continuation.clone();
            child_continuation.push(!pending.is_last);
            let last_child = children.len() - 1;
            stack.extend(children.iter().enumerate().rev().map(|(index, child)| Pending {
                node: *child,
                continuation: child_continuation.clone(),
                is_last: index == last_child,
                index,
            }));
        }

        rows.push(FlatRow {
            node: pending.node,
            depth: pending.continuation.len(),
            ancestor_line_continuation: pending.continuation,
            has_children,
            is_last_sibling: pending.is_last,
            index_in_parent: pending.index,
        });
    }

    rows
}

// ===== Event rows =====

/// A flattened event decorated for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    /// Position in the flattened tree.
    pub row: FlatRow<EventId>,
    /// Row index in the flattened list.
    pub row_index: usize,
    /// Locator of the event.
    pub context: EventContext,
    /// Disabled itself or through an ancestor.
    pub disabled: bool,
    /// In the event selection.
    pub selected: bool,
    /// One of the current search results.
    pub highlighted: bool,
    /// The focused search result.
    pub focused: bool,
}

impl EventRow {
    /// Event shown on this row.
    pub fn event(&self) -> EventId {
        self.row.node
    }
}

/// Flattens the sheet and decorates every row.
pub fn build_event_rows(
    sheet: &EventsSheet,
    selection: &Selection,
    searcher: &EventsSearcher,
) -> Vec<EventRow> {
    let results: HashSet<EventId> = searcher.search_results().iter().copied().collect();
    let focused = searcher.focused_result();

    // Per-depth stacks; rows arrive in pre-order so truncating to the row
    // depth leaves exactly its ancestors.
    let mut disabled_stack: Vec<bool> = Vec::new();
    let mut scope_stack: Vec<Vec<EventId>> = Vec::new();

    flatten(sheet, sheet.roots())
        .into_iter()
        .enumerate()
        .map(|(row_index, row)| {
            let event = row.node;
            disabled_stack.truncate(row.depth);
            scope_stack.truncate(row.depth);

            let disabled =
                disabled_stack.last().copied().unwrap_or(false) || sheet.is_disabled(event);
            disabled_stack.push(disabled);

            let mut scoped_containers = scope_stack.last().cloned().unwrap_or_default();
            if !sheet.local_variables(event).is_empty() {
                scoped_containers.push(event);
            }
            scope_stack.push(scoped_containers.clone());

            let context = EventContext {
                events_list: sheet.parent_list(event).unwrap_or(EventsListId::Root),
                event,
                index_in_list: row.index_in_parent,
                scoped_containers,
            };

            EventRow {
                row_index,
                context,
                disabled,
                selected: is_event_selected(selection, event),
                highlighted: results.contains(&event),
                focused: focused == Some(event),
                row,
            }
        })
        .collect()
}

/// Row index of an event, `None` when it is hidden or gone.
pub fn event_row(rows: &[EventRow], event: EventId) -> Option<usize> {
    rows.iter().position(|row| row.event() == event)
}

/// Contexts of the events at the given rows; out-of-range rows are skipped.
pub fn event_contexts_at_rows(rows: &[EventRow], indices: &[usize]) -> Vec<EventContext> {
    indices
        .iter()
        .filter_map(|index| rows.get(*index))
        .map(|row| row.context.clone())
        .collect()
}

#[cfg(test)]
#[path = "flatten_tests.rs"]
mod tests;
