//! Tests for tree flattening and event rows.

use super::*;
use crate::model::{EventDocument, EventsListId, SheetDocument};
use crate::state::search::SearchInEventsInputs;
use crate::state::selection::{clear_selection, select_event};

// ===== Test Helpers =====

/// Adjacency-list tree: node `i` has `children[i]`.
struct VecTree {
    children: Vec<Vec<usize>>,
    expanded: Vec<bool>,
}

impl VecTree {
    fn new(node_count: usize) -> Self {
        Self {
            children: vec![Vec::new(); node_count],
            expanded: vec![true; node_count],
        }
    }

    fn with_children(mut self, parent: usize, children: &[usize]) -> Self {
        self.children[parent] = children.to_vec();
        self
    }

    fn collapsed(mut self, node: usize) -> Self {
        self.expanded[node] = false;
        self
    }
}

impl TreeSource for VecTree {
    type Node = usize;

    fn children(&self, node: usize) -> &[usize] {
        &self.children[node]
    }

    fn is_expanded(&self, node: usize) -> bool {
        self.expanded[node]
    }
}

fn standard() -> EventDocument {
    EventDocument::new("Standard")
}

// ===== flatten =====

#[test]
fn three_roots_with_expanded_middle_yield_five_rows() {
    // 0, 1 (children 3, 4), 2
    let tree = VecTree::new(5).with_children(1, &[3, 4]);
    let rows = flatten(&tree, &[0, 1, 2]);

    let nodes: Vec<usize> = rows.iter().map(|r| r.node).collect();
    assert_eq!(nodes, vec![0, 1, 3, 4, 2]);
    assert_eq!(rows[2].depth, 1);
    assert_eq!(rows[3].depth, 1);
    assert_eq!(rows[2].ancestor_line_continuation, vec![true]);
    assert_eq!(rows[3].ancestor_line_continuation, vec![true]);
    let last = rows.last().unwrap();
    assert_eq!(last.depth, 0);
    assert!(last.ancestor_line_continuation.is_empty());
    assert!(last.is_last_sibling);
}

#[test]
fn continuation_is_false_under_last_sibling() {
    // 0, 1 (children 2 (child 3))
    let tree = VecTree::new(4).with_children(1, &[2]).with_children(2, &[3]);
    let rows = flatten(&tree, &[0, 1]);

    let deepest = &rows[3];
    assert_eq!(deepest.node, 3);
    assert_eq!(deepest.depth, 2);
    assert_eq!(deepest.ancestor_line_continuation, vec![false, false]);
}

#[test]
fn continuation_tracks_each_ancestor_level() {
    // 0 (children 1 (children 3, 4), 2)
    let tree = VecTree::new(5).with_children(0, &[1, 2]).with_children(1, &[3, 4]);
    let rows = flatten(&tree, &[0]);

    let nodes: Vec<usize> = rows.iter().map(|r| r.node).collect();
    assert_eq!(nodes, vec![0, 1, 3, 4, 2]);
    assert_eq!(rows[2].ancestor_line_continuation, vec![false, true]);
    assert!(!rows[2].is_last_sibling);
    assert!(rows[3].is_last_sibling);
    assert_eq!(rows[3].index_in_parent, 1);
}

#[test]
fn collapsed_node_contributes_one_row() {
    let mut tree = VecTree::new(1002).with_children(0, &[1]).collapsed(0);
    // A chain below node 1 totalling 1000 descendants of node 0.
    for node in 1..1000 {
        tree.children[node] = vec![node + 1];
    }
    let rows = flatten(&tree, &[0, 1001]);

    assert_eq!(rows.len(), 2);
    assert!(rows[0].has_children);
    assert_eq!(rows[1].node, 1001);
}

#[test]
fn flatten_of_empty_forest_is_empty() {
    let tree = VecTree::new(0);
    assert!(flatten(&tree, &[]).is_empty());
}

#[test]
fn collapsed_sheet_event_with_thousand_descendants_is_one_row() {
    let mut event = standard().folded(true);
    for _ in 0..10 {
        let mut child = standard();
        for _ in 0..99 {
            child = child.with_sub_event(standard());
        }
        event = event.with_sub_event(child);
    }
    let sheet = EventsSheet::from_document(&SheetDocument {
        events: vec![event],
    });
    assert_eq!(sheet.total_events(), 1001);

    let rows = flatten(&sheet, sheet.roots());
    assert_eq!(rows.len(), 1);
}

// ===== Event rows =====

fn decorated_sheet() -> EventsSheet {
    EventsSheet::from_document(&SheetDocument {
        events: vec![
            standard().with_string("alpha"),
            standard()
                .disabled(true)
                .with_variable("Lives")
                .with_sub_event(standard().with_string("beta").with_variable("Ammo"))
                .with_sub_event(standard().folded(true).with_sub_event(standard())),
            standard().with_string("beta"),
        ],
    })
}

#[test]
fn event_rows_inherit_disabled_and_scopes() {
    let sheet = decorated_sheet();
    let rows = build_event_rows(&sheet, &clear_selection(), &EventsSearcher::new());
    let second = sheet.roots()[1];
    let child = sheet.sub_events(second)[0];

    assert_eq!(rows.len(), 5, "The folded grandchild stays hidden");
    assert!(!rows[0].disabled);
    assert!(rows[1].disabled);
    assert!(rows[2].disabled, "Inherited from the parent");
    assert!(!rows[4].disabled);

    assert_eq!(rows[2].context.scoped_containers, vec![second, child]);
    assert_eq!(rows[3].context.scoped_containers, vec![second]);
    assert!(rows[4].context.scoped_containers.is_empty());
}

#[test]
fn event_row_contexts_match_sheet_contexts() {
    let sheet = decorated_sheet();
    let rows = build_event_rows(&sheet, &clear_selection(), &EventsSearcher::new());
    for row in &rows {
        assert_eq!(Some(row.context.clone()), sheet.event_context(row.event()));
    }
    assert_eq!(
        rows[3].context.events_list,
        EventsListId::SubEvents(sheet.roots()[1])
    );
}

#[test]
fn event_rows_carry_selection_and_search_decoration() {
    let sheet = decorated_sheet();
    let first = sheet.roots()[0];
    let third = sheet.roots()[2];
    let child = sheet.sub_events(sheet.roots()[1])[0];

    let selection = select_event(
        clear_selection(),
        sheet.event_context(first).unwrap(),
        false,
    );
    let mut searcher = EventsSearcher::new();
    searcher.search_in_events(&sheet, &SearchInEventsInputs::new("beta"), |_| {});
    searcher.go_to_next_search_result(&sheet, &clear_selection());

    let rows = build_event_rows(&sheet, &selection, &searcher);
    let child_row = &rows[event_row(&rows, child).unwrap()];
    let third_row = &rows[event_row(&rows, third).unwrap()];

    assert!(rows[0].selected);
    assert!(!rows[0].highlighted);
    assert!(child_row.highlighted);
    assert!(child_row.focused);
    assert!(third_row.highlighted);
    assert!(!third_row.focused);
}

#[test]
fn event_row_lookup_and_contexts_at_rows() {
    let sheet = decorated_sheet();
    let rows = build_event_rows(&sheet, &clear_selection(), &EventsSearcher::new());
    let folded = sheet.sub_events(sheet.roots()[1])[1];
    let hidden = sheet.sub_events(folded)[0];

    assert_eq!(event_row(&rows, folded), Some(3));
    assert_eq!(event_row(&rows, hidden), None);

    let contexts = event_contexts_at_rows(&rows, &[0, 4, 99]);
    assert_eq!(contexts.len(), 2);
    assert_eq!(contexts[1].event, sheet.roots()[2]);
    assert_eq!(contexts[1].index_in_list, 2);
}
