//! Search matches over flattened rows.
//!
//! Matching runs on the visible rows only, so a match hidden inside a
//! collapsed subtree is not reported until its ancestors are expanded.

use std::collections::BTreeSet;

/// Row indices matching a query, plus the focused one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchMatches {
    /// Indices of matching rows, ascending.
    pub match_set: BTreeSet<usize>,
    /// Row holding the focused match, `None` without matches or focus.
    pub focus_index: Option<usize>,
}

impl SearchMatches {
    /// Whether `row` matches.
    pub fn is_match(&self, row: usize) -> bool {
        self.match_set.contains(&row)
    }

    /// Number of matching rows.
    pub fn len(&self) -> usize {
        self.match_set.len()
    }

    /// Whether no row matches.
    pub fn is_empty(&self) -> bool {
        self.match_set.is_empty()
    }
}

/// Applies `predicate` to every row and resolves the focused match.
///
/// The focus wraps: offset `k` focuses the `k mod n`-th of `n` matches.
///
/// # Examples
///
/// ```
/// # use evsheet::view_state::search_matches::compute_search_matches;
/// let rows = ["apple", "pear", "pineapple", "plum"];
/// let contains = |row: &&str, query: &str| row.contains(query);
/// let matches = compute_search_matches(&rows, contains, "apple", Some(3));
/// assert_eq!(matches.match_set.iter().copied().collect::<Vec<_>>(), vec![0, 2]);
/// assert_eq!(matches.focus_index, Some(2));
/// ```
pub fn compute_search_matches<R, Q, P>(
    rows: &[R],
    predicate: P,
    query: &Q,
    focus_offset: Option<usize>,
) -> SearchMatches
where
    Q: ?Sized,
    P: Fn(&R, &Q) -> bool,
{
    let match_indices: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| predicate(row, query))
        .map(|(index, _)| index)
        .collect();

    let focus_index = match (focus_offset, match_indices.len()) {
        (_, 0) | (None, _) => None,
        (Some(offset), len) => Some(match_indices[offset % len]),
    };

    SearchMatches {
        match_set: match_indices.into_iter().collect(),
        focus_index,
    }
}
