//! Editor state (pure).
//!
//! Selection transitions, search/replace with result navigation, tree
//! linearization and folding helpers. Nothing here renders.

pub mod match_navigation_handler;
pub mod position_finder;
pub mod search;
pub mod selection;
pub mod unfolder;

// Re-export for convenience
pub use match_navigation_handler::{initial_focus_offset, next_match, prev_match};
pub use position_finder::find_positions;
pub use search::{
    EventsSearcher, MatchHandle, MatchSurface, PlainSentenceFormatter, SearchInEventsInputs,
    SearchQuery, SearchState, SentenceFormatter,
};
pub use selection::{EventAncestry, SelectedInstruction, SelectedInstructionsList, Selection};
pub use unfolder::{fold_all, unfold_to_level, unfold_when_containing};
