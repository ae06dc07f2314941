//! Events sheet navigation core (evsheet)
//!
//! Selection model, search and replace with anchored result navigation, and
//! the flattened, virtualized view of an events tree.
//!
//! The state and view-state modules are pure: they take the sheet and the
//! current selection and return new values. [`session::SheetSession`] is the
//! stateful shell tying them to a viewport.

pub mod config;
pub mod logging;
pub mod model;
pub mod session;
pub mod source;
pub mod state;
pub mod view_state;
