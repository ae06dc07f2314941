//! Domain model types.
//!
//! The events sheet arena, node identifiers, locator contexts, the serialized
//! document form and the error taxonomy.

pub mod context;
pub mod document;
pub mod error;
pub mod identifiers;
pub mod sheet;

// Re-export for convenience
pub use context::{EventContext, InstructionContext, InstructionsListContext};
pub use document::{EventDocument, InstructionDocument, SheetDocument};
pub use error::{AppError, InputError, LoadError, TreeError};
pub use identifiers::{EventId, EventsListId, InstructionId, InstructionsListId};
pub use sheet::{EventsSheet, COMMENT_EVENT_TYPE};
