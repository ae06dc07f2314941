//! Error types for evsheet.
//!
//! This module defines a hierarchical error taxonomy using `thiserror`. Errors compose via
//! `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level CLI error wrapping all domain-specific failures
//!   - [`LoadError`] - Reading or decoding an events sheet document
//!     - [`InputError`] - File/stdin reading failures
//!   - [`ConfigError`](crate::config::ConfigError) - Configuration file failures
//!   - [`LoggingError`](crate::logging::LoggingError) - Tracing initialization failures
//! - [`TreeError`] - Explicit tree edits addressed at missing nodes or bad indices
//!
//! # What is NOT an error
//!
//! The navigation core never fails across its public boundary. Stale identities resolve to
//! `None`, navigation without results returns `None`, out-of-range row probes return zero,
//! and the unsupported "search in selection" scope is logged and ignored. Only explicit
//! structural edits (inserting into a list that no longer exists, for instance) report a
//! [`TreeError`].

use std::path::PathBuf;
use thiserror::Error;

use super::identifiers::{EventId, EventsListId, InstructionId, InstructionsListId};

/// Top-level application error encompassing all failure modes of the CLI.
///
/// # Examples
///
/// ```no_run
/// use evsheet::model::error::{AppError, InputError};
///
/// fn run() -> Result<(), AppError> {
///     // InputError converts to AppError through LoadError
///     let _sheet = read_sheet()?;
///     Ok(())
/// }
/// # fn read_sheet() -> Result<(), InputError> { Ok(()) }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to load the events sheet.
    #[error("Failed to load events sheet: {0}")]
    Load(#[from] LoadError),

    /// Failed to load configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Failed to initialize logging.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Failed to write output.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl From<InputError> for AppError {
    fn from(err: InputError) -> Self {
        AppError::Load(LoadError::Input(err))
    }
}

/// Errors encountered when reading a sheet document from a file or stdin.
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified sheet file does not exist at the given path.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use evsheet::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.json")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.json"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The filesystem path that was not found.
        path: PathBuf,
    },

    /// No input source was provided: no file path and stdin is an interactive terminal.
    #[error("No input source: provide a file path or pipe a sheet to stdin")]
    NoInput,

    /// Generic I/O error reading from the input source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors encountered when turning raw input into an [`EventsSheet`](super::EventsSheet).
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input could not be read.
    #[error(transparent)]
    Input(#[from] InputError),

    /// The input is not a valid sheet document.
    ///
    /// The parser message is kept as a string so `serde_json` error state is not carried
    /// through the application.
    #[error("Invalid sheet document: {reason}")]
    Json {
        /// Parser error message.
        reason: String,
    },
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Json {
            reason: err.to_string(),
        }
    }
}

/// Errors from explicit structural edits of an events sheet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The event does not exist (never existed or was removed).
    #[error("Unknown event {0:?}")]
    UnknownEvent(EventId),

    /// The instruction does not exist (never existed or was removed).
    #[error("Unknown instruction {0:?}")]
    UnknownInstruction(InstructionId),

    /// The events list belongs to an event that no longer exists.
    #[error("Unknown events list {0:?}")]
    UnknownEventsList(EventsListId),

    /// The instructions list belongs to a node that no longer exists.
    #[error("Unknown instructions list {0:?}")]
    UnknownInstructionsList(InstructionsListId),

    /// The event is a comment, which cannot own sub-events.
    #[error("Event {0:?} cannot have sub-events")]
    CannotHaveSubEvents(EventId),

    /// An index is past the end of the list it addresses.
    #[error("Index {index} out of bounds (len: {len})")]
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Length of the addressed list.
        len: usize,
    },
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn input_error_file_not_found_display() {
        let err = InputError::FileNotFound {
            path: PathBuf::from("/tmp/sheet.json"),
        };
        assert_eq!(err.to_string(), "File not found: /tmp/sheet.json");
    }

    #[test]
    fn input_error_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let input_err: InputError = io_err.into();
        let msg = input_err.to_string();
        assert!(msg.contains("IO error"));
        assert!(msg.contains("access denied"));
    }

    #[test]
    fn load_error_from_serde_json_keeps_message() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let expected = json_err.to_string();
        let load_err: LoadError = json_err.into();
        match load_err {
            LoadError::Json { reason } => assert_eq!(reason, expected),
            other => panic!("Expected Json variant, got {:?}", other),
        }
    }

    #[test]
    fn app_error_from_input_error_goes_through_load() {
        let app_err: AppError = InputError::NoInput.into();
        let msg = app_err.to_string();
        assert!(msg.contains("Failed to load events sheet"));
        assert!(msg.contains("No input source"));
    }

    #[test]
    fn tree_error_index_out_of_bounds_display() {
        let err = TreeError::IndexOutOfBounds { index: 7, len: 3 };
        assert_eq!(err.to_string(), "Index 7 out of bounds (len: 3)");
    }
}
