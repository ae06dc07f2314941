//! Sheet input sources.
//!
//! A sheet is a JSON [`SheetDocument`] read either from a file or from
//! piped stdin, then loaded into an [`EventsSheet`].

use crate::model::error::{InputError, LoadError};
use crate::model::{EventsSheet, SheetDocument};
use std::path::PathBuf;
use tracing::info;

pub mod file;
pub mod stdin;

pub use file::FileSource;
pub use stdin::StdinSource;

/// Unified input source for a sheet document.
///
/// Sum type enforces exactly one variant.
#[derive(Debug)]
pub enum InputSource {
    /// File source, read at construction.
    File(FileSource),
    /// Piped stdin, read on demand.
    Stdin(StdinSource<std::io::Stdin>),
}

impl InputSource {
    /// Raw document text.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` when reading stdin fails.
    pub fn read_to_string(self) -> Result<String, InputError> {
        match self {
            InputSource::File(f) => Ok(f.into_contents()),
            InputSource::Stdin(mut s) => s.read_all(),
        }
    }
}

/// Detect and create appropriate input source.
///
/// # Logic:
/// 1. If file path is provided: create FileSource (loads on construction)
/// 2. If stdin is piped: use StdinSource
/// 3. Else: return InputError::NoInput
///
/// # Errors
///
/// Returns `InputError::NoInput` if no file is provided and stdin is not piped.
/// Returns `InputError::FileNotFound` if file does not exist.
/// Returns `InputError::Io` for I/O errors during file reading.
pub fn detect_input_source(file: Option<PathBuf>) -> Result<InputSource, InputError> {
    match file {
        Some(path) => Ok(InputSource::File(FileSource::new(path)?)),
        None => Ok(InputSource::Stdin(StdinSource::new()?)),
    }
}

/// Parses a sheet document.
///
/// # Errors
///
/// Returns `LoadError::Json` when the text is not a valid document.
pub fn parse_sheet(text: &str) -> Result<SheetDocument, LoadError> {
    Ok(serde_json::from_str(text)?)
}

/// Reads and loads a sheet from `source`.
///
/// # Errors
///
/// Returns `LoadError::Input` when reading fails and `LoadError::Json` when
/// parsing fails.
pub fn load_sheet(source: InputSource) -> Result<EventsSheet, LoadError> {
    let text = source.read_to_string()?;
    let document = parse_sheet(&text)?;
    let sheet = EventsSheet::from_document(&document);
    info!(
        roots = sheet.roots().len(),
        events = sheet.total_events(),
        "Sheet loaded"
    );
    Ok(sheet)
}
