//! File-based sheet source.

use crate::model::error::InputError;
use std::path::{Path, PathBuf};

/// A sheet read from a file, loaded once at construction.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    contents: String,
}

impl FileSource {
    /// Reads the whole file.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if the file does not exist.
    /// Returns `InputError::Io` for other I/O errors.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(InputError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            contents,
        })
    }

    /// Path the sheet was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file contents.
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Takes the contents, consuming the source.
    pub fn into_contents(self) -> String {
        self.contents
    }
}
