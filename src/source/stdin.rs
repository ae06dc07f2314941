//! Stdin-based sheet source for piped input.

use crate::model::error::InputError;
use std::io::{BufReader, IsTerminal, Read};

/// Stdin source for a piped sheet (`cat sheet.json | evsheet`).
///
/// Refuses an interactive terminal so the CLI never blocks waiting for a
/// user who forgot to pipe data.
pub struct StdinSource<R: Read> {
    reader: BufReader<R>,
}

impl std::fmt::Debug for StdinSource<std::io::Stdin> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdinSource").finish_non_exhaustive()
    }
}

impl StdinSource<std::io::Stdin> {
    /// Create a new StdinSource from stdin.
    ///
    /// # Errors
    ///
    /// Returns `InputError::NoInput` if stdin is a TTY (interactive terminal).
    pub fn new() -> Result<Self, InputError> {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Err(InputError::NoInput);
        }
        Ok(Self::from_reader(stdin))
    }
}

impl<R: Read> StdinSource<R> {
    /// Create a source from any reader.
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    /// Reads everything until EOF.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` for I/O errors, including invalid UTF-8.
    pub fn read_all(&mut self) -> Result<String, InputError> {
        let mut contents = String::new();
        self.reader.read_to_string(&mut contents)?;
        Ok(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_all_returns_everything() {
        let data = b"{\"events\":\n[]}\n";
        let mut source = StdinSource::from_reader(&data[..]);
        assert_eq!(source.read_all().unwrap(), "{\"events\":\n[]}\n");
        assert_eq!(source.read_all().unwrap(), "", "EOF was reached");
    }

    #[test]
    fn read_all_rejects_invalid_utf8() {
        let data = [0xff, 0xfe, 0xfd];
        let mut source = StdinSource::from_reader(&data[..]);
        assert!(matches!(source.read_all(), Err(InputError::Io(_))));
    }
}
