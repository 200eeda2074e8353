//! Command-line interface module
//!
//! This module contains the implementation of the scrub command.

use std::path::{Path, PathBuf};

pub mod scrub;

/// Common CLI utilities
pub mod utils {
    use super::*;
    use crate::error::{Error as ScrubError, Result as ScrubResult};

    /// Read a source file into a string
    pub fn read_source(path: &Path) -> ScrubResult<String> {
        std::fs::read_to_string(path)
            .map_err(|err| ScrubError::Io(format!("{}: {}", path.display(), err)))
    }

    /// Write output to file or stdout
    pub fn write_output(content: &str, output_path: Option<&PathBuf>) -> ScrubResult<()> {
        match output_path {
            Some(path) => std::fs::write(path, content)
                .map_err(|err| ScrubError::Io(format!("{}: {}", path.display(), err))),
            None => {
                print!("{}", content);
                Ok(())
            }
        }
    }
}
