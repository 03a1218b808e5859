//! # File I/O Module
//!
//! Reading and writing of target files for the native replacer.

use std::path::Path;

use super::ReplaceError;

/// File I/O operations for the native replacer.
pub struct FileIO;

impl FileIO {
  /// Reads the whole file as UTF-8.
  ///
  /// Files that are not valid UTF-8 are rejected rather than rewritten lossily.
  pub fn read_full_content(path: &Path) -> Result<String, ReplaceError> {
    let bytes = std::fs::read(path).map_err(|source| ReplaceError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    String::from_utf8(bytes).map_err(|e| ReplaceError::NotUtf8 {
      path: path.to_path_buf(),
      valid_up_to: e.utf8_error().valid_up_to(),
    })
  }

  /// Overwrites the file in place.
  pub fn write_file(path: &Path, content: &str) -> Result<(), ReplaceError> {
    std::fs::write(path, content).map_err(|source| ReplaceError::Write {
      path: path.to_path_buf(),
      source,
    })
  }
}
