//! # Inspector Module
//!
//! This module decides whether a file already carries the new-style header.
//! The check is a verbatim search for a marker token anywhere in the file.
//!
//! A file that cannot be searched (unreadable, missing, search tool failure)
//! is classified as "not yet replaced". The replacement step that follows
//! reports the underlying problem.

use std::ffi::OsStr;
use std::path::Path;

use tracing::debug;

use crate::tool::run_tool;

/// Trait for header inspectors.
///
/// Implementations report whether a file contains the marker that identifies
/// a new-style header.
pub trait HeaderInspector: Send + Sync {
  /// Returns `true` if the file at `path` contains the marker.
  fn has_marker(&self, path: &Path) -> bool;
}

/// Searches the file contents in-process.
pub struct MarkerInspector {
  marker: String,
}

impl MarkerInspector {
  pub fn new(marker: impl Into<String>) -> Self {
    Self { marker: marker.into() }
  }

  /// Checks a buffer for the marker.
  pub fn contains_marker(&self, content: &[u8]) -> bool {
    let needle = self.marker.as_bytes();
    if needle.is_empty() {
      return true;
    }
    content.windows(needle.len()).any(|window| window == needle)
  }
}

impl HeaderInspector for MarkerInspector {
  fn has_marker(&self, path: &Path) -> bool {
    match std::fs::read(path) {
      Ok(content) => self.contains_marker(&content),
      Err(e) => {
        debug!("Could not search {}: {}", path.display(), e);
        false
      }
    }
  }
}

/// Delegates the search to `grep -q -F`.
///
/// Exit status zero means the marker was found. Every other outcome, including
/// a failure to start grep, counts as "not found".
pub struct GrepInspector {
  program: String,
  marker: String,
}

impl GrepInspector {
  pub fn new(program: impl Into<String>, marker: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      marker: marker.into(),
    }
  }
}

impl HeaderInspector for GrepInspector {
  fn has_marker(&self, path: &Path) -> bool {
    let args = [
      OsStr::new("-q"),
      OsStr::new("-F"),
      OsStr::new("-e"),
      OsStr::new(&self.marker),
      OsStr::new("--"),
      path.as_os_str(),
    ];

    match run_tool(&self.program, args, None) {
      Ok(output) => {
        if !output.success() && !output.stderr.is_empty() {
          debug!("{} on {}: {}", self.program, path.display(), output.stderr);
        }
        output.success()
      }
      Err(e) => {
        debug!("Failed to run {}: {}", self.program, e);
        false
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::tempdir;

  use super::*;

  #[test]
  fn test_contains_marker() {
    let inspector = MarkerInspector::new("REPLACE_MADP_HEADER");

    assert!(inspector.contains_marker(b"/* REPLACE_MADP_HEADER */\n#include <vector>\n"));
    assert!(inspector.contains_marker(b"int x;\n// REPLACE_MADP_HEADER at the bottom"));
    assert!(!inspector.contains_marker(b"/* This file is part of MADP */\n"));
    assert!(!inspector.contains_marker(b"REPLACE_MADP_HEADE"));
    assert!(!inspector.contains_marker(b""));
  }

  #[test]
  fn test_marker_is_case_sensitive() {
    let inspector = MarkerInspector::new("REPLACE_MADP_HEADER");
    assert!(!inspector.contains_marker(b"replace_madp_header"));
  }

  #[test]
  fn test_has_marker_reads_file() {
    let temp_dir = tempdir().unwrap();
    let new_style = temp_dir.path().join("new.h");
    let old_style = temp_dir.path().join("old.h");
    fs::write(&new_style, "/* REPLACE_MADP_HEADER */\n").unwrap();
    fs::write(&old_style, "/* This file is part of MADP */\n").unwrap();

    let inspector = MarkerInspector::new("REPLACE_MADP_HEADER");
    assert!(inspector.has_marker(&new_style));
    assert!(!inspector.has_marker(&old_style));
  }

  #[test]
  fn test_has_marker_handles_non_utf8() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("latin1.cpp");
    let mut content = vec![0xE9, 0xFF, b'\n'];
    content.extend_from_slice(b"/* REPLACE_MADP_HEADER */");
    fs::write(&path, content).unwrap();

    assert!(MarkerInspector::new("REPLACE_MADP_HEADER").has_marker(&path));
  }

  #[test]
  fn test_missing_file_counts_as_not_replaced() {
    let inspector = MarkerInspector::new("REPLACE_MADP_HEADER");
    assert!(!inspector.has_marker(Path::new("/nonexistent/file.h")));
  }

  #[test]
  fn test_grep_missing_program_counts_as_not_replaced() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("new.h");
    fs::write(&path, "/* REPLACE_MADP_HEADER */\n").unwrap();

    let inspector = GrepInspector::new("header-cleaner-no-such-grep", "REPLACE_MADP_HEADER");
    assert!(!inspector.has_marker(&path));
  }
}
