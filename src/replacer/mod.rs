//! # Replacer Module
//!
//! This module rewrites a file's outdated header in place.
//!
//! - [`SedReplacer`] runs `sed --in-place -f <script> <file>` and judges the
//!   result by the exit status alone
//! - [`RuleReplacer`] applies a [`RuleScript`] in-process and writes the file
//!   back only when its content changed
//!
//! Neither keeps a backup. A failed run leaves the file in whatever state the
//! substitution left it.

mod file_io;
pub mod rules;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

pub use file_io::FileIO;
pub use rules::{RuleScript, ScriptError};
use tracing::trace;

use crate::tool::run_tool;

/// What a successful replacement did to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
  /// The file content changed
  Replaced,
  /// The substitution succeeded but matched nothing
  Unchanged,
}

/// Error raised when a replacement fails.
#[derive(Debug, thiserror::Error)]
pub enum ReplaceError {
  #[error("Failed to run '{program}': {source}")]
  Spawn { program: String, source: std::io::Error },

  #[error("'{program}' failed with {status}{}", format_stderr(.stderr))]
  ToolFailed {
    program: String,
    status: String,
    stderr: String,
  },

  #[error("Failed to read {}: {source}", .path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("Failed to write {}: {source}", .path.display())]
  Write { path: PathBuf, source: std::io::Error },

  #[error("{} is not valid UTF-8 (invalid byte at offset {valid_up_to})", .path.display())]
  NotUtf8 { path: PathBuf, valid_up_to: usize },
}

fn format_stderr(stderr: &str) -> String {
  if stderr.is_empty() {
    String::new()
  } else {
    format!(": {stderr}")
  }
}

/// Trait for components that rewrite a file's header in place.
pub trait HeaderReplacer: Send + Sync {
  fn replace(&self, path: &Path) -> Result<ReplaceOutcome, ReplaceError>;
}

/// Delegates the substitution to `sed --in-place -f <script>`.
pub struct SedReplacer {
  program: String,
  script: PathBuf,
}

impl SedReplacer {
  pub fn new(program: impl Into<String>, script: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
      script: script.into(),
    }
  }
}

impl HeaderReplacer for SedReplacer {
  fn replace(&self, path: &Path) -> Result<ReplaceOutcome, ReplaceError> {
    let before = std::fs::read(path).ok();

    let args = [
      OsStr::new("--in-place"),
      OsStr::new("-f"),
      self.script.as_os_str(),
      path.as_os_str(),
    ];
    let output = run_tool(&self.program, args, None).map_err(|source| ReplaceError::Spawn {
      program: self.program.clone(),
      source,
    })?;

    if !output.success() {
      return Err(ReplaceError::ToolFailed {
        program: self.program.clone(),
        status: output.status_display(),
        stderr: output.stderr,
      });
    }

    let after = std::fs::read(path).ok();
    if before.is_some() && before == after {
      trace!("{} left {} unchanged", self.program, path.display());
      Ok(ReplaceOutcome::Unchanged)
    } else {
      Ok(ReplaceOutcome::Replaced)
    }
  }
}

/// Applies a [`RuleScript`] in-process.
pub struct RuleReplacer {
  script: RuleScript,
}

impl RuleReplacer {
  pub const fn new(script: RuleScript) -> Self {
    Self { script }
  }

  /// Replacer using the built-in MADP header conversion.
  pub fn builtin() -> Self {
    Self::new(RuleScript::builtin())
  }

  /// Replacer using the rules in a TOML script file.
  pub fn from_script(path: &Path) -> Result<Self, ScriptError> {
    RuleScript::load(path).map(Self::new)
  }
}

impl HeaderReplacer for RuleReplacer {
  fn replace(&self, path: &Path) -> Result<ReplaceOutcome, ReplaceError> {
    let content = FileIO::read_full_content(path)?;
    let updated = self.script.apply(&content);

    if updated == content {
      trace!("No rule matched in {}", path.display());
      return Ok(ReplaceOutcome::Unchanged);
    }

    FileIO::write_file(path, &updated)?;
    Ok(ReplaceOutcome::Replaced)
  }
}
