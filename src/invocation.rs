//! # Invocation Module
//!
//! Maps the positional arguments onto the mode of the run. The mode is chosen
//! once at startup and handed to [`Processor::dispatch`].
//!
//! [`Processor::dispatch`]: crate::processor::Processor::dispatch

use std::path::PathBuf;

/// The mode selected by the positional argument count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
  /// No arguments: scan every configured root.
  ScanAll,
  /// One argument: process exactly this file.
  SingleFile(PathBuf),
  /// Any other count: do nothing.
  Unsupported(usize),
}

impl Invocation {
  pub fn from_args(args: &[PathBuf]) -> Self {
    match args {
      [] => Self::ScanAll,
      [path] => Self::SingleFile(path.clone()),
      rest => Self::Unsupported(rest.len()),
    }
  }
}
