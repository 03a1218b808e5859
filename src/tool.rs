//! # Tool Module
//!
//! Thin wrapper around [`std::process::Command`] for the external backend.
//! Every invocation blocks until the child exits; there is no timeout.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, ExitStatus};

use tracing::trace;

/// Captured result of a finished tool invocation.
#[derive(Debug)]
pub struct ToolOutput {
  pub status: ExitStatus,
  pub stdout: Vec<u8>,
  pub stderr: String,
}

impl ToolOutput {
  pub fn success(&self) -> bool {
    self.status.success()
  }

  /// Exit status as shown to users: the exit code, or the signal description
  /// when the child was killed.
  pub fn status_display(&self) -> String {
    match self.status.code() {
      Some(code) => format!("exit status {code}"),
      None => self.status.to_string(),
    }
  }
}

/// Runs `program` with `args`, optionally inside `current_dir`, and captures
/// its output.
///
/// Only a failure to spawn is an `Err`; a nonzero exit status is reported
/// through [`ToolOutput::status`] so callers decide what it means.
pub fn run_tool<I, S>(program: &str, args: I, current_dir: Option<&Path>) -> std::io::Result<ToolOutput>
where
  I: IntoIterator<Item = S>,
  S: AsRef<OsStr>,
{
  let mut command = Command::new(program);
  command.args(args);
  if let Some(dir) = current_dir {
    command.current_dir(dir);
  }

  trace!("Running {:?}", command);

  let output = command.output()?;

  Ok(ToolOutput {
    status: output.status,
    stdout: output.stdout,
    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
  })
}

#[cfg(all(test, unix))]
mod tests {
  use super::*;

  #[test]
  fn test_run_tool_reports_exit_status() {
    let output = run_tool("sh", ["-c", "echo out; echo err >&2; exit 3"], None).unwrap();

    assert!(!output.success());
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(output.stdout, b"out\n");
    assert_eq!(output.stderr, "err");
    assert_eq!(output.status_display(), "exit status 3");
  }

  #[test]
  fn test_run_tool_missing_program_is_spawn_error() {
    assert!(run_tool("header-cleaner-no-such-tool", ["x"], None).is_err());
  }
}
