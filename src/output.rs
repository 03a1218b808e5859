//! # Output Module
//!
//! This module centralizes all user-facing output for header-cleaner.
//! It provides consistent formatting, colors, and symbols for terminal output.
//!
//! Status lines go to stdout. Replacement failures are always printed, even in
//! quiet mode; everything else follows `-q` / `-v`.

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::report::{FileAction, FileReport, ProcessingSummary};

/// Symbols used in output
pub mod symbols {
  /// Header replaced
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Replacement failed
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Skipped or untouched
  pub const SKIPPED: &str = "-";
}

/// Print the initial "Found N candidate files..." line.
pub fn print_start_message(file_count: usize) {
  if is_quiet() {
    return;
  }

  let files_word = if file_count == 1 { "file" } else { "files" };
  println!("Found {} candidate {}...", file_count, files_word);
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Print the status line for one file as soon as it has been handled.
///
/// Replaced files are shown by default, skipped and untouched files only with
/// `-v`, failures always.
pub fn print_file_status(report: &FileReport) {
  let display_path = report.path.display();

  match report.action {
    FileAction::Replaced => {
      if !is_quiet() {
        println!(
          "  {} {}",
          symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
          display_path
        );
      }
    }
    FileAction::Failed => {
      println!(
        "  {} {} (replace failed: {})",
        symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
        display_path,
        report.detail.as_deref().unwrap_or("unknown error")
      );
    }
    FileAction::AlreadyReplaced | FileAction::Unchanged => {
      if is_verbose() {
        let note = if report.action == FileAction::AlreadyReplaced {
          "already has new-style header"
        } else {
          "no header matched"
        };
        println!(
          "  {} {} ({})",
          symbols::SKIPPED.if_supports_color(Stream::Stdout, |s| s.dimmed()),
          display_path.if_supports_color(Stream::Stdout, |s| s.dimmed()),
          note
        );
      }
    }
  }
}

/// Print the notice for an invocation that does nothing.
pub fn print_no_action(arg_count: usize) {
  if is_quiet() {
    return;
  }

  println!(
    "{}",
    format!("Received {arg_count} arguments; expected none (scan all) or one file. Nothing to do.")
      .if_supports_color(Stream::Stdout, |s| s.yellow())
  );
}

/// Print the processing summary.
///
/// Format: "Summary: X replaced, Y unchanged, Z already replaced, W failed"
/// In verbose mode, also shows timing.
pub fn print_summary(summary: &ProcessingSummary) {
  if is_quiet() {
    return;
  }

  let replaced_str = summary.replaced.if_supports_color(Stream::Stdout, |s| s.green());
  let failed_str = if summary.failed > 0 {
    summary.failed.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
  } else {
    summary.failed.if_supports_color(Stream::Stdout, |s| s.cyan()).to_string()
  };

  let mut summary_line = format!(
    "Summary: {} replaced, {} unchanged, {} already replaced, {} failed",
    replaced_str,
    summary.unchanged.if_supports_color(Stream::Stdout, |s| s.cyan()),
    summary.already_replaced.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    failed_str
  );

  if is_verbose() {
    summary_line.push_str(&format!(" ({:.2}s)", summary.processing_time.as_secs_f64()));
  }

  println!("{}", summary_line);
}
