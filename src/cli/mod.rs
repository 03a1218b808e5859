//! # CLI Module
//!
//! This module contains the command-line interface implementation.
//! It uses clap for argument parsing.

mod clean;

pub use clean::{CleanArgs, run_clean};
use clap::Parser;
use clap::builder::styling::{AnsiColor, Color, Style, Styles};

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  author,
  version = VERSION,
  about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Replace legacy headers in every file under the default roots
  header-cleaner -C src/

  # Replace the header of a single file
  header-cleaner base/Globals.h

  # Use find, grep and sed with a custom sed script
  header-cleaner --backend external --script ../header_replacement/header_cleaner_release.sed

  # Scan different roots and extensions, skipping generated code
  header-cleaner --root lib --root include --ext cpp --ext hpp --ignore \"lib/generated/*\"

  # Write a JSON report of what was changed
  header-cleaner --report-json report.json
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(flatten)]
  pub clean_args: CleanArgs,
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use clap::CommandFactory;

  use super::*;
  use crate::config::Backend;
  use crate::logging::ColorMode;

  #[test]
  fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_parse_flags() {
    let cli = Cli::try_parse_from([
      "header-cleaner",
      "-C",
      "/tmp/madp",
      "--root",
      "base",
      "--root",
      "solvers",
      "--backend",
      "external",
      "-i",
      "base/legacy/*",
      "--colors",
      "never",
      "-vv",
    ])
    .unwrap();

    let args = cli.clean_args;
    assert_eq!(args.directory, Some(PathBuf::from("/tmp/madp")));
    assert_eq!(args.roots, vec!["base", "solvers"]);
    assert_eq!(args.backend, Some(Backend::External));
    assert_eq!(args.ignore, vec!["base/legacy/*"]);
    assert_eq!(args.colors, ColorMode::Never);
    assert_eq!(args.verbose, 2);
    assert!(args.files.is_empty());
  }

  #[test]
  fn test_parse_positional_files() {
    let cli = Cli::try_parse_from(["header-cleaner", "a.h", "b.h"]).unwrap();
    assert_eq!(cli.clean_args.files.len(), 2);
  }

  #[test]
  fn test_quiet_conflicts_with_verbose() {
    assert!(Cli::try_parse_from(["header-cleaner", "-q", "-v"]).is_err());
  }
}
