//! # Clean Command
//!
//! This module implements the header cleanup run: argument handling, config
//! loading, processing and the final summary and reports.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use crate::config::{Backend, CliOverrides, load_config};
use crate::info_log;
use crate::invocation::Invocation;
use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use crate::output::{print_blank_line, print_no_action, print_summary};
use crate::processor::{Processor, ProcessorConfig};
use crate::report::{FileReport, ProcessingSummary, ReportFormat, ReportGenerator};

/// Arguments for a cleanup run
#[derive(Args, Debug, Default)]
pub struct CleanArgs {
  /// File to process. With no file every configured root is scanned; with
  /// more than one nothing is done.
  #[arg(required = false, value_name = "FILE")]
  pub files: Vec<PathBuf>,

  /// Base directory that roots and relative paths are resolved against
  /// (default: current directory)
  #[arg(long, short = 'C', value_name = "DIR")]
  pub directory: Option<PathBuf>,

  /// Root directory to scan (repeatable, replaces the configured roots)
  #[arg(long = "root", value_name = "DIR")]
  pub roots: Vec<String>,

  /// File extension to scan (repeatable, replaces the configured extensions)
  #[arg(long = "ext", value_name = "EXT")]
  pub extensions: Vec<String>,

  /// Marker identifying files that already have the new header
  #[arg(long, value_name = "TEXT")]
  pub marker: Option<String>,

  /// Implementation used to find, inspect and rewrite files
  #[arg(long, value_enum, value_name = "BACKEND")]
  pub backend: Option<Backend>,

  /// Substitution script: a sed script for the external backend, a TOML rule
  /// file for the native backend
  #[arg(long, value_name = "FILE")]
  pub script: Option<PathBuf>,

  /// File patterns to ignore in batch mode (supports glob patterns)
  #[arg(long, short = 'i', value_name = "GLOB")]
  pub ignore: Vec<String>,

  /// Path to config file (default: .header-cleaner.toml in the base directory)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long)]
  pub no_config: bool,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except failures and errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,

  /// Generate a JSON report of the run and save it to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_json: Option<PathBuf>,

  /// Generate a CSV report of the run and save it to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_csv: Option<PathBuf>,
}

impl CleanArgs {
  fn cli_overrides(&self) -> CliOverrides {
    CliOverrides {
      roots: self.roots.clone(),
      extensions: self.extensions.clone(),
      marker: self.marker.clone(),
      backend: self.backend,
      script: self.script.clone(),
      ignore: self.ignore.clone(),
    }
  }
}

/// Run a cleanup with the given arguments.
///
/// Per-file failures are reported but still return `Ok(())`; only discovery
/// and configuration problems produce an error.
pub fn run_clean(args: CleanArgs) -> Result<()> {
  // Initialize tracing subscriber for structured logging
  init_tracing(args.quiet, args.verbose);

  // Set verbose mode for output formatting and info_log! macro
  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  let invocation = Invocation::from_args(&args.files);
  if let Invocation::Unsupported(count) = invocation {
    print_no_action(count);
    return Ok(());
  }

  let base_dir = resolve_base_dir(args.directory.as_deref())?;
  debug!("Using base directory: {}", base_dir.display());

  let mut config = load_config(args.config.as_deref(), &base_dir, args.no_config)?;
  config.merge_cli_overrides(args.cli_overrides());
  config.validate().context("Invalid configuration")?;

  if config.backend == Backend::External {
    info_log!("Using external tools: {}, {}, {}", config.tools.find, config.tools.grep, config.tools.sed);
  }

  let processor = Processor::new(ProcessorConfig::from_config(&config, &base_dir)?)?;

  let start_time = Instant::now();
  let file_reports = processor.dispatch(&invocation)?;
  let elapsed = start_time.elapsed();

  let summary = ProcessingSummary::from_reports(&file_reports, elapsed);

  print_blank_line();
  print_summary(&summary);

  write_reports(&args, &file_reports, &summary);

  Ok(())
}

fn resolve_base_dir(directory: Option<&Path>) -> Result<PathBuf> {
  let dir = match directory {
    Some(dir) => dir.to_path_buf(),
    None => std::env::current_dir().context("Failed to determine current directory")?,
  };

  dir
    .canonicalize()
    .with_context(|| format!("Base directory not accessible: {}", dir.display()))
}

fn write_reports(args: &CleanArgs, file_reports: &[FileReport], summary: &ProcessingSummary) {
  let requested = [
    (ReportFormat::Json, args.report_json.as_ref()),
    (ReportFormat::Csv, args.report_csv.as_ref()),
  ];

  for (format, output_path) in requested {
    let Some(output_path) = output_path else {
      continue;
    };

    let report_generator = ReportGenerator::new(format, output_path);
    if let Err(e) = report_generator.generate(file_reports, summary) {
      eprintln!("Error generating {} report: {}", format, e);
    } else {
      info_log!("Generated {} report at {}", format, output_path.display());
    }
  }
}
