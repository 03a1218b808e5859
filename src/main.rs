//! # header-cleaner
//!
//! Replaces legacy file headers in C/C++ source trees.

use anyhow::Result;
use header_cleaner::cli::{Cli, run_clean};

fn main() -> Result<()> {
  let cli = Cli::parse_args();
  run_clean(cli.clean_args)
}
