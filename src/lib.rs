//! # header-cleaner
//!
//! Replaces the legacy comment banner at the top of C/C++ sources with a
//! standardized header.
//!
//! Files that already contain the header marker (`REPLACE_MADP_HEADER` by
//! default) are left alone, so a run can be repeated safely. With no
//! arguments every `.cpp` and `.h` file under the configured roots is handled;
//! with one argument only that file is.
//!
//! ## Features
//!
//! * Batch mode over a fixed set of root directories, or single-file mode
//! * Native backend (walkdir, in-process marker search, regex rule scripts)
//! * External backend that delegates to `find`, `grep` and `sed`
//! * Ignore patterns, a TOML config file, and JSON/CSV reports
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use header_cleaner::invocation::Invocation;
//! use header_cleaner::processor::{Processor, ProcessorConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     // Default roots, extensions and marker, built-in MADP rules
//!     let processor = Processor::new(ProcessorConfig::new("madp/src"))?;
//!
//!     let reports = processor.dispatch(&Invocation::ScanAll)?;
//!     println!("Handled {} files", reports.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`processor`] - Drives a run over the located files
//! * [`locator`], [`inspector`], [`replacer`] - The three pluggable steps
//! * [`config`] - Config file discovery and CLI overrides
//! * [`logging`] - Logging utilities for verbose output

pub mod cli;
pub mod config;
pub mod inspector;
pub mod invocation;
pub mod locator;
pub mod logging;
pub mod output;
pub mod processor;
pub mod replacer;
pub mod report;
pub mod tool;
