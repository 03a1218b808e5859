//! # Processor Module
//!
//! This module drives a run: it finds the candidate files, checks each one for
//! the new-style marker, and hands the rest to the header replacer.
//!
//! The three steps sit behind the [`FileLocator`], [`HeaderInspector`] and
//! [`HeaderReplacer`] traits. [`ProcessorConfig::from_config`] picks the
//! native or external implementations based on [`Backend`]; tests can plug in
//! their own.
//!
//! Files are handled one at a time, in locator order. A failed replacement is
//! recorded and reported, and processing moves on to the next file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::Pattern;
use tracing::{debug, trace};

use crate::config::{Backend, Config, DEFAULT_EXTENSIONS, DEFAULT_MARKER, DEFAULT_ROOTS, DEFAULT_SED_SCRIPT};
use crate::info_log;
use crate::inspector::{GrepInspector, HeaderInspector, MarkerInspector};
use crate::invocation::Invocation;
use crate::locator::{FileLocator, FindLocator, SearchScope, WalkLocator, normalize_relative_path};
use crate::output::{print_file_status, print_start_message};
use crate::replacer::{HeaderReplacer, ReplaceOutcome, RuleReplacer, SedReplacer};
use crate::report::{FileAction, FileReport};

/// Configuration for creating a Processor instance.
pub struct ProcessorConfig {
  /// Directory that roots, single-file paths and scripts are resolved against.
  pub base_dir: PathBuf,
  pub roots: Vec<String>,
  pub extensions: Vec<String>,
  pub marker: String,

  /// Glob patterns for candidates to drop in batch mode.
  pub ignore_patterns: Vec<String>,

  // Optional components; `None` selects the native implementation
  pub locator: Option<Box<dyn FileLocator>>,
  pub inspector: Option<Box<dyn HeaderInspector>>,
  pub replacer: Option<Box<dyn HeaderReplacer>>,
}

impl ProcessorConfig {
  /// Creates a new ProcessorConfig for the stock MADP layout under `base_dir`.
  ///
  /// Use struct update syntax to override specific fields:
  /// ```ignore
  /// ProcessorConfig {
  ///     roots: vec!["src".to_string()],
  ///     ..ProcessorConfig::new(base_dir)
  /// }
  /// ```
  pub fn new(base_dir: impl Into<PathBuf>) -> Self {
    Self {
      base_dir: base_dir.into(),
      roots: DEFAULT_ROOTS.iter().map(|s| s.to_string()).collect(),
      extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
      marker: DEFAULT_MARKER.to_string(),
      ignore_patterns: Vec::new(),
      locator: None,
      inspector: None,
      replacer: None,
    }
  }

  /// Builds a processor configuration from a loaded [`Config`], choosing the
  /// implementations for the configured backend.
  ///
  /// # Errors
  ///
  /// Returns an error if the native backend's rule script cannot be loaded.
  pub fn from_config(config: &Config, base_dir: &Path) -> Result<Self> {
    let script = config.script.as_ref().map(|script| base_dir.join(script));

    let locator: Box<dyn FileLocator> = match config.backend {
      Backend::Native => Box::new(WalkLocator),
      Backend::External => Box::new(FindLocator::new(config.tools.find.clone())),
    };

    let inspector: Box<dyn HeaderInspector> = match config.backend {
      Backend::Native => Box::new(MarkerInspector::new(config.marker.clone())),
      Backend::External => Box::new(GrepInspector::new(config.tools.grep.clone(), config.marker.clone())),
    };

    let replacer: Box<dyn HeaderReplacer> = match (config.backend, script) {
      (Backend::Native, Some(path)) => {
        debug!("Loading rule script {}", path.display());
        Box::new(RuleReplacer::from_script(&path)?)
      }
      (Backend::Native, None) => Box::new(RuleReplacer::builtin()),
      (Backend::External, script) => {
        let script = script.unwrap_or_else(|| base_dir.join(DEFAULT_SED_SCRIPT));
        debug!("Using sed script {}", script.display());
        Box::new(SedReplacer::new(config.tools.sed.clone(), script))
      }
    };

    Ok(Self {
      roots: config.roots.clone(),
      extensions: config.extensions.clone(),
      marker: config.marker.clone(),
      ignore_patterns: config.ignore.clone(),
      locator: Some(locator),
      inspector: Some(inspector),
      replacer: Some(replacer),
      ..Self::new(base_dir)
    })
  }
}

/// Processor for cleaning up file headers.
///
/// Holds the search scope and the three step implementations. It keeps no
/// per-file state between files.
pub struct Processor {
  /// What to search and where
  scope: SearchScope,

  /// Compiled ignore patterns, matched against base-relative paths
  ignore_patterns: Vec<Pattern>,

  /// Finds candidate files
  locator: Box<dyn FileLocator>,

  /// Checks files for the new-style marker
  inspector: Box<dyn HeaderInspector>,

  /// Rewrites headers in place
  replacer: Box<dyn HeaderReplacer>,
}

impl Processor {
  /// Creates a new processor with the specified configuration.
  ///
  /// # Errors
  ///
  /// Returns an error if any of the ignore patterns is not a valid glob.
  pub fn new(config: ProcessorConfig) -> Result<Self> {
    let ignore_patterns = config
      .ignore_patterns
      .iter()
      .map(|p| Pattern::new(p).with_context(|| format!("Invalid ignore pattern: {}", p)))
      .collect::<Result<Vec<_>>>()?;

    let marker = config.marker;

    Ok(Self {
      scope: SearchScope::new(config.base_dir, config.roots, config.extensions),
      ignore_patterns,
      locator: config.locator.unwrap_or_else(|| Box::new(WalkLocator)),
      inspector: config
        .inspector
        .unwrap_or_else(|| Box::new(MarkerInspector::new(marker))),
      replacer: config.replacer.unwrap_or_else(|| Box::new(RuleReplacer::builtin())),
    })
  }

  /// Runs the selected mode and returns one report per handled file.
  ///
  /// `Unsupported` touches nothing and returns no reports.
  ///
  /// # Errors
  ///
  /// Returns an error only when candidate discovery fails. Per-file failures
  /// are reported as [`FileAction::Failed`].
  pub fn dispatch(&self, invocation: &Invocation) -> Result<Vec<FileReport>> {
    match invocation {
      Invocation::ScanAll => self.clean_all(),
      Invocation::SingleFile(path) => Ok(vec![self.clean_file(path)]),
      Invocation::Unsupported(count) => {
        debug!("Unsupported argument count {}, nothing to do", count);
        Ok(Vec::new())
      }
    }
  }

  /// Lists the candidate files for a batch run, minus ignored paths.
  ///
  /// # Errors
  ///
  /// Returns an error if the locator fails.
  pub fn find_candidate_files(&self) -> Result<Vec<PathBuf>> {
    let files = self
      .locator
      .locate(&self.scope)
      .context("Failed to discover candidate files")?;

    if self.ignore_patterns.is_empty() {
      return Ok(files);
    }

    let total = files.len();
    let files: Vec<PathBuf> = files.into_iter().filter(|f| !self.is_ignored(f)).collect();
    debug!("Ignore patterns dropped {} of {} candidates", total - files.len(), total);

    Ok(files)
  }

  fn is_ignored(&self, path: &Path) -> bool {
    match self.ignore_patterns.iter().find(|p| p.matches_path(path)) {
      Some(pattern) => {
        trace!("Ignoring {} (matches {})", path.display(), pattern);
        true
      }
      None => false,
    }
  }

  /// Scans every configured root and cleans each candidate.
  pub fn clean_all(&self) -> Result<Vec<FileReport>> {
    let files = self.find_candidate_files()?;
    print_start_message(files.len());
    Ok(self.process_files(&files))
  }

  /// Cleans an explicit list of base-relative paths in order.
  pub fn process_files(&self, files: &[PathBuf]) -> Vec<FileReport> {
    files.iter().map(|file| self.process_file(file)).collect()
  }

  /// Cleans one file named on the command line. Relative paths are resolved
  /// against the base directory; no extension filtering is applied.
  pub fn clean_file(&self, path: &Path) -> FileReport {
    let relative = normalize_relative_path(path, &self.scope.base_dir);
    info_log!("Processing single file: {}", relative.display());
    self.process_file(&relative)
  }

  /// Inspects one base-relative file and replaces its header unless it
  /// already has the marker. The status line is printed before returning.
  pub fn process_file(&self, relative: &Path) -> FileReport {
    let target = self.scope.base_dir.join(relative);

    let report = if self.inspector.has_marker(&target) {
      trace!("Skipping: {} (marker present)", relative.display());
      FileReport::new(relative, FileAction::AlreadyReplaced)
    } else {
      debug!("Replacing header in {}", relative.display());
      match self.replacer.replace(&target) {
        Ok(ReplaceOutcome::Replaced) => FileReport::new(relative, FileAction::Replaced),
        Ok(ReplaceOutcome::Unchanged) => FileReport::new(relative, FileAction::Unchanged),
        Err(e) => {
          debug!("Replacement failed for {}: {}", relative.display(), e);
          FileReport::failed(relative, e.to_string())
        }
      }
    };

    print_file_status(&report);
    report
  }
}
