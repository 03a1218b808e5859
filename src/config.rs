//! # Configuration Module
//!
//! This module provides configuration support for header-cleaner: which
//! directories to scan, which extensions count as C/C++ files, the marker that
//! identifies a new-style header, and how the substitution is carried out.
//!
//! Configuration can be specified in a `.header-cleaner.toml` file in the base
//! directory, via the `HEADER_CLEANER_CONFIG` environment variable, or with
//! `--config`. Command-line flags override individual values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".header-cleaner.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "HEADER_CLEANER_CONFIG";

/// Marker token carried by every new-style header.
pub const DEFAULT_MARKER: &str = "REPLACE_MADP_HEADER";

/// Source directories scanned in batch mode, relative to the base directory.
pub const DEFAULT_ROOTS: &[&str] = &[
  "base", "planning", "support", "solvers", "parser", "include", "examples", "utils",
];

/// Extensions of the files that carry headers.
pub const DEFAULT_EXTENSIONS: &[&str] = &["cpp", "h"];

/// sed script used by the external backend when none is configured.
pub const DEFAULT_SED_SCRIPT: &str = "../header_replacement/header_cleaner_release.sed";

/// Which implementation carries out discovery, inspection and substitution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  /// In-process traversal, marker search and regex rules
  #[default]
  Native,
  /// Delegate to `find`, `grep` and `sed`
  External,
}

/// Program names for the external backend.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToolsConfig {
  pub find: String,
  pub grep: String,
  pub sed: String,
}

impl Default for ToolsConfig {
  fn default() -> Self {
    Self {
      find: "find".to_string(),
      grep: "grep".to_string(),
      sed: "sed".to_string(),
    }
  }
}

/// Main configuration struct for header-cleaner.
///
/// Every field has a default, so an empty file (or no file at all) yields the
/// stock setup for the MADP source tree.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
  /// Root directories scanned in batch mode.
  pub roots: Vec<String>,

  /// File extensions without the leading dot.
  pub extensions: Vec<String>,

  /// Literal marker identifying files that already have the new header.
  pub marker: String,

  /// Implementation used for all three steps.
  pub backend: Backend,

  /// Substitution script. A sed script for the external backend, a TOML rule
  /// file for the native backend. `None` selects the backend's default.
  pub script: Option<PathBuf>,

  /// Glob patterns (relative to the base directory) excluded from batch mode.
  pub ignore: Vec<String>,

  /// Program names for the external backend.
  pub tools: ToolsConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      roots: DEFAULT_ROOTS.iter().map(|s| s.to_string()).collect(),
      extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
      marker: DEFAULT_MARKER.to_string(),
      backend: Backend::default(),
      script: None,
      ignore: Vec::new(),
      tools: ToolsConfig::default(),
    }
  }
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// A configuration value is invalid.
  #[error("Invalid value for '{key}': {message}")]
  InvalidValue { key: &'static str, message: String },
}

/// Values given on the command line that take precedence over the config file.
#[derive(Debug, Default)]
pub struct CliOverrides {
  pub roots: Vec<String>,
  pub extensions: Vec<String>,
  pub marker: Option<String>,
  pub backend: Option<Backend>,
  pub script: Option<PathBuf>,
  pub ignore: Vec<String>,
}

impl Config {
  /// Load configuration from a file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.validate()?;

    Ok(config)
  }

  /// Validate the configuration.
  ///
  /// Checks that:
  /// - At least one root and one extension are configured
  /// - The marker is non-empty
  /// - Extensions don't include the leading dot
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.roots.is_empty() {
      return Err(ConfigError::InvalidValue {
        key: "roots",
        message: "at least one root directory is required".to_string(),
      });
    }

    if self.extensions.is_empty() {
      return Err(ConfigError::InvalidValue {
        key: "extensions",
        message: "at least one extension is required".to_string(),
      });
    }

    for ext in &self.extensions {
      if ext.starts_with('.') {
        return Err(ConfigError::InvalidValue {
          key: "extensions",
          message: format!("extension '{ext}' should not include leading dot"),
        });
      }
      if ext.is_empty() {
        return Err(ConfigError::InvalidValue {
          key: "extensions",
          message: "extension cannot be empty".to_string(),
        });
      }
    }

    if self.marker.is_empty() {
      return Err(ConfigError::InvalidValue {
        key: "marker",
        message: "marker cannot be empty".to_string(),
      });
    }

    Ok(())
  }

  /// Merge command-line values into this configuration.
  ///
  /// List values replace the configured list when given; ignore patterns are
  /// appended.
  pub fn merge_cli_overrides(&mut self, overrides: CliOverrides) {
    if !overrides.roots.is_empty() {
      self.roots = overrides.roots;
    }
    if !overrides.extensions.is_empty() {
      self.extensions = overrides
        .extensions
        .into_iter()
        .map(|e| e.trim_start_matches('.').to_string())
        .collect();
    }
    if let Some(marker) = overrides.marker {
      self.marker = marker;
    }
    if let Some(backend) = overrides.backend {
      self.backend = backend;
    }
    if let Some(script) = overrides.script {
      self.script = Some(script);
    }
    self.ignore.extend(overrides.ignore);
  }
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `HEADER_CLEANER_CONFIG` environment variable
/// 3. `.header-cleaner.toml` in the base directory
pub fn discover_config_path(explicit_path: Option<&Path>, base_dir: &Path) -> Option<PathBuf> {
  let env_path = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
  discover_config_path_from(explicit_path, env_path, base_dir)
}

/// Same lookup as [`discover_config_path`], with the environment value passed
/// in instead of read from the process.
pub fn discover_config_path_from(
  explicit_path: Option<&Path>,
  env_path: Option<PathBuf>,
  base_dir: &Path,
) -> Option<PathBuf> {
  if let Some(path) = explicit_path {
    if path.exists() {
      verbose_log!("Using explicit config path: {}", path.display());
      return Some(path.to_path_buf());
    }
    verbose_log!("Explicit config path does not exist: {}", path.display());
    return None;
  }

  if let Some(path) = env_path {
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, path.display());
  }

  let base_config = base_dir.join(DEFAULT_CONFIG_FILENAME);
  if base_config.exists() {
    verbose_log!("Using config: {}", base_config.display());
    return Some(base_config);
  }

  verbose_log!("No config file found");
  None
}

/// Load configuration from the discovered path, or return the defaults.
///
/// An explicit `--config` path that does not exist is an error rather than a
/// silent fallback.
pub fn load_config(explicit_path: Option<&Path>, base_dir: &Path, no_config: bool) -> Result<Config> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(Config::default());
  }

  if let Some(path) = explicit_path
    && !path.exists()
  {
    anyhow::bail!("Config file not found: {}", path.display());
  }

  match discover_config_path(explicit_path, base_dir) {
    Some(path) => Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display())),
    None => Ok(Config::default()),
  }
}
