//! # Locator Module
//!
//! Finds the C/C++ files whose headers are candidates for replacement.
//!
//! A [`SearchScope`] names the base directory, the root directories under it,
//! and the accepted extensions. A [`FileLocator`] turns that scope into an
//! ordered list of base-relative paths such as `base/Scope.h`. Two
//! implementations exist:
//!
//! - [`WalkLocator`] traverses the roots in-process with `walkdir`
//! - [`FindLocator`] delegates to `find -regextype sed -regex ...`
//!
//! Roots that do not exist are skipped with a warning. Any other traversal
//! problem aborts discovery with a [`DiscoveryError`].

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::tool::run_tool;

/// Error raised when candidate files cannot be enumerated.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
  /// A directory under a root could not be traversed.
  #[error("Failed to traverse '{root}': {source}")]
  Walk { root: String, source: walkdir::Error },

  /// The directory search tool could not be started.
  #[error("Failed to run '{program}': {source}")]
  Spawn { program: String, source: std::io::Error },

  /// The directory search tool exited unsuccessfully.
  #[error("'{program}' failed with {status}: {stderr}")]
  ToolFailed {
    program: String,
    status: String,
    stderr: String,
  },
}

/// What to search for and where.
#[derive(Debug, Clone)]
pub struct SearchScope {
  /// Directory the roots are resolved against.
  pub base_dir: PathBuf,
  /// Root directory names, relative to `base_dir`.
  pub roots: Vec<String>,
  /// Accepted extensions without the leading dot.
  pub extensions: Vec<String>,
}

impl SearchScope {
  pub fn new(base_dir: impl Into<PathBuf>, roots: Vec<String>, extensions: Vec<String>) -> Self {
    Self {
      base_dir: base_dir.into(),
      roots,
      extensions,
    }
  }

  /// Roots that exist as directories under the base directory, in configured
  /// order. Missing roots are logged and dropped.
  pub fn existing_roots(&self) -> Vec<&str> {
    self
      .roots
      .iter()
      .filter(|root| {
        let dir = self.base_dir.join(root);
        if dir.is_dir() {
          true
        } else {
          warn!("Skipping root '{}': not a directory under {}", root, self.base_dir.display());
          false
        }
      })
      .map(String::as_str)
      .collect()
  }

  /// Whether the file name ends in `.<ext>` for one of the configured
  /// extensions. Matching is case-sensitive.
  pub fn matches_extension(&self, path: &Path) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
      return false;
    };

    self.extensions.iter().any(|ext| {
      name
        .strip_suffix(ext.as_str())
        .is_some_and(|stem| stem.ends_with('.'))
    })
  }
}

/// Trait for components that enumerate candidate files.
pub trait FileLocator: Send + Sync {
  /// Returns the base-relative paths of all matching files, without
  /// duplicates, in traversal order.
  fn locate(&self, scope: &SearchScope) -> Result<Vec<PathBuf>, DiscoveryError>;
}

/// In-process traversal with `walkdir`.
///
/// Roots are visited in configured order and entries within a directory are
/// sorted by file name, so results are deterministic. Symlinks are not
/// followed.
#[derive(Debug, Default)]
pub struct WalkLocator;

impl FileLocator for WalkLocator {
  fn locate(&self, scope: &SearchScope) -> Result<Vec<PathBuf>, DiscoveryError> {
    let start_time = std::time::Instant::now();
    let mut files = Vec::new();

    for root in scope.existing_roots() {
      debug!("Scanning directory: {}", root);

      for entry in WalkDir::new(scope.base_dir.join(root)).sort_by_file_name() {
        let entry = entry.map_err(|source| DiscoveryError::Walk {
          root: root.to_string(),
          source,
        })?;

        if !entry.file_type().is_file() || !scope.matches_extension(entry.path()) {
          continue;
        }

        files.push(normalize_relative_path(entry.path(), &scope.base_dir));
      }
    }

    let files = dedup_preserving_order(files);
    debug!(
      "Found {} candidate files in {}ms",
      files.len(),
      start_time.elapsed().as_millis()
    );

    Ok(files)
  }
}

/// Delegates discovery to the `find` utility.
///
/// Runs `find <roots> -type f -regextype sed -regex '\(.*\.cpp\|.*\.h\)'
/// -print0` inside the base directory. A nonzero exit status fails the whole
/// discovery; no partial result is returned.
#[derive(Debug)]
pub struct FindLocator {
  program: String,
}

impl FindLocator {
  pub fn new(program: impl Into<String>) -> Self {
    Self { program: program.into() }
  }

  /// Builds the argument list for a scope with the given existing roots.
  pub fn build_args(roots: &[&str], extensions: &[String]) -> Vec<OsString> {
    let mut args: Vec<OsString> = roots.iter().map(OsString::from).collect();
    args.extend(
      ["-type", "f", "-regextype", "sed", "-regex"]
        .into_iter()
        .map(OsString::from),
    );
    args.push(OsString::from(sed_extension_regex(extensions)));
    args.push(OsString::from("-print0"));
    args
  }
}

impl Default for FindLocator {
  fn default() -> Self {
    Self::new("find")
  }
}

impl FileLocator for FindLocator {
  fn locate(&self, scope: &SearchScope) -> Result<Vec<PathBuf>, DiscoveryError> {
    let roots = scope.existing_roots();
    // find with no start points searches ".", which is outside the scope
    if roots.is_empty() {
      return Ok(Vec::new());
    }

    let args = Self::build_args(&roots, &scope.extensions);
    let output =
      run_tool(&self.program, &args, Some(&scope.base_dir)).map_err(|source| DiscoveryError::Spawn {
        program: self.program.clone(),
        source,
      })?;

    if !output.success() {
      return Err(DiscoveryError::ToolFailed {
        program: self.program.clone(),
        status: output.status_display(),
        stderr: output.stderr,
      });
    }

    let files = output
      .stdout
      .split(|b| *b == 0)
      .filter(|entry| !entry.is_empty())
      .map(|entry| normalize_relative_path(&path_from_bytes(entry), &scope.base_dir))
      .collect();

    Ok(dedup_preserving_order(files))
  }
}

/// Turns one raw `find` output entry into a path, keeping non-UTF-8 names
/// intact.
#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
  use std::os::unix::ffi::OsStrExt;

  PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
  PathBuf::from(&*String::from_utf8_lossy(bytes))
}

/// Builds a sed-flavoured regex matching whole paths that end in one of the
/// extensions, e.g. `\(.*\.cpp\|.*\.h\)`.
pub fn sed_extension_regex(extensions: &[String]) -> String {
  let alternatives: Vec<String> = extensions
    .iter()
    .map(|ext| format!(".*\\.{}", escape_sed_basic(ext)))
    .collect();
  format!("\\({}\\)", alternatives.join("\\|"))
}

fn escape_sed_basic(text: &str) -> String {
  let mut escaped = String::with_capacity(text.len());
  for c in text.chars() {
    if matches!(c, '.' | '*' | '[' | ']' | '^' | '$' | '\\') {
      escaped.push('\\');
    }
    escaped.push(c);
  }
  escaped
}

/// Normalizes a path to be relative to `base_dir`, dropping `.` components and
/// repeated separators.
pub fn normalize_relative_path(path: &Path, base_dir: &Path) -> PathBuf {
  let path = match path.strip_prefix(base_dir) {
    Ok(stripped) => stripped.to_path_buf(),
    Err(_) if path.is_absolute() => pathdiff::diff_paths(path, base_dir).unwrap_or_else(|| path.to_path_buf()),
    Err(_) => path.to_path_buf(),
  };

  let mut normalized = PathBuf::new();
  for component in path.components() {
    if matches!(component, Component::CurDir) {
      continue;
    }
    normalized.push(component.as_os_str());
  }

  if normalized.as_os_str().is_empty() {
    PathBuf::from(".")
  } else {
    normalized
  }
}

fn dedup_preserving_order(files: Vec<PathBuf>) -> Vec<PathBuf> {
  let mut seen = HashSet::with_capacity(files.len());
  files.into_iter().filter(|f| seen.insert(f.clone())).collect()
}
