//! # Rule Script Module
//!
//! Substitution rules for the native backend. A rule script is a TOML file
//! with an array of `[[rules]]` tables, each holding a `pattern` (a `regex`
//! crate pattern) and a `replacement` (using `$name` / `${1}` group syntax):
//!
//! ```toml
//! [[rules]]
//! pattern = '''(?s)/\* Old banner .*? \*/'''
//! replacement = '''/* REPLACE_MADP_HEADER */'''
//! ```
//!
//! Rules run in file order, each replacing every match in the output of the
//! previous one.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

/// Legacy MADP banner: the toolbox blurb, the author list and the pointer to
/// the AUTHORS file.
const LEGACY_HEADER_PATTERN: &str = concat!(
  r"(?s)/\* This file is part of the Multiagent Decision Process \(MADP\) Toolbox[^\n]*\n",
  r".*?following people:[ \t]*\n",
  r" \*[ \t]*\n",
  r"(?P<authors>.*?)",
  r" \*[ \t]*\n",
  r" \* For contact information please see the included AUTHORS file\.[ \t]*\n",
  r" \*/",
);

const NEW_HEADER_REPLACEMENT: &str = concat!(
  "/* REPLACE_MADP_HEADER */\n",
  "/* REPLACE_CONTRIBUTING_AUTHORS_START\n",
  "${authors}",
  " * REPLACE_CONTRIBUTING_AUTHORS_END\n",
  " */",
);

static LEGACY_HEADER_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(LEGACY_HEADER_PATTERN).expect("legacy header regex must compile"));

/// Error raised while loading a rule script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
  #[error("Failed to read rule script '{path}': {source}")]
  Read { path: PathBuf, source: std::io::Error },

  #[error("Failed to parse rule script '{path}': {source}")]
  Parse { path: PathBuf, source: toml::de::Error },

  #[error("Rule script '{path}' contains no rules")]
  Empty { path: PathBuf },

  #[error("Invalid pattern in rule {index} of '{path}': {source}")]
  InvalidPattern {
    path: PathBuf,
    index: usize,
    source: regex::Error,
  },
}

#[derive(Debug, Deserialize)]
struct RawScript {
  #[serde(default)]
  rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
  pattern: String,
  replacement: String,
}

/// A single compiled substitution.
#[derive(Debug, Clone)]
pub struct Rule {
  pattern: Regex,
  replacement: String,
}

impl Rule {
  pub const fn new(pattern: Regex, replacement: String) -> Self {
    Self { pattern, replacement }
  }
}

/// An ordered list of substitution rules.
#[derive(Debug, Clone)]
pub struct RuleScript {
  rules: Vec<Rule>,
}

impl RuleScript {
  /// The built-in script: converts the legacy MADP banner into the
  /// `REPLACE_MADP_HEADER` marker plus a contributing-authors block, keeping
  /// the author lines.
  pub fn builtin() -> Self {
    Self {
      rules: vec![Rule::new(
        LEGACY_HEADER_REGEX.clone(),
        NEW_HEADER_REPLACEMENT.to_string(),
      )],
    }
  }

  /// Loads and compiles a TOML rule script.
  pub fn load(path: &Path) -> Result<Self, ScriptError> {
    let content = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::parse(&content, path)
  }

  /// Compiles a rule script from its TOML source. `origin` is only used in
  /// error messages.
  pub fn parse(content: &str, origin: &Path) -> Result<Self, ScriptError> {
    let raw: RawScript = toml::from_str(content).map_err(|source| ScriptError::Parse {
      path: origin.to_path_buf(),
      source,
    })?;

    if raw.rules.is_empty() {
      return Err(ScriptError::Empty {
        path: origin.to_path_buf(),
      });
    }

    let rules = raw
      .rules
      .into_iter()
      .enumerate()
      .map(|(i, rule)| {
        Regex::new(&rule.pattern)
          .map(|pattern| Rule::new(pattern, rule.replacement))
          .map_err(|source| ScriptError::InvalidPattern {
            path: origin.to_path_buf(),
            index: i + 1,
            source,
          })
      })
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Self { rules })
  }

  /// Applies every rule in order. Returns borrowed content when nothing
  /// matched.
  pub fn apply<'a>(&self, content: &'a str) -> Cow<'a, str> {
    let mut current = Cow::Borrowed(content);
    for rule in &self.rules {
      let replaced = match rule.pattern.replace_all(&current, rule.replacement.as_str()) {
        Cow::Owned(replaced) => Some(replaced),
        Cow::Borrowed(_) => None,
      };
      if let Some(replaced) = replaced {
        current = Cow::Owned(replaced);
      }
    }
    current
  }
}
