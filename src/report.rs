//! # Report Module
//!
//! This module records what happened to each file during a run and can write
//! that record as JSON or CSV.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Information about a processed file for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
  /// Path to the file, relative to the base directory
  #[serde(with = "path_serialization")]
  pub path: PathBuf,
  /// Action taken on the file
  pub action: FileAction,
  /// Error message for failed files
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub detail: Option<String>,
}

impl FileReport {
  pub fn new(path: impl Into<PathBuf>, action: FileAction) -> Self {
    Self {
      path: path.into(),
      action,
      detail: None,
    }
  }

  pub fn failed(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      action: FileAction::Failed,
      detail: Some(detail.into()),
    }
  }
}

/// Possible outcomes for a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileAction {
  /// The header was rewritten
  Replaced,
  /// The substitution ran but did not change the file
  Unchanged,
  /// The file already had the new-style marker, so it was skipped
  AlreadyReplaced,
  /// The substitution failed
  Failed,
}

impl fmt::Display for FileAction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let text = match self {
      FileAction::Replaced => "replaced",
      FileAction::Unchanged => "unchanged",
      FileAction::AlreadyReplaced => "already-replaced",
      FileAction::Failed => "failed",
    };
    f.write_str(text)
  }
}

/// Helper module for serializing/deserializing PathBuf
mod path_serialization {
  use std::path::PathBuf;

  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S>(path: &std::path::Path, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(&path.to_string_lossy())
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Ok(PathBuf::from(s))
  }
}

/// Summary of a run
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingSummary {
  /// Number of files handled (inspected)
  pub total_files: usize,
  /// Number of files whose header was rewritten
  pub replaced: usize,
  /// Number of files the substitution left untouched
  pub unchanged: usize,
  /// Number of files skipped because they already had the marker
  pub already_replaced: usize,
  /// Number of files where the substitution failed
  pub failed: usize,
  /// Total processing time
  #[serde(skip_serializing)]
  pub processing_time: Duration,
  /// Processing time in seconds for serialization
  #[serde(rename = "processing_time_seconds")]
  pub processing_time_secs: f64,
}

impl ProcessingSummary {
  /// Create a ProcessingSummary from a collection of FileReports
  pub fn from_reports(files: &[FileReport], processing_time: Duration) -> Self {
    let count = |action: FileAction| files.iter().filter(|f| f.action == action).count();

    Self {
      total_files: files.len(),
      replaced: count(FileAction::Replaced),
      unchanged: count(FileAction::Unchanged),
      already_replaced: count(FileAction::AlreadyReplaced),
      failed: count(FileAction::Failed),
      processing_time,
      processing_time_secs: processing_time.as_secs_f64(),
    }
  }

  /// Number of substitution attempts (everything not skipped).
  pub const fn substitutions(&self) -> usize {
    self.replaced + self.unchanged + self.failed
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
  Json,
  Csv,
}

impl fmt::Display for ReportFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReportFormat::Json => write!(f, "JSON"),
      ReportFormat::Csv => write!(f, "CSV"),
    }
  }
}

#[derive(Serialize)]
struct JsonReport<'a> {
  generated_at: String,
  summary: &'a ProcessingSummary,
  files: &'a [FileReport],
}

/// Writes a report file in the requested format.
pub struct ReportGenerator<'a> {
  format: ReportFormat,
  output_path: &'a Path,
}

impl<'a> ReportGenerator<'a> {
  pub const fn new(format: ReportFormat, output_path: &'a Path) -> Self {
    Self { format, output_path }
  }

  pub fn generate(&self, files: &[FileReport], summary: &ProcessingSummary) -> Result<()> {
    let content = match self.format {
      ReportFormat::Json => self.generate_json(files, summary)?,
      ReportFormat::Csv => self.generate_csv(files, summary),
    };

    fs::write(self.output_path, content)
      .with_context(|| format!("Failed to write report to {}", self.output_path.display()))
  }

  fn generate_json(&self, files: &[FileReport], summary: &ProcessingSummary) -> Result<String> {
    let report = JsonReport {
      generated_at: Local::now().to_rfc3339(),
      summary,
      files,
    };

    serde_json::to_string_pretty(&report).with_context(|| "Failed to serialize JSON report")
  }

  fn generate_csv(&self, files: &[FileReport], summary: &ProcessingSummary) -> String {
    let mut csv = String::new();

    csv.push_str("file_path,action,detail\n");
    for file in files {
      csv.push_str(&format!(
        "{},{},{}\n",
        csv_field(&file.path.to_string_lossy()),
        file.action,
        csv_field(file.detail.as_deref().unwrap_or(""))
      ));
    }

    csv.push_str("\n# Summary\n");
    csv.push_str(&format!("Total files,{}\n", summary.total_files));
    csv.push_str(&format!("Replaced,{}\n", summary.replaced));
    csv.push_str(&format!("Unchanged,{}\n", summary.unchanged));
    csv.push_str(&format!("Already replaced,{}\n", summary.already_replaced));
    csv.push_str(&format!("Failed,{}\n", summary.failed));
    csv.push_str(&format!(
      "Processing time (seconds),{:.2}\n",
      summary.processing_time.as_secs_f64()
    ));
    csv.push_str(&format!("Generated on,{}\n", Local::now().format("%Y-%m-%d %H:%M:%S")));

    csv
  }
}

/// Quotes a CSV field when it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
  if value.contains([',', '"', '\n', '\r']) {
    format!("\"{}\"", value.replace('"', "\"\""))
  } else {
    value.to_string()
  }
}
