//! Tests for the `find` / `grep` / `sed` backend. Each test returns early when
//! the GNU tools it needs are not installed.

mod common;

use std::path::PathBuf;

use anyhow::Result;
use common::{LEGACY_SOURCE, REPLACED_SOURCE, create_madp_tree, is_tool_available, read_file, write_file};
use header_cleaner::config::{Backend, Config, ToolsConfig};
use header_cleaner::inspector::{GrepInspector, HeaderInspector};
use header_cleaner::invocation::Invocation;
use header_cleaner::locator::{FileLocator, FindLocator, SearchScope};
use header_cleaner::processor::{Processor, ProcessorConfig};
use header_cleaner::replacer::{HeaderReplacer, ReplaceError, ReplaceOutcome, SedReplacer};
use header_cleaner::report::{FileAction, FileReport};
use tempfile::tempdir;

const SED_SCRIPT: &str = "s|^// Old banner$|/* REPLACE_MADP_HEADER */|\n";

fn madp_scope(base: &std::path::Path) -> SearchScope {
  SearchScope::new(
    base,
    ["base", "planning", "support", "solvers", "parser", "include", "examples", "utils"]
      .iter()
      .map(|s| s.to_string())
      .collect(),
    vec!["cpp".to_string(), "h".to_string()],
  )
}

#[test]
fn test_find_locator_matches_walk_results() -> Result<()> {
  if !is_tool_available("find") {
    return Ok(());
  }

  let temp_dir = tempdir()?;
  create_madp_tree(temp_dir.path())?;
  write_file(temp_dir.path(), "base/notes.hpp", "")?;

  let mut files = FindLocator::default().locate(&madp_scope(temp_dir.path()))?;
  files.sort();

  assert_eq!(
    files,
    vec![
      PathBuf::from("base/a.h"),
      PathBuf::from("base/b.h"),
      PathBuf::from("solvers/c.cpp"),
    ]
  );
  Ok(())
}

#[test]
fn test_find_locator_handles_spaces_in_names() -> Result<()> {
  if !is_tool_available("find") {
    return Ok(());
  }

  let temp_dir = tempdir()?;
  write_file(temp_dir.path(), "utils/my file.cpp", "")?;

  let files = FindLocator::default().locate(&madp_scope(temp_dir.path()))?;
  assert_eq!(files, vec![PathBuf::from("utils/my file.cpp")]);
  Ok(())
}

#[test]
fn test_find_locator_without_roots_finds_nothing() -> Result<()> {
  let temp_dir = tempdir()?;
  write_file(temp_dir.path(), "other/a.h", "")?;

  let files = FindLocator::new("header-cleaner-no-such-find").locate(&madp_scope(temp_dir.path()))?;
  assert!(files.is_empty());
  Ok(())
}

#[test]
fn test_grep_inspector_detects_marker() -> Result<()> {
  if !is_tool_available("grep") {
    return Ok(());
  }

  let temp_dir = tempdir()?;
  create_madp_tree(temp_dir.path())?;

  let inspector = GrepInspector::new("grep", "REPLACE_MADP_HEADER");
  assert!(inspector.has_marker(&temp_dir.path().join("base/b.h")));
  assert!(!inspector.has_marker(&temp_dir.path().join("base/a.h")));
  assert!(!inspector.has_marker(&temp_dir.path().join("base/missing.h")));
  Ok(())
}

#[test]
fn test_sed_replacer_edits_in_place() -> Result<()> {
  if !is_tool_available("sed") {
    return Ok(());
  }

  let temp_dir = tempdir()?;
  write_file(temp_dir.path(), "script.sed", SED_SCRIPT)?;
  write_file(temp_dir.path(), "base/a.h", "// Old banner\nint x;\n")?;
  write_file(temp_dir.path(), "base/b.h", "int y;\n")?;

  let replacer = SedReplacer::new("sed", temp_dir.path().join("script.sed"));

  assert_eq!(replacer.replace(&temp_dir.path().join("base/a.h"))?, ReplaceOutcome::Replaced);
  assert_eq!(read_file(temp_dir.path(), "base/a.h")?, "/* REPLACE_MADP_HEADER */\nint x;\n");

  assert_eq!(replacer.replace(&temp_dir.path().join("base/b.h"))?, ReplaceOutcome::Unchanged);
  Ok(())
}

#[test]
fn test_sed_replacer_reports_missing_script() -> Result<()> {
  if !is_tool_available("sed") {
    return Ok(());
  }

  let temp_dir = tempdir()?;
  write_file(temp_dir.path(), "base/a.h", LEGACY_SOURCE)?;

  let replacer = SedReplacer::new("sed", temp_dir.path().join("missing.sed"));
  let err = replacer.replace(&temp_dir.path().join("base/a.h")).unwrap_err();

  assert!(matches!(err, ReplaceError::ToolFailed { .. }));
  assert_eq!(read_file(temp_dir.path(), "base/a.h")?, LEGACY_SOURCE);
  Ok(())
}

#[test]
fn test_external_batch_run() -> Result<()> {
  if !["find", "grep", "sed"].iter().all(|tool| is_tool_available(tool)) {
    return Ok(());
  }

  let temp_dir = tempdir()?;
  write_file(temp_dir.path(), "script.sed", SED_SCRIPT)?;
  write_file(temp_dir.path(), "base/a.h", "// Old banner\nint x;\n")?;
  write_file(temp_dir.path(), "base/b.h", REPLACED_SOURCE)?;
  write_file(temp_dir.path(), "docs/readme.txt", "// Old banner\n")?;

  let config = Config {
    backend: Backend::External,
    script: Some(PathBuf::from("script.sed")),
    ..Config::default()
  };
  let processor = Processor::new(ProcessorConfig::from_config(&config, temp_dir.path())?)?;

  let mut reports = processor.dispatch(&Invocation::ScanAll)?;
  reports.sort_by(|a, b| a.path.cmp(&b.path));

  assert_eq!(
    reports,
    vec![
      FileReport::new("base/a.h", FileAction::Replaced),
      FileReport::new("base/b.h", FileAction::AlreadyReplaced),
    ]
  );
  assert_eq!(read_file(temp_dir.path(), "docs/readme.txt")?, "// Old banner\n");
  Ok(())
}

#[test]
fn test_failing_sed_is_reported_per_file() -> Result<()> {
  // `false --version` exits nonzero, so probe it by running it
  let has_false = std::process::Command::new("false").status().is_ok();
  if !has_false || !is_tool_available("find") || !is_tool_available("grep") {
    return Ok(());
  }

  let temp_dir = tempdir()?;
  create_madp_tree(temp_dir.path())?;

  let config = Config {
    backend: Backend::External,
    tools: ToolsConfig {
      sed: "false".to_string(),
      ..ToolsConfig::default()
    },
    ..Config::default()
  };
  let processor = Processor::new(ProcessorConfig::from_config(&config, temp_dir.path())?)?;
  let reports = processor.dispatch(&Invocation::ScanAll)?;

  let failed = reports.iter().filter(|r| r.action == FileAction::Failed).count();
  assert_eq!(failed, 2);
  assert_eq!(read_file(temp_dir.path(), "base/a.h")?, LEGACY_SOURCE);
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_find_locator_keeps_non_utf8_names() -> Result<()> {
  use std::ffi::OsStr;
  use std::os::unix::ffi::OsStrExt;

  if !is_tool_available("find") {
    return Ok(());
  }

  let temp_dir = tempdir()?;
  std::fs::create_dir_all(temp_dir.path().join("utils"))?;
  let name = OsStr::from_bytes(b"utils/caf\xe9.cpp");
  // Some filesystems only accept UTF-8 names
  if std::fs::write(temp_dir.path().join(name), LEGACY_SOURCE).is_err() {
    return Ok(());
  }

  let files = FindLocator::default().locate(&madp_scope(temp_dir.path()))?;
  assert_eq!(files, vec![PathBuf::from(name)]);
  assert_eq!(files[0].as_os_str().as_bytes(), b"utils/caf\xe9.cpp");

  if is_tool_available("grep") && is_tool_available("sed") {
    write_file(temp_dir.path(), "script.sed", "1s|^/\\* This file is part of.*$|/* REPLACE_MADP_HEADER */|\n")?;
    let config = Config {
      backend: Backend::External,
      script: Some(PathBuf::from("script.sed")),
      ..Config::default()
    };
    let processor = Processor::new(ProcessorConfig::from_config(&config, temp_dir.path())?)?;
    let reports = processor.dispatch(&Invocation::ScanAll)?;

    assert_eq!(reports, vec![FileReport::new(name, FileAction::Replaced)]);
  }

  Ok(())
}
