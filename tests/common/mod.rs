#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};

/// A legacy MADP banner followed by some code.
pub const LEGACY_SOURCE: &str = concat!(
  "/* This file is part of the Multiagent Decision Process (MADP) Toolbox. \n",
  " *\n",
  " * The majority of MADP is free software released under GNUP GPL v.3. However,\n",
  " * some of the included libraries are released under a different license. For \n",
  " * more information, see the included COPYING file. For other information, \n",
  " * please refer to the included README file.\n",
  " *\n",
  " * This file has been written and/or modified by the following people:\n",
  " *\n",
  " * Frans Oliehoek \n",
  " * Matthijs Spaan \n",
  " *\n",
  " * For contact information please see the included AUTHORS file.\n",
  " */\n",
  "\n",
  "#include \"Globals.h\"\n",
);

/// The same file after its header has been replaced.
pub const REPLACED_SOURCE: &str = concat!(
  "/* REPLACE_MADP_HEADER */\n",
  "/* REPLACE_CONTRIBUTING_AUTHORS_START\n",
  " * Frans Oliehoek \n",
  " * Matthijs Spaan \n",
  " * REPLACE_CONTRIBUTING_AUTHORS_END\n",
  " */\n",
  "\n",
  "#include \"Globals.h\"\n",
);

/// Checks if a program can be started on this system.
pub fn is_tool_available(program: &str) -> bool {
  Command::new(program)
    .arg("--version")
    .output()
    .is_ok_and(|output| output.status.success())
}

/// Writes `content` to `base/rel`, creating parent directories.
pub fn write_file(base: &Path, rel: &str, content: &str) -> Result<()> {
  let path = base.join(rel);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn read_file(base: &Path, rel: &str) -> Result<String> {
  let path = base.join(rel);
  fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Creates the tree used by most tests:
///
/// - `base/a.h` (legacy header)
/// - `base/b.h` (already replaced)
/// - `solvers/c.cpp` (legacy header)
/// - `docs/readme.txt` (outside every root)
pub fn create_madp_tree(base: &Path) -> Result<()> {
  write_file(base, "base/a.h", LEGACY_SOURCE)?;
  write_file(base, "base/b.h", REPLACED_SOURCE)?;
  write_file(base, "solvers/c.cpp", LEGACY_SOURCE)?;
  write_file(base, "docs/readme.txt", "MADP documentation\n")?;
  Ok(())
}
