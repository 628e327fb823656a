//! File ignore pattern handling for tplgen templates.
//! This module processes the .genignore file of a template directory to keep
//! matching files out of generation, similar to .gitignore functionality.

use crate::constants::IGNORE_FILE;
use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use std::{fs::read_to_string, path::Path};

/// Patterns that are always ignored
pub const DEFAULT_IGNORE_PATTERNS: [&str; 3] = ["**/.DS_Store", ".git/**", IGNORE_FILE];

/// Reads the .genignore file of `template_root` into a set of glob patterns.
///
/// # Arguments
/// * `template_root` - Template directory that may contain a .genignore file
///
/// # Returns
/// * `Result<GlobSet>` - Compiled patterns, matched against paths relative to
///   the template root
///
/// # Notes
/// - A missing .genignore yields the default patterns only
/// - Blank lines and lines starting with `#` are skipped
/// - Invalid patterns result in an `IgnoreFileError`
///
/// # Example
/// ```ignore
/// # Contents of .genignore:
/// *.bak
/// drafts/**
/// ```
pub fn parse_ignore_file<P: AsRef<Path>>(template_root: P) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    let ignore_path = template_root.as_ref().join(IGNORE_FILE);

    for pattern in DEFAULT_IGNORE_PATTERNS {
        builder.add(Glob::new(pattern).map_err(loading_failed)?);
    }

    if let Ok(contents) = read_to_string(&ignore_path) {
        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            builder.add(Glob::new(line).map_err(loading_failed)?);
        }
    } else {
        debug!("{} does not exist", ignore_path.display());
    }

    builder.build().map_err(loading_failed)
}

fn loading_failed(e: globset::Error) -> Error {
    Error::IgnoreFileError(format!("{IGNORE_FILE} loading failed: {e}"))
}
