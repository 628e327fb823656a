//! Output path computation.
//! Maps a template's relative path onto the output tree, substituting
//! `__name__` placeholders with string variables.

use crate::constants::TEMPLATE_SUFFIX;
use crate::variables::VariableSet;
use log::warn;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__([^_]+)__").expect("placeholder pattern is valid"));

/// Non-fatal problem found while resolving an output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathWarning {
    /// No variable with the placeholder's name exists
    Missing { name: String, path: String },
    /// The variable exists but is not a plain string
    NotAString { name: String, path: String },
}

impl fmt::Display for PathWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathWarning::Missing { name, path } => write!(
                f,
                "variable '{name}' used in path '{path}' is not defined, keeping the placeholder"
            ),
            PathWarning::NotAString { name, path } => write!(
                f,
                "variable '{name}' used in path '{path}' is not a string, keeping the placeholder"
            ),
        }
    }
}

/// A resolved output path and the warnings produced on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPath {
    pub path: PathBuf,
    pub warnings: Vec<PathWarning>,
}

/// Lexically normalizes a path: drops `.`, folds `..` into its parent and
/// collapses repeated separators. The filesystem is never consulted.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            c => components.push(c),
        }
    }

    if components.is_empty() {
        return PathBuf::from(".");
    }
    components.iter().collect()
}

/// Makes `path` absolute against the current directory and normalizes it.
pub fn absolute_path<P: AsRef<Path>>(path: P) -> std::io::Result<PathBuf> {
    let path = path.as_ref();
    if path.is_absolute() {
        Ok(normalize_path(path))
    } else {
        Ok(normalize_path(&std::env::current_dir()?.join(path)))
    }
}

/// Removes the template suffix from a path, if present.
pub fn strip_template_suffix(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match raw.strip_suffix(TEMPLATE_SUFFIX) {
        Some(stripped) => PathBuf::from(stripped),
        None => path.to_path_buf(),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct OutputPathResolver;

impl OutputPathResolver {
    pub fn new() -> Self {
        Self
    }

    /// Computes the output path of a template.
    ///
    /// # Arguments
    /// * `template_relative_path` - Template path relative to the template root
    /// * `output_root` - Root of the output tree
    /// * `variables` - Variables used for `__name__` placeholders
    ///
    /// # Notes
    /// Never fails: a placeholder whose variable is missing or not a string is
    /// left in place and reported as a [`PathWarning`].
    pub fn resolve<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        template_relative_path: P,
        output_root: Q,
        variables: &VariableSet,
    ) -> OutputPath {
        let relative = strip_template_suffix(template_relative_path.as_ref());
        let joined = output_root.as_ref().join(relative);
        let raw = joined.to_string_lossy().into_owned();

        let mut resolved = raw.clone();
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for captures in PLACEHOLDER.captures_iter(&raw) {
            let token = &captures[0];
            let name = &captures[1];
            if !seen.insert(token.to_string()) {
                continue;
            }

            match variables.get(name) {
                Some(Value::String(value)) => resolved = resolved.replace(token, value),
                Some(_) => warnings.push(PathWarning::NotAString {
                    name: name.to_string(),
                    path: raw.clone(),
                }),
                None => warnings.push(PathWarning::Missing {
                    name: name.to_string(),
                    path: raw.clone(),
                }),
            }
        }

        for warning in &warnings {
            warn!("{warning}");
        }

        OutputPath {
            path: normalize_path(Path::new(&resolved)),
            warnings,
        }
    }
}
