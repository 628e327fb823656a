//! Variable loading for tplgen.
//! Reads YAML (or JSON) documents in order and deep-merges them into the
//! [`VariableSet`] every template is rendered against.

use crate::constants::ALLOW_UNDEFINED_KEY;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::{debug, warn};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Merged variables available to templates at render time.
///
/// Top-level keys keep the order in which they were first loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableSet {
    values: IndexMap<String, Value>,
}

impl VariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns the value for `key` only if it is a plain string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn insert<K: Into<String>>(&mut self, key: K, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether undefined template variables render as empty values instead of failing.
    ///
    /// Only a literal `true` under `$config.allowUndefinedVariables` enables it.
    pub fn allows_undefined(&self) -> bool {
        let flag = self.values.get(ALLOW_UNDEFINED_KEY);
        matches!(flag, Some(Value::Bool(true)))
    }

    /// Deep-merges `incoming` into this set.
    ///
    /// Scalars and lists from `incoming` replace existing values; when both
    /// sides hold a map, the maps are merged key by key.
    pub fn merge(&mut self, incoming: IndexMap<String, Value>) {
        for (key, value) in incoming {
            match self.values.get_mut(&key) {
                Some(existing) => merge_value(existing, value),
                None => {
                    self.values.insert(key, value);
                }
            }
        }
    }
}

impl FromIterator<(String, Value)> for VariableSet {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl serde::Serialize for VariableSet {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.values.serialize(serializer)
    }
}

fn merge_value(existing: &mut Value, incoming: Value) {
    match (existing, incoming) {
        (Value::Object(existing_map), Value::Object(incoming_map)) => {
            for (key, value) in incoming_map {
                match existing_map.get_mut(&key) {
                    Some(slot) => merge_value(slot, value),
                    None => {
                        existing_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Parses one variables document.
///
/// `.json` files go through serde_json, everything else through serde_yaml.
/// An empty document yields an empty map.
pub fn parse_variables<P: AsRef<Path>>(
    content: &str,
    source: P,
) -> Result<IndexMap<String, Value>> {
    let source = source.as_ref();
    let parse_error = |message: String| Error::VariablesParseError {
        path: source.display().to_string(),
        message,
    };

    if content.trim().is_empty() {
        return Ok(IndexMap::new());
    }

    let is_json = source.extension().is_some_and(|ext| ext == "json");
    let document: Value = if is_json {
        serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?
    } else {
        serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?
    };

    match document {
        Value::Null => Ok(IndexMap::new()),
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(parse_error(format!(
            "expected a mapping at the top level, found {}",
            value_kind(&other)
        ))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

/// Loads and deep-merges variable files in the given order.
///
/// # Arguments
/// * `sources` - Variable files, earlier entries are overridden by later ones
///
/// # Errors
/// * `Error::ReadError` if a file cannot be read
/// * `Error::VariablesParseError` if a file is not a YAML/JSON mapping
pub fn load_variables<P: AsRef<Path>>(sources: &[P]) -> Result<VariableSet> {
    let mut variables = VariableSet::new();
    for source in sources {
        let source = source.as_ref();
        debug!("Loading variables from {}", source.display());
        let content = fs::read_to_string(source).map_err(|e| Error::ReadError {
            path: source.display().to_string(),
            message: e.to_string(),
        })?;
        variables.merge(parse_variables(&content, source)?);
    }
    Ok(variables)
}

/// Collects the variable files of a run.
///
/// `*.yaml` files of `variables_dir` come first, then its `*.yml` files, each
/// group sorted by name, followed by every extra file that exists. Missing
/// extra files are skipped with a warning.
pub fn find_variable_files<P: AsRef<Path>>(
    variables_dir: P,
    extra_files: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    let variables_dir = variables_dir.as_ref();
    let mut files = Vec::new();

    if variables_dir.is_dir() {
        let mut yaml = Vec::new();
        let mut yml = Vec::new();
        for entry in fs::read_dir(variables_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            match path.extension().and_then(|ext| ext.to_str()) {
                Some("yaml") => yaml.push(path),
                Some("yml") => yml.push(path),
                _ => {}
            }
        }
        yaml.sort();
        yml.sort();
        files.extend(yaml);
        files.extend(yml);
    }

    for file in extra_files {
        if file.is_file() {
            files.push(file.clone());
        } else {
            warn!(
                "Variables file '{}' is not accessible, skipping it",
                file.display()
            );
        }
    }

    Ok(files)
}
