//! Helper functions available inside template bodies.
//!
//! | Function                    | Result                                               |
//! |-----------------------------|------------------------------------------------------|
//! | `default(value, fallback)`  | `fallback` if `value` is undefined, none or `""`     |
//! | `lcfirst(s)` / `ucfirst(s)` | first code point lower/upper-cased                   |
//! | `dict(k1, v1, ...)`         | ordered map built from key/value pairs               |
//! | `currentYear()`             | current calendar year                                |
//! | `file(path)`                | raw contents of a file relative to the template root |
//! | `include(path, data?)`      | rendered sub-template, see [`crate::include`]        |
//!
//! Everything except `include` is a pure free function.

use crate::error::{Error, Result};
use crate::include;
use chrono::Datelike;
use minijinja::value::{Rest, Value};
use minijinja::Environment;
use std::fs;
use std::path::{Path, PathBuf};

/// Lower-cases the first character of `s`, leaving the rest untouched.
///
/// ```
/// assert_eq!(tplgen::functions::lcfirst("UserName"), "userName");
/// ```
pub fn lcfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Upper-cases the first character of `s`, leaving the rest untouched.
///
/// ```
/// assert_eq!(tplgen::functions::ucfirst("userName"), "UserName");
/// ```
pub fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Returns `fallback` when `value` is undefined, none or an empty string.
pub fn default_value(value: Value, fallback: Value) -> Value {
    if value.is_undefined() || value.is_none() || value.as_str() == Some("") {
        fallback
    } else {
        value
    }
}

/// Builds an ordered map from alternating keys and values.
///
/// # Errors
/// * `Error::ArgumentError` on an odd number of arguments or a non-string key
pub fn build_dict(args: &[Value]) -> Result<Value> {
    if args.len() % 2 != 0 {
        return Err(Error::ArgumentError(format!(
            "dict expects key/value pairs, got {} arguments",
            args.len()
        )));
    }

    let mut entries = Vec::with_capacity(args.len() / 2);
    for pair in args.chunks(2) {
        let Some(key) = pair[0].as_str() else {
            let message = format!("dict keys must be strings, got {}", pair[0].kind());
            return Err(Error::ArgumentError(message));
        };
        entries.push((Value::from(key), pair[1].clone()));
    }
    Ok(Value::from_iter(entries))
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Reads a file located relative to the template root.
pub fn read_template_file<P: AsRef<Path>>(
    template_root: P,
    relative_path: &str,
) -> Result<String> {
    let path = template_root.as_ref().join(relative_path);
    fs::read_to_string(&path).map_err(|e| Error::ReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

// Non-string input is treated as unset.
fn fold_first(value: &Value, fold: fn(&str) -> String) -> String {
    value.as_str().map(fold).unwrap_or_default()
}

/// The function table bound into every render environment.
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    template_root: PathBuf,
}

impl FunctionRegistry {
    pub fn new<P: Into<PathBuf>>(template_root: P) -> Self {
        Self {
            template_root: template_root.into(),
        }
    }

    /// Registers all helpers, replacing minijinja's builtin `dict`.
    pub fn register(&self, env: &mut Environment<'static>) {
        env.add_function("default", default_value);
        env.add_function("lcfirst", |value: Value| fold_first(&value, lcfirst));
        env.add_function("ucfirst", |value: Value| fold_first(&value, ucfirst));
        env.add_function("dict", |args: Rest<Value>| {
            build_dict(&args).map_err(Error::into_template_error)
        });
        env.add_function("currentYear", current_year);

        let root = self.template_root.clone();
        env.add_function("file", move |relative_path: String| {
            read_template_file(&root, &relative_path)
                .map_err(Error::into_template_error)
        });

        env.add_function("include", include::include);
    }
}
