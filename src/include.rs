//! Recursive sub-template inclusion.
//!
//! A template calls `{{ include("child.tpl") }}` or
//! `{{ include("child.tpl", dict("name", name)) }}`. The reference is resolved
//! against the directory of the template currently executing, checked against
//! the inclusion chain and the depth limit, loaded through the engine's
//! [`TemplateCache`] and rendered with the next level's [`InclusionContext`].
//!
//! The inclusion state is not captured in per-depth closures: it travels in the
//! render context under [`INCLUSION_KEY`] and is read back through minijinja's
//! [`State`] by the single registered `include` function.

use crate::constants::{CURRENT_TEMPLATE_KEY, INCLUSION_KEY, MAX_INCLUDE_DEPTH};
use crate::error::{Error, Result};
use crate::path::normalize_path;
use indexmap::IndexMap;
use log::{debug, warn};
use minijinja::value::{Object, ObjectRepr, Value, ValueKind};
use minijinja::State;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Immutable source of one template.
#[derive(Debug)]
pub struct TemplateDocument {
    source: String,
}

impl TemplateDocument {
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Path-keyed table of template documents shared by one engine.
///
/// Documents are read once and never evicted; the compiled form lives in the
/// engine's minijinja environments under the same name.
#[derive(Debug, Default)]
pub struct TemplateCache {
    documents: Mutex<IndexMap<PathBuf, Arc<TemplateDocument>>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached document for `path`, reading it on first use.
    ///
    /// # Errors
    /// * `Error::ReadError` if the file cannot be read
    pub fn load(&self, path: &Path) -> Result<Arc<TemplateDocument>> {
        let mut documents = self
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(document) = documents.get(path) {
            return Ok(Arc::clone(document));
        }

        debug!("Reading template {}", path.display());
        let source = fs::read_to_string(path).map_err(|e| Error::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let document = Arc::new(TemplateDocument { source });
        documents.insert(path.to_path_buf(), Arc::clone(&document));
        Ok(document)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Inclusion state of the template currently executing.
///
/// `chain` starts with the root template and never holds a path twice.
#[derive(Debug, Clone)]
pub struct InclusionContext {
    chain: Vec<PathBuf>,
    data: Value,
}

impl InclusionContext {
    /// State for a top-level render of `template` with `data`.
    pub fn root(template: PathBuf, data: Value) -> Self {
        Self {
            chain: vec![template],
            data,
        }
    }

    /// Number of `include` hops between the root template and the current one.
    pub fn depth(&self) -> usize {
        self.chain.len().saturating_sub(1)
    }

    pub fn chain(&self) -> &[PathBuf] {
        &self.chain
    }

    /// Data the current template was rendered with, without reserved keys.
    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.chain.iter().any(|p| p == path)
    }

    /// State for a template included from the current one.
    pub fn enter(&self, template: PathBuf, data: Value) -> Self {
        let mut chain = self.chain.clone();
        chain.push(template);
        Self { chain, data }
    }

    fn cycle_through(&self, path: &Path) -> Vec<String> {
        self.chain
            .iter()
            .map(|p| p.as_path())
            .chain(std::iter::once(path))
            .map(|p| p.display().to_string())
            .collect()
    }
}

impl Object for InclusionContext {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Plain
    }

    // internal bookkeeping, prints as nothing
    fn render(self: &Arc<Self>, _f: &mut fmt::Formatter<'_>) -> fmt::Result
    where
        Self: Sized + 'static,
    {
        Ok(())
    }
}

/// Resolves an include reference relative to the template that contains it.
///
/// Absolute references are used verbatim; both cases are normalized.
pub fn resolve_reference(current_template: &Path, reference: &str) -> PathBuf {
    let reference = Path::new(reference);
    if reference.is_absolute() {
        return normalize_path(reference);
    }
    let base = current_template.parent().unwrap_or_else(|| Path::new(""));
    normalize_path(&base.join(reference))
}

/// Builds the render context of a template: `data` plus the reserved keys.
///
/// User values under a reserved key are dropped with a warning.
///
/// # Errors
/// * `Error::ArgumentError` if `data` is neither a map nor none/undefined
pub fn layer_context(
    data: &Value,
    current_template: &Path,
    inclusion: InclusionContext,
) -> Result<Value> {
    let mut entries: Vec<(Value, Value)> = Vec::new();

    if !data.is_undefined() && !data.is_none() {
        if data.kind() != ValueKind::Map {
            return Err(Error::ArgumentError(format!(
                "include data must be a mapping, got {}",
                data.kind()
            )));
        }
        let keys = data
            .try_iter()
            .map_err(|e| Error::ArgumentError(e.to_string()))?;
        for key in keys {
            if matches!(key.as_str(), Some(CURRENT_TEMPLATE_KEY | INCLUSION_KEY)) {
                warn!(
                    "Variable '{key}' is reserved by the engine, ignoring the user-supplied value"
                );
                continue;
            }
            let value = data
                .get_item(&key)
                .map_err(|e| Error::ArgumentError(e.to_string()))?;
            entries.push((key, value));
        }
    }

    entries.push((
        Value::from(CURRENT_TEMPLATE_KEY),
        Value::from(current_template.display().to_string()),
    ));
    entries.push((Value::from(INCLUSION_KEY), Value::from_object(inclusion)));
    Ok(Value::from_iter(entries))
}

fn current_inclusion(state: &State) -> Result<Arc<InclusionContext>> {
    state
        .lookup(INCLUSION_KEY)
        .and_then(|value| value.downcast_object::<InclusionContext>())
        .ok_or_else(|| Error::RenderError {
            path: state.name().to_string(),
            message: "include called without an inclusion context".to_string(),
        })
}

fn current_template_path(state: &State) -> Result<PathBuf> {
    state
        .lookup(CURRENT_TEMPLATE_KEY)
        .and_then(|value| value.as_str().map(PathBuf::from))
        .ok_or_else(|| Error::RenderError {
            path: state.name().to_string(),
            message: format!("'{CURRENT_TEMPLATE_KEY}' is missing from the render context"),
        })
}

/// Resolves, checks, loads and renders one `include` call.
///
/// # Errors
/// * `Error::NestingLimitError` when called deeper than [`MAX_INCLUDE_DEPTH`]
/// * `Error::CyclicReferenceError` when the target is already being expanded
/// * `Error::ReadError` / `Error::ParseError` when the target cannot be loaded
/// * `Error::RenderError` for any other execution failure of the target
pub fn resolve_include(state: &State, reference: &str, data: Option<Value>) -> Result<String> {
    let inclusion = current_inclusion(state)?;
    let resolved = resolve_reference(&current_template_path(state)?, reference);

    if inclusion.depth() > MAX_INCLUDE_DEPTH {
        return Err(Error::NestingLimitError {
            limit: MAX_INCLUDE_DEPTH,
            path: resolved.display().to_string(),
        });
    }
    if inclusion.contains(&resolved) {
        return Err(Error::CyclicReferenceError {
            chain: inclusion.cycle_through(&resolved),
        });
    }

    let name = resolved.display().to_string();
    let template = state
        .env()
        .get_template(&name)
        .map_err(|e| Error::from_template_error(e, &name))?;

    let data = data.unwrap_or_else(|| inclusion.data().clone());
    let next = inclusion.enter(resolved.clone(), data.clone());
    debug!("Including {} at depth {}", name, next.depth());
    let context = layer_context(&data, &resolved, next)?;

    template
        .render(context)
        .map_err(|e| Error::from_template_error(e, &name))
}

/// The `include(reference, data?)` template function.
pub fn include(
    state: &State,
    reference: String,
    data: Option<Value>,
) -> std::result::Result<String, minijinja::Error> {
    resolve_include(state, &reference, data).map_err(Error::into_template_error)
}
