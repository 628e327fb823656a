//! Template rendering for tplgen.
//! Parses top-level templates with MiniJinja and executes them against the
//! run's variables, with the custom functions and `include` support bound in.
use crate::error::{Error, Result};
use crate::functions::FunctionRegistry;
use crate::include::{layer_context, InclusionContext, TemplateCache};
use crate::path::absolute_path;
use crate::variables::VariableSet;
use log::debug;
use minijinja::{AutoEscape, Environment, UndefinedBehavior, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders the template file at `template_path` against `variables`.
    ///
    /// # Arguments
    /// * `template_path` - Path of the template file
    /// * `variables` - Merged run variables
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template content
    fn render(&self, template_path: &Path, variables: &VariableSet) -> Result<String>;
}

/// MiniJinja-based rendering engine.
///
/// Holds one environment per missing-variable policy. Both load sources through
/// the same [`TemplateCache`], and each compiles a template at most once.
pub struct RenderEngine {
    strict: Environment<'static>,
    lenient: Environment<'static>,
    cache: Arc<TemplateCache>,
}

impl RenderEngine {
    /// Creates an engine whose `file()` function reads relative to `template_root`.
    pub fn new<P: Into<PathBuf>>(template_root: P) -> Self {
        let registry = FunctionRegistry::new(template_root);
        let cache = Arc::new(TemplateCache::new());
        Self {
            strict: build_environment(&registry, &cache, UndefinedBehavior::Strict),
            lenient: build_environment(&registry, &cache, UndefinedBehavior::Chainable),
            cache,
        }
    }

    pub fn cache(&self) -> &TemplateCache {
        &self.cache
    }

    fn environment(&self, allow_undefined: bool) -> &Environment<'static> {
        if allow_undefined {
            &self.lenient
        } else {
            &self.strict
        }
    }
}

fn build_environment(
    registry: &FunctionRegistry,
    cache: &Arc<TemplateCache>,
    undefined: UndefinedBehavior,
) -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(undefined);
    env.set_keep_trailing_newline(true);
    // generated files are code, never HTML
    env.set_auto_escape_callback(|_| AutoEscape::None);

    let cache = Arc::clone(cache);
    env.set_loader(move |name| {
        cache
            .load(Path::new(name))
            .map(|document| Some(document.source().to_string()))
            .map_err(Error::into_template_error)
    });

    registry.register(&mut env);
    env
}

impl TemplateRenderer for RenderEngine {
    /// Renders a template file using MiniJinja.
    ///
    /// The missing-variable policy is read from `variables` on every call.
    /// The caller's variables are not modified; the template sees a copy
    /// layered with the engine's reserved keys.
    ///
    /// # Errors
    /// * `Error::ReadError` if the template cannot be read
    /// * `Error::ParseError` if the template has invalid syntax
    /// * `Error::RenderError` if execution fails, including undefined
    ///   variables under the strict policy
    /// * any error raised by `include`, `dict` or `file`
    fn render(&self, template_path: &Path, variables: &VariableSet) -> Result<String> {
        let path = absolute_path(template_path)?;
        let name = path.display().to_string();
        let allow_undefined = variables.allows_undefined();
        debug!(
            "Rendering {} (undefined variables allowed: {})",
            name, allow_undefined
        );

        let template = self
            .environment(allow_undefined)
            .get_template(&name)
            .map_err(|e| Error::from_template_error(e, &name))?;

        let data = Value::from_serialize(variables);
        let inclusion = InclusionContext::root(path.clone(), data.clone());
        let context = layer_context(&data, &path, inclusion)?;

        template
            .render(context)
            .map_err(|e| Error::from_template_error(e, &name))
    }
}
