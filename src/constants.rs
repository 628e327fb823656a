//! Common constants used throughout tplgen.

/// Suffix stripped from template file names when computing output paths
pub const TEMPLATE_SUFFIX: &str = ".tpl";

/// Path marker for include-only templates; such files are never generated on their own
pub const CHILD_TEMPLATE_MARKER: &str = "__child__";

/// tplgen's ignore file name, looked up in the template root
pub const IGNORE_FILE: &str = ".genignore";

/// Optional configuration file looked up in the working directory
pub const CONFIG_FILE: &str = ".gen_config.yaml";

pub const DEFAULT_TEMPLATE_DIR: &str = ".gen_templates";
pub const DEFAULT_VARIABLES_DIR: &str = ".gen_variables";
pub const DEFAULT_OUTPUT_DIR: &str = ".gen_output";

/// Variable that switches undefined references from errors to empty values
pub const ALLOW_UNDEFINED_KEY: &str = "$config.allowUndefinedVariables";

/// Internal context key holding the path of the template being executed
pub const CURRENT_TEMPLATE_KEY: &str = "__current_template_path";

/// Internal context key holding the inclusion chain of the template being executed
pub const INCLUSION_KEY: &str = "__inclusion";

/// Highest depth at which `include` may still be called.
/// The root template sits at depth 0, so three nested levels are allowed.
pub const MAX_INCLUDE_DEPTH: usize = 2;
