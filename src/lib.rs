//! tplgen is a template-driven file generator.
//! It renders a tree of templates against merged YAML variables into an output
//! tree, with recursive includes and variable placeholders in file paths.

/// Command-line interface module for the tplgen application
pub mod cli;

/// Run configuration
/// Merges command-line flags, `.gen_config.yaml` and defaults
pub mod config;

/// Shared file names, default directories and reserved context keys
pub mod constants;

/// Error types and handling for the tplgen application
pub mod error;

/// Custom template functions (`default`, `lcfirst`, `ucfirst`, `dict`,
/// `currentYear`, `file`, `include`)
pub mod functions;

/// File ignore patterns
/// Processes .genignore files to exclude specific templates
pub mod ignore;

/// Recursive template inclusion with cycle and depth checks
pub mod include;

/// Logger setup for the command-line binary
pub mod logger;

/// Output path computation and `__name__` placeholders
pub mod path;

/// Template discovery, filtering and the generation driver
pub mod processor;

/// User input and interaction handling
pub mod prompt;

/// Example project scaffolding for `--quickstart`
pub mod quickstart;

/// Template rendering engine
pub mod renderer;

/// Variable file loading and deep merging
pub mod variables;
