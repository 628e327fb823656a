//! Error handling for tplgen.
//! Defines custom error types and results used throughout the application.

use std::io;
use thiserror::Error;

/// Custom error types for tplgen operations.
///
/// Failures raised inside template functions (`include`, `dict`, `file`) travel
/// through minijinja as the error source and are recovered as the same variant
/// once the top-level render returns, see [`Error::from_template_error`].
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// A variables file, template or `file()` target could not be read
    #[error("Failed to read '{path}': {message}.")]
    ReadError { path: String, message: String },

    /// A variables file is not a valid YAML/JSON mapping
    #[error("Failed to parse variables file '{path}': {message}.")]
    VariablesParseError { path: String, message: String },

    /// Template source has malformed syntax
    #[error("Failed to parse template '{path}': {message}.")]
    ParseError { path: String, message: String },

    /// Runtime failure while executing a template, including undefined
    /// variables under the strict policy
    #[error("Failed to render template '{path}': {message}.")]
    RenderError { path: String, message: String },

    #[error("Include depth limit of {limit} exceeded while including '{path}'.")]
    NestingLimitError { limit: usize, path: String },

    #[error("Cyclic include detected: {}.", chain.join(" -> "))]
    CyclicReferenceError { chain: Vec<String> },

    /// Malformed call to a template function
    #[error("Invalid arguments: {0}.")]
    ArgumentError(String),

    /// Represents errors that occur during configuration parsing or processing
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    #[error("Template directory '{template_dir}' does not exist.")]
    TemplateDirNotFoundError { template_dir: String },

    /// Represents errors in processing .genignore files
    #[error("Ignore file error: {0}.")]
    IgnoreFileError(String),

    /// Generation of a single template failed; aborts the whole run.
    ///
    /// `source()` yields the `Box<Error>` itself, use [`Error::root`] to get
    /// at the underlying variant.
    #[error("Failed to generate '{template}': {source}")]
    ProcessError {
        template: String,
        #[source]
        source: Box<Error>,
    },
}

// io::Error is not Clone, the copy keeps its kind and message.
impl Clone for Error {
    fn clone(&self) -> Self {
        match self {
            Error::IoError(e) => Error::IoError(io::Error::new(e.kind(), e.to_string())),
            Error::ReadError { path, message } => Error::ReadError {
                path: path.clone(),
                message: message.clone(),
            },
            Error::VariablesParseError { path, message } => Error::VariablesParseError {
                path: path.clone(),
                message: message.clone(),
            },
            Error::ParseError { path, message } => Error::ParseError {
                path: path.clone(),
                message: message.clone(),
            },
            Error::RenderError { path, message } => Error::RenderError {
                path: path.clone(),
                message: message.clone(),
            },
            Error::NestingLimitError { limit, path } => Error::NestingLimitError {
                limit: *limit,
                path: path.clone(),
            },
            Error::CyclicReferenceError { chain } => Error::CyclicReferenceError {
                chain: chain.clone(),
            },
            Error::ArgumentError(msg) => Error::ArgumentError(msg.clone()),
            Error::ConfigError(msg) => Error::ConfigError(msg.clone()),
            Error::TemplateDirNotFoundError { template_dir } => Error::TemplateDirNotFoundError {
                template_dir: template_dir.clone(),
            },
            Error::IgnoreFileError(msg) => Error::IgnoreFileError(msg.clone()),
            Error::ProcessError { template, source } => Error::ProcessError {
                template: template.clone(),
                source: source.clone(),
            },
        }
    }
}

impl Error {
    /// Wraps the error so it can be returned from a minijinja callback.
    pub fn into_template_error(self) -> minijinja::Error {
        minijinja::Error::new(minijinja::ErrorKind::InvalidOperation, self.to_string())
            .with_source(self)
    }

    /// Converts a minijinja failure into a crate error.
    ///
    /// If a crate error was raised by one of the template functions, it is
    /// returned as-is; syntax errors become [`Error::ParseError`] and every
    /// other failure becomes [`Error::RenderError`] for `path`.
    pub fn from_template_error(err: minijinja::Error, path: &str) -> Self {
        if let Some(inner) = Self::find_in_chain(&err) {
            return inner.clone();
        }
        let message = err.to_string();
        match err.kind() {
            minijinja::ErrorKind::SyntaxError => Error::ParseError {
                path: path.to_string(),
                message,
            },
            _ => Error::RenderError {
                path: path.to_string(),
                message,
            },
        }
    }

    /// Innermost error, looking through any number of `ProcessError` layers.
    pub fn root(&self) -> &Error {
        match self {
            Error::ProcessError { source, .. } => source.root(),
            other => other,
        }
    }

    fn find_in_chain(err: &minijinja::Error) -> Option<&Error> {
        let mut source = std::error::Error::source(err);
        while let Some(current) = source {
            if let Some(found) = current.downcast_ref::<Error>() {
                return Some(found);
            }
            source = current.source();
        }
        None
    }
}

/// Convenience type alias for Results with Error as the error type.
///
/// # Type Parameters
/// * `T` - The type of the success value
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
