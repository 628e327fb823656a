//! Command-line interface implementation for tplgen.
//! Provides argument parsing and help text formatting using clap.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments structure for tplgen.
///
/// Directory options left unset fall back to `.gen_config.yaml`, then to the
/// built-in defaults, see [`crate::config::Config::resolve`].
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "tplgen: generate a file tree from templates and YAML variables",
    long_about = None
)]
pub struct Args {
    /// Working directory; relative paths are resolved against it
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Template directory [default: .gen_templates]
    #[arg(short, long, value_name = "DIR")]
    pub template: Option<PathBuf>,

    /// Variables directory, all *.yaml and *.yml files in it are loaded [default: .gen_variables]
    #[arg(long, value_name = "DIR")]
    pub variables: Option<PathBuf>,

    /// Output directory [default: .gen_output]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Additional variable files, comma separated, loaded after the variables directory
    #[arg(long, value_name = "FILES", value_delimiter = ',')]
    pub varfiles: Vec<PathBuf>,

    /// Template file suffixes to skip, comma separated
    #[arg(long, value_name = "SUFFIXES", value_delimiter = ',')]
    pub skip_suffixes: Vec<String>,

    /// Template path prefixes (relative to the template directory) to skip, comma separated
    #[arg(long, value_name = "PREFIXES", value_delimiter = ',')]
    pub skip_prefixes: Vec<String>,

    /// Write a quickstart example project into the working directory
    #[arg(long)]
    pub quickstart: bool,

    /// Skip the confirmation prompt of --quickstart
    #[arg(short, long)]
    pub yes: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With clap's default error handling for argument errors
pub fn get_args() -> Args {
    Args::parse()
}
