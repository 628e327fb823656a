//! Configuration handling for tplgen.
//! Resolves the directories and filters of a run from command-line flags, the
//! optional `.gen_config.yaml` file and built-in defaults, in that order.

use crate::cli::Args;
use crate::constants::{
    CONFIG_FILE, DEFAULT_OUTPUT_DIR, DEFAULT_TEMPLATE_DIR, DEFAULT_VARIABLES_DIR,
};
use crate::error::{Error, Result};
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Contents of `.gen_config.yaml`.
///
/// ```yaml
/// config:
///   template_dir: ".gen_templates"
///   variables_dir: ".gen_variables"
///   output_dir: ".gen_output"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub config: ConfigSection,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct ConfigSection {
    pub template_dir: Option<PathBuf>,
    pub variables_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub variable_files: Vec<PathBuf>,
    #[serde(default)]
    pub skip_template_suffixes: Vec<String>,
    #[serde(default)]
    pub skip_template_prefixes: Vec<String>,
}

/// Fully resolved settings of one generation run. All paths are absolute
/// whenever the working directory is.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub template_dir: PathBuf,
    pub variables_dir: PathBuf,
    pub output_dir: PathBuf,
    pub variable_files: Vec<PathBuf>,
    pub skip_template_suffixes: Vec<String>,
    pub skip_template_prefixes: Vec<String>,
}

/// Loads `.gen_config.yaml` from `work_dir`.
///
/// # Returns
/// * `Result<ConfigSection>` - The `config` section, empty if the file does not exist
///
/// # Errors
/// * `Error::ConfigError` if the file exists but is not valid
pub fn load_config_file<P: AsRef<Path>>(work_dir: P) -> Result<ConfigSection> {
    let config_path = work_dir.as_ref().join(CONFIG_FILE);
    if !config_path.is_file() {
        return Ok(ConfigSection::default());
    }

    debug!("Loading configuration from {}", config_path.display());
    let content = std::fs::read_to_string(&config_path)?;
    if content.trim().is_empty() {
        return Ok(ConfigSection::default());
    }
    let file: ConfigFile = serde_yaml::from_str(&content).map_err(|e| {
        Error::ConfigError(format!(
            "Invalid configuration in {}: {}",
            config_path.display(),
            e
        ))
    })?;
    Ok(file.config)
}

impl Config {
    /// Builds the run configuration.
    ///
    /// # Arguments
    /// * `args` - Parsed command line arguments
    /// * `work_dir` - Directory relative paths are joined to
    ///
    /// # Note
    /// Each setting comes from the command line when given, otherwise from
    /// `.gen_config.yaml`, otherwise from the defaults.
    pub fn resolve<P: AsRef<Path>>(args: &Args, work_dir: P) -> Result<Self> {
        let work_dir = work_dir.as_ref();
        let file = load_config_file(work_dir)?;
        let within = |path: PathBuf| work_dir.join(path);

        let pick = |flag: &Option<PathBuf>, from_file: Option<PathBuf>, default: &str| {
            let path = flag.clone().or(from_file);
            within(path.unwrap_or_else(|| PathBuf::from(default)))
        };

        Ok(Self {
            template_dir: pick(&args.template, file.template_dir, DEFAULT_TEMPLATE_DIR),
            variables_dir: pick(&args.variables, file.variables_dir, DEFAULT_VARIABLES_DIR),
            output_dir: pick(&args.output, file.output_dir, DEFAULT_OUTPUT_DIR),
            variable_files: prefer_flag(&args.varfiles, file.variable_files)
                .into_iter()
                .map(within)
                .collect(),
            skip_template_suffixes: clean_list(prefer_flag(
                &args.skip_suffixes,
                file.skip_template_suffixes,
            )),
            skip_template_prefixes: clean_list(prefer_flag(
                &args.skip_prefixes,
                file.skip_template_prefixes,
            )),
        })
    }
}

fn prefer_flag<T: Clone>(flag: &[T], from_file: Vec<T>) -> Vec<T> {
    if flag.is_empty() {
        from_file
    } else {
        flag.to_vec()
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
