//! Generation driver.
//! Walks the template directory, filters out files that must not produce
//! output, renders the rest and writes them into the output tree.

use globset::GlobSet;
use log::{debug, info};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::{
    config::Config,
    constants::CHILD_TEMPLATE_MARKER,
    error::{Error, Result},
    ignore::parse_ignore_file,
    path::OutputPathResolver,
    renderer::{RenderEngine, TemplateRenderer},
    variables::{find_variable_files, load_variables, VariableSet},
};

/// A file found under the template directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub path: PathBuf,
    /// Path relative to the template directory
    pub relative_path: PathBuf,
}

/// Why a template file produces no output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Include-only template
    ChildTemplate,
    Suffix(String),
    Prefix(String),
    Ignored,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ChildTemplate => write!(f, "include-only template"),
            SkipReason::Suffix(suffix) => write!(f, "matches skipped suffix '{suffix}'"),
            SkipReason::Prefix(prefix) => write!(f, "matches skipped prefix '{prefix}'"),
            SkipReason::Ignored => write!(f, "matches an ignore pattern"),
        }
    }
}

/// Decides which template files are rendered.
#[derive(Debug, Clone)]
pub struct TemplateFilter {
    skip_suffixes: Vec<String>,
    skip_prefixes: Vec<String>,
    ignored: GlobSet,
}

impl TemplateFilter {
    pub fn new(skip_suffixes: Vec<String>, skip_prefixes: Vec<String>, ignored: GlobSet) -> Self {
        Self {
            skip_suffixes,
            skip_prefixes,
            ignored,
        }
    }

    /// Returns why `file` is skipped, or `None` if it must be rendered.
    ///
    /// The include-only marker and the prefixes are checked against the path
    /// relative to the template directory, so a marker in a parent directory
    /// of the template root does not hide the whole tree.
    pub fn skip_reason(&self, file: &TemplateFile) -> Option<SkipReason> {
        let relative = file.relative_path.to_string_lossy();

        if relative.contains(CHILD_TEMPLATE_MARKER) {
            return Some(SkipReason::ChildTemplate);
        }
        if let Some(suffix) = first_match(&self.skip_suffixes, |s| relative.ends_with(s)) {
            return Some(SkipReason::Suffix(suffix.clone()));
        }
        if let Some(prefix) = first_match(&self.skip_prefixes, |p| relative.starts_with(p)) {
            return Some(SkipReason::Prefix(prefix.clone()));
        }
        if self.ignored.is_match(&file.relative_path) {
            return Some(SkipReason::Ignored);
        }
        None
    }
}

fn first_match(patterns: &[String], matches: impl Fn(&str) -> bool) -> Option<&String> {
    patterns.iter().find(|pattern| matches(pattern))
}

/// Lists the files of `template_dir` that pass `filter`, sorted by path.
///
/// # Errors
/// * `Error::IoError` if the directory cannot be walked
pub fn scan_templates<P: AsRef<Path>>(
    template_dir: P,
    filter: &TemplateFilter,
) -> Result<Vec<TemplateFile>> {
    let template_dir = template_dir.as_ref();
    let mut files = Vec::new();

    for entry in WalkDir::new(template_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::IoError(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative_path = path
            .strip_prefix(template_dir)
            .map_err(|e| Error::ConfigError(e.to_string()))?
            .to_path_buf();
        let file = TemplateFile {
            path: path.to_path_buf(),
            relative_path,
        };

        match filter.skip_reason(&file) {
            Some(reason) => debug!("Skipping {}: {}", file.relative_path.display(), reason),
            None => {
                debug!("Found template {}", file.relative_path.display());
                files.push(file);
            }
        }
    }

    Ok(files)
}

/// Rendered content of one template and where it goes.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedArtifact {
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    pub content: String,
}

/// Renders template files of one run.
pub struct Processor<'a> {
    renderer: &'a dyn TemplateRenderer,
    paths: OutputPathResolver,
    output_root: PathBuf,
    variables: &'a VariableSet,
}

impl<'a> Processor<'a> {
    pub fn new<P: Into<PathBuf>>(
        renderer: &'a dyn TemplateRenderer,
        output_root: P,
        variables: &'a VariableSet,
    ) -> Self {
        Self {
            renderer,
            paths: OutputPathResolver::new(),
            output_root: output_root.into(),
            variables,
        }
    }

    /// Resolves the output path of `file` and renders it, without writing.
    pub fn process(&self, file: &TemplateFile) -> Result<RenderedArtifact> {
        let output = self
            .paths
            .resolve(&file.relative_path, &self.output_root, self.variables);
        let content = self.renderer.render(&file.path, self.variables)?;
        Ok(RenderedArtifact {
            template_path: file.path.clone(),
            output_path: output.path,
            content,
        })
    }
}

/// Writes an artifact, creating its parent directories.
pub fn write_artifact(artifact: &RenderedArtifact) -> Result<()> {
    if let Some(parent) = artifact.output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&artifact.output_path, &artifact.content)?;
    Ok(())
}

/// Runs a whole generation.
///
/// # Arguments
/// * `config` - Resolved run configuration
///
/// # Returns
/// * `Result<Vec<RenderedArtifact>>` - Every file written, in walk order
///
/// # Errors
/// * `Error::TemplateDirNotFoundError` if the template directory does not exist
/// * `Error::ConfigError` if no variable files are available
/// * `Error::ProcessError` wrapping the first failure of a single template;
///   files written before it are kept
pub fn generate(config: &Config) -> Result<Vec<RenderedArtifact>> {
    if !config.template_dir.is_dir() {
        return Err(Error::TemplateDirNotFoundError {
            template_dir: config.template_dir.display().to_string(),
        });
    }

    if !config.variables_dir.is_dir() && config.variable_files.is_empty() {
        return Err(Error::ConfigError(format!(
            "variables directory '{}' does not exist and no variable files were given",
            config.variables_dir.display()
        )));
    }
    let variable_files = find_variable_files(&config.variables_dir, &config.variable_files)?;
    if variable_files.is_empty() {
        return Err(Error::ConfigError("no variable files found".to_string()));
    }
    let variables = load_variables(&variable_files)?;
    info!("Loaded {} variable file(s)", variable_files.len());

    fs::create_dir_all(&config.output_dir)?;

    let filter = TemplateFilter::new(
        config.skip_template_suffixes.clone(),
        config.skip_template_prefixes.clone(),
        parse_ignore_file(&config.template_dir)?,
    );
    let templates = scan_templates(&config.template_dir, &filter)?;

    let engine = RenderEngine::new(&config.template_dir);
    let processor = Processor::new(&engine, &config.output_dir, &variables);

    let mut artifacts = Vec::with_capacity(templates.len());
    for template in &templates {
        let artifact = processor
            .process(template)
            .and_then(|artifact| write_artifact(&artifact).map(|_| artifact))
            .map_err(|e| Error::ProcessError {
                template: template.path.display().to_string(),
                source: Box::new(e),
            })?;
        info!("Generated {}", artifact.output_path.display());
        artifacts.push(artifact);
    }

    info!(
        "Generated {} file(s) into {}",
        artifacts.len(),
        config.output_dir.display()
    );
    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use globset::{Glob, GlobSetBuilder};

    fn file(relative: &str) -> TemplateFile {
        TemplateFile {
            path: Path::new("/tpl").join(relative),
            relative_path: PathBuf::from(relative),
        }
    }

    fn filter(suffixes: &[&str], prefixes: &[&str], globs: &[&str]) -> TemplateFilter {
        let mut builder = GlobSetBuilder::new();
        for glob in globs {
            builder.add(Glob::new(glob).unwrap());
        }
        TemplateFilter::new(
            suffixes.iter().map(|s| s.to_string()).collect(),
            prefixes.iter().map(|s| s.to_string()).collect(),
            builder.build().unwrap(),
        )
    }

    #[test]
    fn test_skip_reasons() {
        let filter = filter(&[".bak"], &["drafts/"], &["*.log"]);
        let drafts = SkipReason::Prefix("drafts/".to_string());

        let cases = [
            ("parts/header__child__.tpl", Some(SkipReason::ChildTemplate)),
            ("main.go.bak", Some(SkipReason::Suffix(".bak".to_string()))),
            ("drafts/a.tpl", Some(drafts)),
            ("debug.log", Some(SkipReason::Ignored)),
            ("main.go.tpl", None),
        ];
        for (relative, expected) in cases {
            assert_eq!(filter.skip_reason(&file(relative)), expected, "{relative}");
        }
    }

    #[test]
    fn test_marker_outside_template_root_is_ignored() {
        let filter = filter(&[], &[], &[]);
        let file = TemplateFile {
            path: PathBuf::from("/work/__child__/tpl/main.tpl"),
            relative_path: PathBuf::from("main.tpl"),
        };
        assert_eq!(filter.skip_reason(&file), None);
    }
}
