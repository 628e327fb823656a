//! Quickstart example project.
//! Writes a small, ready-to-run project using the default directory layout.

use crate::constants::{
    CONFIG_FILE, DEFAULT_OUTPUT_DIR, DEFAULT_TEMPLATE_DIR, DEFAULT_VARIABLES_DIR,
};
use crate::error::Result;
use crate::prompt::Prompter;
use indexmap::IndexMap;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Example files keyed by their path relative to the working directory.
pub fn quickstart_files() -> IndexMap<String, String> {
    let config = [
        "config:".to_string(),
        format!("  template_dir: \"{DEFAULT_TEMPLATE_DIR}\""),
        format!("  variables_dir: \"{DEFAULT_VARIABLES_DIR}\""),
        format!("  output_dir: \"{DEFAULT_OUTPUT_DIR}\""),
    ];

    let mut files = IndexMap::new();
    files.insert(CONFIG_FILE.to_string(), config.join("\n") + "\n");
    files.insert(
        format!("{DEFAULT_VARIABLES_DIR}/example.yaml"),
        r#"greeting: "Hello"
name: "World"
# When true, undefined variables render as empty text.
# When false or unset, an undefined variable stops the generation.
$config.allowUndefinedVariables: true
"#
        .to_string(),
    );
    files.insert(
        format!("{DEFAULT_VARIABLES_DIR}/additional.yaml"),
        "additional_var: \"This is an additional variable\"\n".to_string(),
    );
    files.insert(
        format!("{DEFAULT_TEMPLATE_DIR}/example.txt.tpl"),
        r#"{{ greeting }}, {{ name }}!

Undefined variable: {{ undefinedVariable }}

Variable from another file: {{ additional_var }}
Generated in {{ currentYear() }}
"#
        .to_string(),
    );
    files.insert(
        format!("{DEFAULT_TEMPLATE_DIR}/parent.txt.tpl"),
        r#"This is the parent template.

{{ include("child__child__.txt.tpl") }}
"#
        .to_string(),
    );
    files.insert(
        format!("{DEFAULT_TEMPLATE_DIR}/child__child__.txt.tpl"),
        r#"This is the child template, it only renders through include.
Greeting from the parent: {{ greeting }}"#
            .to_string(),
    );
    files
}

/// Writes the quickstart project into `work_dir` once the user agrees.
///
/// # Arguments
/// * `prompt` - Prompter used for the confirmation
/// * `work_dir` - Directory the project is written into
/// * `skip_confirm` - Write without asking
///
/// # Returns
/// * `Result<Vec<PathBuf>>` - Files written, empty if the user declined
pub fn generate_quickstart<P: AsRef<Path>>(
    prompt: &dyn Prompter,
    work_dir: P,
    skip_confirm: bool,
) -> Result<Vec<PathBuf>> {
    let work_dir = work_dir.as_ref();
    let files = quickstart_files();

    let listing = files
        .keys()
        .map(|path| format!("  - {path}"))
        .collect::<Vec<_>>()
        .join("\n");
    let question = format!(
        "The following files will be created in '{}':\n{}\nContinue?",
        work_dir.display(),
        listing
    );
    if !prompt.confirm(skip_confirm, question)? {
        info!("Quickstart cancelled");
        return Ok(Vec::new());
    }

    let mut written = Vec::with_capacity(files.len());
    for (relative, content) in &files {
        let path = work_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        info!("Created {}", path.display());
        written.push(path);
    }

    info!(
        "Quickstart project created, run tplgen in '{}' to generate {}",
        work_dir.display(),
        DEFAULT_OUTPUT_DIR
    );
    Ok(written)
}
