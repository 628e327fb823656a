//! tplgen's main application entry point.
//! Handles command-line argument parsing and hands off to the quickstart
//! writer or the generation driver.

use log::info;
use tplgen::{
    cli::{get_args, Args},
    config::Config,
    error::{default_error_handler, Result},
    logger::init_logger,
    processor::generate,
    prompt::DialoguerPrompter,
    quickstart::generate_quickstart,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Resolves the working directory
/// 2. Writes the quickstart project when `--quickstart` is given
/// 3. Otherwise resolves the configuration and generates the output tree
fn run(args: Args) -> Result<()> {
    let work_dir = match &args.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };

    if args.quickstart {
        let prompt = DialoguerPrompter::new();
        generate_quickstart(&prompt, &work_dir, args.yes)?;
        return Ok(());
    }

    let config = Config::resolve(&args, &work_dir)?;
    info!(
        "Templates: {}, variables: {}, output: {}",
        config.template_dir.display(),
        config.variables_dir.display(),
        config.output_dir.display()
    );

    let artifacts = generate(&config)?;
    println!(
        "Generated {} file(s) in {}.",
        artifacts.len(),
        config.output_dir.display()
    );
    Ok(())
}
