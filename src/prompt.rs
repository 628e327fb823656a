//! User interaction for tplgen.
//! Confirmation prompts sit behind the [`Prompter`] trait so callers can be
//! driven without a terminal.

use crate::error::{Error, Result};
use dialoguer::Confirm;

/// Asks the user yes/no questions.
pub trait Prompter {
    /// Asks `prompt` and returns the answer.
    ///
    /// # Arguments
    /// * `skip` - Answer yes without asking
    /// * `prompt` - Question shown to the user
    fn confirm(&self, skip: bool, prompt: String) -> Result<bool>;
}

/// Terminal prompter backed by dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn confirm(&self, skip: bool, prompt: String) -> Result<bool> {
        if skip {
            return Ok(true);
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| Error::ConfigError(e.to_string()))
    }
}
