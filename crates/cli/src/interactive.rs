//! Operator prompts for batch confirmation.
//!
//! Responsibilities:
//! - Ask a yes/no question before a non-destructive batch.
//! - Collect the typed confirmation phrase before a destructive batch.
//!
//! Does NOT handle:
//! - Comparing the phrase; `ConfirmationGate` owns that rule.
//!
//! Invariants:
//! - Prompts are only shown on an interactive terminal. Without one the caller
//!   gets `InputError::ConfirmationRequired` and nothing is sent.
//! - Typed text is returned untouched (no trimming, no case folding).

use anyhow::Result;
use dialoguer::{Confirm, Input};
use std::io::IsTerminal;

use crate::commands::InputError;

fn require_terminal(flag_hint: &str) -> Result<(), InputError> {
    if std::io::stdin().is_terminal() {
        Ok(())
    } else {
        Err(InputError::ConfirmationRequired(format!(
            "stdin is not a terminal; pass {flag_hint}"
        )))
    }
}

/// Yes/no prompt, defaulting to no.
pub fn confirm_action(prompt: &str) -> Result<bool> {
    require_terminal("--yes")?;
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

/// Ask the operator to type `phrase` to confirm a destructive batch.
pub fn prompt_phrase(phrase: &str, summary: &str) -> Result<String> {
    require_terminal("--confirm <PHRASE>")?;
    eprintln!("{summary}");
    Ok(Input::<String>::new()
        .with_prompt(format!("Type {phrase} to confirm"))
        .allow_empty(true)
        .interact_text()?)
}
