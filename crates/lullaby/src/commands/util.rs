//! Shared helpers for command handlers.

use lullaby_core::{CommandResult, DeviceState};

use crate::cli::GlobalOpts;
use crate::output;

/// Report a completed action.
///
/// Table and plain output get the action's one-line description; structured
/// formats get the resulting device state so scripts can read it back.
pub fn print_result(global: &GlobalOpts, result: &CommandResult, state: &DeviceState) {
    let message = result.to_string();
    let out = output::render_single(&global.output, state, |_| message.clone(), |_| {
        message.clone()
    });
    output::print_output(&out, global.quiet);
}

/// Prompt/interactive failure as a CLI validation error.
pub fn prompt_err(e: impl std::fmt::Display) -> crate::error::CliError {
    crate::error::CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}
