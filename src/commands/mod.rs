//! Command dispatch and handlers.

pub mod generate;

use crate::cli::Command;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Generate { out, replay } => generate::run(out, replay.as_deref()),
    }
}
