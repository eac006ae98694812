//! Error reporting for the launcher binary
//!
//! Launcher failures are printed as a single `ERROR:` block on stderr.
//! Internal errors are defects in a subcommand, so those also get the full
//! context chain.

use std::io::Write;

use robolaunch_core::Error as CoreError;

/// Format an error for user display
///
/// Includes the immediate cause when it adds something the top-level
/// message does not already say.
#[must_use]
pub fn format_error(err: &anyhow::Error) -> String {
    let mut msg = err.to_string();

    if let Some(source) = err.source() {
        let source_msg = source.to_string();
        if !msg.contains(&source_msg) && !source_msg.is_empty() {
            msg = format!("{msg}\nCause: {source_msg}");
        }
    }

    msg
}

/// Exit code for an error that escaped the subcommand
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<CoreError>()
        .map_or(1, CoreError::exit_code)
}

fn is_internal(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<CoreError>(), Some(CoreError::Internal(_)))
}

/// Write `err` to `out`, normally stderr.
pub fn report(err: &anyhow::Error, out: &mut dyn Write) {
    let _ = if is_internal(err) {
        tracing::error!("{err:?}");
        writeln!(out, "ERROR: {err:?}")
    } else {
        writeln!(out, "ERROR: {}", format_error(err))
    };
}
