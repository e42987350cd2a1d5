//! Mapping child process results onto shell-style exit codes.

use std::io::ErrorKind;

use crate::exit_codes;

/// Exit code for a process that exited with `code` or was killed by `signal`.
///
/// A signal death maps to `128 + signal`, as a shell reports it.
pub fn code_from_parts(code: Option<i32>, signal: Option<i32>) -> i32 {
    match (code, signal) {
        (Some(code), _) => code,
        (None, Some(signal)) => exit_codes::SIGNAL_BASE + signal,
        (None, None) => exit_codes::INTERNAL,
    }
}

/// Exit code a shell would report when it cannot start the program at all.
///
/// Returns `None` for spawn errors that have no shell equivalent.
pub fn code_for_spawn_error(kind: ErrorKind) -> Option<i32> {
    match kind {
        ErrorKind::NotFound => Some(exit_codes::COMMAND_NOT_FOUND),
        ErrorKind::PermissionDenied => Some(exit_codes::NOT_EXECUTABLE),
        _ => None,
    }
}
