//! Stable exit codes for the lint runner.
//!
//! A failing step's own exit code is passed through unchanged; the constants
//! here cover the cases where no tool exit code exists.

/// Every step passed (or a non-running command succeeded).
pub const OK: i32 = 0;
/// Invalid config or an unexpected internal error.
pub const INTERNAL: i32 = 1;
/// A step exceeded `step_timeout_secs` and was killed.
pub const TIMED_OUT: i32 = 124;
/// A tool exists but could not be executed.
pub const NOT_EXECUTABLE: i32 = 126;
/// A tool could not be found on the resolved path.
pub const COMMAND_NOT_FOUND: i32 = 127;
/// Added to the signal number when a tool is killed by a signal.
pub const SIGNAL_BASE: i32 = 128;
