//! Fail-fast code-quality pipeline.
//!
//! Runs four external tools in a fixed order over a project's source and test
//! trees: prune unused code, sort imports, format, type-check (source tree
//! only). The first nonzero exit stops the run and becomes its exit code.
//! Tools come from the isolated environment (`venv/bin/`) when that directory
//! exists, otherwise from `PATH`.
//!
//! - **[`core`]**: Pure, deterministic logic (step table, plan, exit mapping).
//!   No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config file, environment
//!   detection, process spawning, tool lookup).
//!
//! [`pipeline`] coordinates the two to implement the CLI.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod pipeline;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
