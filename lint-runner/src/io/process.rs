//! Running tool processes.
//!
//! The [`ProcessRunner`] trait decouples pipeline orchestration from process
//! spawning. Tests use a scripted runner that records command lines and returns
//! predetermined exit codes without spawning anything.

use std::process::{Command, ExitStatus, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, error, instrument, warn};
use wait_timeout::ChildExt;

use crate::core::exit_status::{code_for_spawn_error, code_from_parts};
use crate::core::plan::CommandLine;
use crate::exit_codes;

/// How a tool invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Shell-style exit code (signals and spawn failures already mapped).
    pub code: i32,
    pub timed_out: bool,
}

impl ExitOutcome {
    pub fn exited(code: i32) -> Self {
        Self {
            code,
            timed_out: false,
        }
    }

    pub fn timed_out() -> Self {
        Self {
            code: exit_codes::TIMED_OUT,
            timed_out: true,
        }
    }

    pub fn success(&self) -> bool {
        self.code == exit_codes::OK
    }
}

/// Abstraction over tool execution.
pub trait ProcessRunner {
    /// Run `command` to completion and report its exit code.
    ///
    /// Tool failures are reported through [`ExitOutcome`]; `Err` is reserved
    /// for failures of the runner itself.
    fn execute(&self, command: &CommandLine) -> Result<ExitOutcome>;
}

/// Spawns tools as child processes with inherited stdio.
///
/// Tool diagnostics go straight to the terminal; nothing is captured.
#[derive(Debug, Clone, Default)]
pub struct SystemProcessRunner {
    timeout: Option<Duration>,
}

impl SystemProcessRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl ProcessRunner for SystemProcessRunner {
    #[instrument(skip_all, fields(
        program = %command.program.display(),
        timeout_secs = self.timeout.map(|t| t.as_secs()),
    ))]
    fn execute(&self, command: &CommandLine) -> Result<ExitOutcome> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .args(&command.targets)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        debug!("spawning tool");
        let mut child = match cmd.spawn() {
            Ok(c) => c,
            Err(e) => {
                if let Some(code) = code_for_spawn_error(e.kind()) {
                    debug!(err = %e, code, "tool could not be started");
                    eprintln!(
                        "{}: {}",
                        command.program.display(),
                        spawn_error_message(code)
                    );
                    return Ok(ExitOutcome::exited(code));
                }
                error!(err = %e, "failed to spawn tool");
                return Err(e).with_context(|| format!("spawn {}", command.program.display()));
            }
        };

        let status = match self.timeout {
            None => child.wait().context("wait for tool")?,
            Some(timeout) => match child.wait_timeout(timeout).context("wait for tool")? {
                Some(status) => status,
                None => {
                    warn!(timeout_secs = timeout.as_secs(), "tool timed out, killing");
                    child.kill().context("kill tool")?;
                    child.wait().context("wait tool after kill")?;
                    return Ok(ExitOutcome::timed_out());
                }
            },
        };

        let code = status_code(status);
        debug!(code, "tool finished");
        Ok(ExitOutcome::exited(code))
    }
}

fn spawn_error_message(code: i32) -> &'static str {
    if code == exit_codes::NOT_EXECUTABLE {
        "permission denied"
    } else {
        "command not found"
    }
}

#[cfg(unix)]
fn status_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    code_from_parts(status.code(), status.signal())
}

#[cfg(not(unix))]
fn status_code(status: ExitStatus) -> i32 {
    code_from_parts(status.code(), None)
}
