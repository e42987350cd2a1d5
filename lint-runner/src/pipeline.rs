//! Fail-fast execution of the lint plan.
//!
//! A run resolves the tool prefix once, builds the four-step plan, and executes
//! it strictly in order. The first step that does not exit 0 ends the run and
//! its exit code becomes the run's exit code. Files already rewritten by
//! earlier steps stay rewritten.

use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::core::plan::{PlannedStep, StepKind, build_plan};
use crate::core::types::ExecutionEnvironment;
use crate::exit_codes;
use crate::io::config::LintConfig;
use crate::io::environment::detect_environment;
use crate::io::process::ProcessRunner;
use crate::io::tools::{MissingTool, find_missing_tools_on_path};

/// Result of one executed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    pub step: StepKind,
    pub code: i32,
    pub timed_out: bool,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Every step exited 0.
    Passed,
    /// `step` exited with `code`; later steps did not run.
    Failed { step: StepKind, code: i32 },
    /// `--check-tools` found unresolvable programs; no step ran.
    MissingTools(Vec<MissingTool>),
}

impl PipelineOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineOutcome::Passed => exit_codes::OK,
            PipelineOutcome::Failed { code, .. } => *code,
            PipelineOutcome::MissingTools(_) => exit_codes::COMMAND_NOT_FOUND,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub outcome: PipelineOutcome,
    /// Steps that actually ran, in order.
    pub executed: Vec<StepResult>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LintOptions {
    /// Echo `+ <command>` before each step.
    pub trace: bool,
    /// Resolve every tool before running the first step.
    pub check_tools: bool,
}

/// Resolve the environment under `root` and build the plan for `cfg`.
pub fn resolve_plan(root: &Path, cfg: &LintConfig) -> (ExecutionEnvironment, Vec<PlannedStep>) {
    let env = detect_environment(root, &cfg.env_dir, &cfg.env_bin_dir);
    let plan = build_plan(&cfg.tools, &cfg.project, &cfg.targets(), &env.prefix);
    (env, plan)
}

/// Full lint run: resolve, optionally preflight, then execute.
#[instrument(skip_all, fields(root = %root.display(), check_tools = options.check_tools))]
pub fn run_lint<R: ProcessRunner>(
    root: &Path,
    cfg: &LintConfig,
    options: &LintOptions,
    runner: &R,
    trace: &mut dyn Write,
) -> Result<PipelineReport> {
    let (env, plan) = resolve_plan(root, cfg);
    info!(
        isolated = env.isolated_environment_detected,
        prefix = ?env.prefix.dir(),
        "resolved tool environment"
    );

    if options.check_tools {
        let missing = find_missing_tools_on_path(root, &plan);
        if !missing.is_empty() {
            info!(count = missing.len(), "tools missing, nothing executed");
            return Ok(PipelineReport {
                outcome: PipelineOutcome::MissingTools(missing),
                executed: Vec::new(),
            });
        }
    }

    if options.trace {
        run_pipeline(runner, &plan, trace)
    } else {
        run_pipeline(runner, &plan, &mut std::io::sink())
    }
}

/// Execute `plan` in order, stopping at the first step that does not exit 0.
pub fn run_pipeline<R: ProcessRunner>(
    runner: &R,
    plan: &[PlannedStep],
    trace: &mut dyn Write,
) -> Result<PipelineReport> {
    let mut executed = Vec::with_capacity(plan.len());

    for planned in plan {
        writeln!(trace, "+ {}", planned.command).context("write command trace")?;
        trace.flush().context("flush command trace")?;

        let started = Instant::now();
        let outcome = runner
            .execute(&planned.command)
            .with_context(|| format!("run {} step", planned.step))?;
        let duration = started.elapsed();
        info!(
            step = %planned.step,
            code = outcome.code,
            duration_ms = duration.as_millis() as u64,
            "step finished"
        );

        executed.push(StepResult {
            step: planned.step,
            code: outcome.code,
            timed_out: outcome.timed_out,
            duration,
        });

        if !outcome.success() {
            info!(step = %planned.step, code = outcome.code, "step failed, aborting");
            return Ok(PipelineReport {
                outcome: PipelineOutcome::Failed {
                    step: planned.step,
                    code: outcome.code,
                },
                executed,
            });
        }
    }

    debug!(steps = executed.len(), "all steps passed");
    Ok(PipelineReport {
        outcome: PipelineOutcome::Passed,
        executed,
    })
}
