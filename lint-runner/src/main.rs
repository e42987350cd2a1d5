//! Fail-fast code-quality pipeline runner.
//!
//! With no subcommand, runs prune → sort imports → format → type-check over the
//! configured source and test trees and exits with the first failing step's
//! exit code.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;

use lint_runner::core::plan::PlannedStep;
use lint_runner::core::types::ExecutionEnvironment;
use lint_runner::exit_codes;
use lint_runner::io::config::{CONFIG_FILE_NAME, LintConfig, load_config, write_config};
use lint_runner::io::process::SystemProcessRunner;
use lint_runner::io::tools::{MissingTool, find_missing_tools_on_path};
use lint_runner::logging;
use lint_runner::pipeline::{LintOptions, PipelineOutcome, resolve_plan, run_lint};

#[derive(Parser)]
#[command(
    name = "lint-runner",
    version,
    about = "Prune, sort imports, format and type-check, stopping at the first failure"
)]
struct Cli {
    /// Config file (default: `lint-runner.toml` in the working directory).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Do not echo `+ <command>` before each step.
    #[arg(short, long)]
    quiet: bool,

    /// Verify every tool can be found before running any step.
    #[arg(long, global = true)]
    check_tools: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the resolved command lines without running them.
    Plan {
        /// Emit JSON instead of shell lines.
        #[arg(long)]
        json: bool,
    },
    /// Write a config file with the default settings.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Serialize)]
struct PlanView<'a> {
    environment: &'a ExecutionEnvironment,
    steps: &'a [PlannedStep],
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INTERNAL);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let root = env::current_dir().context("resolve working directory")?;
    let explicit_config = cli.config.is_some();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| root.join(CONFIG_FILE_NAME));

    match cli.command {
        Some(Command::Init { .. }) if cli.check_tools => {
            bail!("--check-tools cannot be combined with init")
        }
        Some(Command::Init { force }) => cmd_init(&config_path, force),
        Some(Command::Plan { json }) => {
            let cfg = load_selected_config(&config_path, explicit_config)?;
            cmd_plan(&root, &cfg, json, cli.check_tools)
        }
        None => {
            let cfg = load_selected_config(&config_path, explicit_config)?;
            let options = LintOptions {
                trace: !cli.quiet,
                check_tools: cli.check_tools,
            };
            cmd_run(&root, &cfg, &options)
        }
    }
}

/// Load the config, requiring the file to exist when it was named on the command line.
fn load_selected_config(path: &Path, explicit: bool) -> Result<LintConfig> {
    if explicit && !path.exists() {
        bail!("config {} not found", path.display());
    }
    load_config(path)
}

fn cmd_run(root: &Path, cfg: &LintConfig, options: &LintOptions) -> Result<i32> {
    let runner = SystemProcessRunner::new(cfg.step_timeout());
    let mut stderr = std::io::stderr();
    let report = run_lint(root, cfg, options, &runner, &mut stderr)?;

    match &report.outcome {
        PipelineOutcome::MissingTools(missing) => report_missing_tools(missing),
        PipelineOutcome::Failed { code, .. } if *code == exit_codes::TIMED_OUT => {
            if let Some(step) = report.executed.last().filter(|s| s.timed_out) {
                eprintln!(
                    "{} step timed out after {}s",
                    step.step,
                    cfg.step_timeout_secs.unwrap_or_default()
                );
            }
        }
        _ => {}
    }
    Ok(report.outcome.exit_code())
}

fn report_missing_tools(missing: &[MissingTool]) {
    for tool in missing {
        eprintln!(
            "{}: command not found (needed by the {} step)",
            tool.program.display(),
            tool.step
        );
    }
}

/// Print the plan. With `check_tools`, also report unresolvable programs and
/// exit 127 if there are any.
fn cmd_plan(root: &Path, cfg: &LintConfig, json: bool, check_tools: bool) -> Result<i32> {
    let (environment, steps) = resolve_plan(root, cfg);
    if json {
        let view = PlanView {
            environment: &environment,
            steps: &steps,
        };
        let payload = serde_json::to_string_pretty(&view).context("serialize plan")?;
        println!("{payload}");
    } else {
        for planned in &steps {
            println!("{}", planned.command);
        }
    }
    if check_tools {
        let missing = find_missing_tools_on_path(root, &steps);
        if !missing.is_empty() {
            report_missing_tools(&missing);
            return Ok(exit_codes::COMMAND_NOT_FOUND);
        }
    }
    Ok(exit_codes::OK)
}

fn cmd_init(path: &Path, force: bool) -> Result<i32> {
    if !force && path.exists() {
        println!("{} already exists", path.display());
        return Ok(exit_codes::OK);
    }
    write_config(path, &LintConfig::default())
        .with_context(|| format!("write {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(exit_codes::OK)
}
