//! Test-only helpers: a scripted process runner and scratch project layouts.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tempfile::TempDir;

use crate::core::plan::CommandLine;
use crate::io::config::LintConfig;
use crate::io::process::{ExitOutcome, ProcessRunner};

/// Process runner that records command lines and replays scripted outcomes.
///
/// Running out of scripted outcomes is an error, so a test notices when more
/// steps execute than it expected.
#[derive(Debug, Default)]
pub struct ScriptedProcessRunner {
    outcomes: RefCell<VecDeque<ExitOutcome>>,
    calls: RefCell<Vec<CommandLine>>,
}

impl ScriptedProcessRunner {
    /// Script plain exit codes, one per expected invocation.
    pub fn new(codes: Vec<i32>) -> Self {
        Self::with_outcomes(codes.into_iter().map(ExitOutcome::exited).collect())
    }

    pub fn with_outcomes(outcomes: Vec<ExitOutcome>) -> Self {
        Self {
            outcomes: RefCell::new(outcomes.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Command lines executed so far, in order.
    pub fn calls(&self) -> Vec<CommandLine> {
        self.calls.borrow().clone()
    }

    pub fn rendered_calls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(CommandLine::render).collect()
    }
}

impl ProcessRunner for ScriptedProcessRunner {
    fn execute(&self, command: &CommandLine) -> Result<ExitOutcome> {
        self.calls.borrow_mut().push(command.clone());
        self.outcomes
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted outcome left for {command}"))
    }
}

/// Scratch project with the default source and test trees.
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp dir")?;
        let cfg = LintConfig::default();
        fs::create_dir_all(dir.path().join(&cfg.source_dir)).context("create source tree")?;
        fs::create_dir_all(dir.path().join(&cfg.test_dir)).context("create test tree")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create the default isolated environment (`venv/bin`).
    pub fn create_isolated_env(&self) -> Result<()> {
        let cfg = LintConfig::default();
        let bin = self.path().join(&cfg.env_dir).join(&cfg.env_bin_dir);
        fs::create_dir_all(&bin).with_context(|| format!("create {}", bin.display()))
    }

    pub fn write(&self, relative: &str, contents: &str) -> Result<()> {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))
    }
}
