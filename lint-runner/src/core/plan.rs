//! Step table and plan construction.
//!
//! The plan is the ordered list of command lines a run executes. Order,
//! fixed arguments and target sets are hard-wired here; configuration can only
//! rename the tools, the project and the two trees.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::core::types::{BinPrefix, TargetDirs, ToolSet};

/// One of the four pipeline steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Prune,
    SortImports,
    Format,
    TypeCheck,
}

impl StepKind {
    /// Execution order. Each step sees the files left behind by the previous one.
    pub const ORDER: [StepKind; 4] = [
        StepKind::Prune,
        StepKind::SortImports,
        StepKind::Format,
        StepKind::TypeCheck,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StepKind::Prune => "prune",
            StepKind::SortImports => "sort-imports",
            StepKind::Format => "format",
            StepKind::TypeCheck => "type-check",
        }
    }

    fn tool(self, tools: &ToolSet) -> &str {
        match self {
            StepKind::Prune => &tools.prune,
            StepKind::SortImports => &tools.sort,
            StepKind::Format => &tools.format,
            StepKind::TypeCheck => &tools.typecheck,
        }
    }

    fn fixed_args(self, project: &str) -> Vec<String> {
        match self {
            StepKind::Prune => vec!["--in-place".to_string(), "--recursive".to_string()],
            StepKind::SortImports => vec![format!("--project={project}")],
            StepKind::Format | StepKind::TypeCheck => Vec::new(),
        }
    }

    /// The type checker only looks at the source tree.
    pub fn includes_test_tree(self) -> bool {
        !matches!(self, StepKind::TypeCheck)
    }

    fn targets(self, dirs: &TargetDirs) -> Vec<PathBuf> {
        if self.includes_test_tree() {
            vec![dirs.source.clone(), dirs.tests.clone()]
        } else {
            vec![dirs.source.clone()]
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fully resolved invocation: program, fixed arguments, then positional targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandLine {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub targets: Vec<PathBuf>,
}

impl CommandLine {
    /// Render as a shell trace line (without the leading `+ `).
    pub fn render(&self) -> String {
        let mut words = Vec::with_capacity(1 + self.args.len() + self.targets.len());
        words.push(shell_quote(&self.program.to_string_lossy()));
        words.extend(self.args.iter().map(|arg| shell_quote(arg)));
        words.extend(
            self.targets
                .iter()
                .map(|target| shell_quote(&target.to_string_lossy())),
        );
        words.join(" ")
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// A step paired with the command that implements it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
    pub step: StepKind,
    pub command: CommandLine,
}

/// Build the four command lines in execution order.
pub fn build_plan(
    tools: &ToolSet,
    project: &str,
    dirs: &TargetDirs,
    prefix: &BinPrefix,
) -> Vec<PlannedStep> {
    StepKind::ORDER
        .iter()
        .map(|&step| PlannedStep {
            step,
            command: CommandLine {
                program: prefix.resolve(step.tool(tools)),
                args: step.fixed_args(project),
                targets: step.targets(dirs),
            },
        })
        .collect()
}

fn shell_quote(word: &str) -> String {
    if !word.is_empty() && word.chars().all(is_shell_safe) {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_-./=:,+@%".contains(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_plan(prefix: &BinPrefix) -> Vec<PlannedStep> {
        build_plan(
            &ToolSet::default(),
            "databases",
            &TargetDirs::new("databases", "tests"),
            prefix,
        )
    }

    #[test]
    fn plan_follows_fixed_order() {
        let kinds: Vec<StepKind> = default_plan(&BinPrefix::ambient())
            .iter()
            .map(|planned| planned.step)
            .collect();
        assert_eq!(kinds, StepKind::ORDER.to_vec());
    }

    #[test]
    fn plan_renders_expected_command_lines() {
        let lines: Vec<String> = default_plan(&BinPrefix::ambient())
            .iter()
            .map(|planned| planned.command.render())
            .collect();
        assert_eq!(
            lines,
            vec![
                "autoflake --in-place --recursive databases tests",
                "isort --project=databases databases tests",
                "black databases tests",
                "mypy databases",
            ]
        );
    }

    #[test]
    fn isolated_prefix_applies_to_every_step() {
        let plan = default_plan(&BinPrefix::isolated("venv/bin"));
        for planned in &plan {
            assert!(
                planned.command.program.starts_with("venv/bin"),
                "{} not prefixed",
                planned.command
            );
        }
    }

    #[test]
    fn only_type_check_skips_test_tree() {
        for planned in default_plan(&BinPrefix::ambient()) {
            let has_tests = planned
                .command
                .targets
                .contains(&PathBuf::from("tests"));
            assert_eq!(has_tests, planned.step != StepKind::TypeCheck);
            assert!(planned.command.targets.contains(&PathBuf::from("databases")));
        }
    }

    #[test]
    fn render_quotes_words_with_spaces() {
        let command = CommandLine {
            program: PathBuf::from("my tools/black"),
            args: Vec::new(),
            targets: vec![PathBuf::from("it's")],
        };
        assert_eq!(command.render(), r"'my tools/black' 'it'\''s'");
    }
}
