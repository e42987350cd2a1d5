//! Up-front tool lookup for `--check-tools`.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::core::plan::{PlannedStep, StepKind};

/// A step whose program could not be located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTool {
    pub step: StepKind,
    pub program: PathBuf,
}

/// Return the steps whose program cannot be executed.
///
/// A program with a directory component is checked as a path relative to
/// `root`. A bare name is searched in `search_path` (the value of `PATH`).
pub fn find_missing_tools(
    root: &Path,
    plan: &[PlannedStep],
    search_path: Option<&OsStr>,
) -> Vec<MissingTool> {
    plan.iter()
        .filter(|planned| !is_resolvable(root, &planned.command.program, search_path))
        .map(|planned| MissingTool {
            step: planned.step,
            program: planned.command.program.clone(),
        })
        .collect()
}

/// [`find_missing_tools`] against the current process `PATH`.
pub fn find_missing_tools_on_path(root: &Path, plan: &[PlannedStep]) -> Vec<MissingTool> {
    let search_path = env::var_os("PATH");
    find_missing_tools(root, plan, search_path.as_deref())
}

fn is_resolvable(root: &Path, program: &Path, search_path: Option<&OsStr>) -> bool {
    if program.components().count() > 1 {
        return is_executable(&root.join(program));
    }
    search_path
        .map(|paths| env::split_paths(paths).any(|dir| is_executable(&dir.join(program))))
        .unwrap_or(false)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::core::plan::build_plan;
    use crate::core::types::{BinPrefix, TargetDirs, ToolSet};
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn write_executable(path: &Path) {
        fs::write(path, "#!/bin/sh\nexit 0\n").expect("write tool");
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("chmod");
    }

    fn plan(prefix: &BinPrefix) -> Vec<PlannedStep> {
        build_plan(
            &ToolSet::default(),
            "databases",
            &TargetDirs::new("databases", "tests"),
            prefix,
        )
    }

    #[test]
    fn prefixed_tools_are_checked_under_root() {
        let temp = tempfile::tempdir().expect("tempdir");
        let bin = temp.path().join("venv").join("bin");
        fs::create_dir_all(&bin).expect("create bin");
        for tool in ["autoflake", "isort", "black"] {
            write_executable(&bin.join(tool));
        }

        let plan = plan(&BinPrefix::isolated("venv/bin"));
        let missing = find_missing_tools(temp.path(), &plan, None);
        assert_eq!(
            missing,
            vec![MissingTool {
                step: StepKind::TypeCheck,
                program: PathBuf::from("venv/bin/mypy"),
            }]
        );
    }

    #[test]
    fn bare_tools_are_searched_in_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let first = temp.path().join("a");
        let second = temp.path().join("b");
        fs::create_dir_all(&first).expect("create a");
        fs::create_dir_all(&second).expect("create b");
        write_executable(&first.join("autoflake"));
        write_executable(&first.join("isort"));
        write_executable(&second.join("black"));
        write_executable(&second.join("mypy"));

        let search = env::join_paths([&first, &second]).expect("join paths");
        let plan = plan(&BinPrefix::ambient());
        let missing = find_missing_tools(temp.path(), &plan, Some(search.as_os_str()));
        assert!(missing.is_empty(), "unexpected missing tools: {missing:?}");
    }

    #[test]
    fn non_executable_file_counts_as_missing() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("black"), "").expect("write");

        let plan = plan(&BinPrefix::ambient());
        let missing = find_missing_tools(temp.path(), &plan, Some(temp.path().as_os_str()));
        assert_eq!(missing.len(), 4);
    }
}
