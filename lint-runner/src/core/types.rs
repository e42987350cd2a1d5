use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The two trees every step operates on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetDirs {
    pub source: PathBuf,
    pub tests: PathBuf,
}

impl TargetDirs {
    pub fn new(source: impl Into<PathBuf>, tests: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            tests: tests.into(),
        }
    }
}

/// Directory prepended to every tool name, or none to resolve through `PATH`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BinPrefix(Option<PathBuf>);

impl BinPrefix {
    pub fn ambient() -> Self {
        Self(None)
    }

    pub fn isolated(dir: impl Into<PathBuf>) -> Self {
        Self(Some(dir.into()))
    }

    pub fn dir(&self) -> Option<&Path> {
        self.0.as_deref()
    }

    /// Resolve a bare tool name against this prefix.
    pub fn resolve(&self, tool: &str) -> PathBuf {
        match &self.0 {
            Some(dir) => dir.join(tool),
            None => PathBuf::from(tool),
        }
    }
}

/// Where tool binaries come from for this run. Computed once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionEnvironment {
    pub isolated_environment_detected: bool,
    pub prefix: BinPrefix,
}

impl ExecutionEnvironment {
    pub fn ambient() -> Self {
        Self {
            isolated_environment_detected: false,
            prefix: BinPrefix::ambient(),
        }
    }

    pub fn isolated(bin_dir: impl Into<PathBuf>) -> Self {
        Self {
            isolated_environment_detected: true,
            prefix: BinPrefix::isolated(bin_dir),
        }
    }
}

/// Executable names for the four steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToolSet {
    /// Removes unused imports and names in place.
    pub prune: String,
    /// Groups and orders imports.
    pub sort: String,
    pub format: String,
    pub typecheck: String,
}

impl Default for ToolSet {
    fn default() -> Self {
        Self {
            prune: "autoflake".to_string(),
            sort: "isort".to_string(),
            format: "black".to_string(),
            typecheck: "mypy".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambient_prefix_leaves_tool_name_bare() {
        assert_eq!(BinPrefix::ambient().resolve("black"), PathBuf::from("black"));
    }

    #[test]
    fn isolated_prefix_joins_bin_dir() {
        let prefix = BinPrefix::isolated("venv/bin");
        assert_eq!(prefix.resolve("mypy"), PathBuf::from("venv/bin/mypy"));
        assert_eq!(prefix.dir(), Some(Path::new("venv/bin")));
    }
}
