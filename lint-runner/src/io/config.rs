//! Lint runner configuration stored in `lint-runner.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::types::{TargetDirs, ToolSet};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "lint-runner.toml";

/// Lint runner configuration (TOML).
///
/// Every field is optional. A missing file, or a file with missing fields,
/// yields the defaults: project `databases` with tests under `tests`, tools
/// from `venv/bin/` when that directory exists.
///
/// Only names and paths are configurable. Step order, fixed arguments and
/// which trees each step targets are not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LintConfig {
    /// Project name handed to the import sorter to tell first-party imports apart.
    pub project: String,

    pub source_dir: PathBuf,

    pub test_dir: PathBuf,

    /// Isolated environment directory. Its existence alone selects it.
    pub env_dir: PathBuf,

    /// Executable directory inside `env_dir`.
    pub env_bin_dir: PathBuf,

    /// Kill a step after this many seconds. Unset means wait indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_timeout_secs: Option<u64>,

    pub tools: ToolSet,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            project: "databases".to_string(),
            source_dir: PathBuf::from("databases"),
            test_dir: PathBuf::from("tests"),
            env_dir: PathBuf::from("venv"),
            env_bin_dir: PathBuf::from("bin"),
            step_timeout_secs: None,
            tools: ToolSet::default(),
        }
    }
}

impl LintConfig {
    pub fn validate(&self) -> Result<()> {
        if self.project.trim().is_empty() {
            return Err(anyhow!("project must be non-empty"));
        }
        for (label, path) in [
            ("source_dir", &self.source_dir),
            ("test_dir", &self.test_dir),
            ("env_dir", &self.env_dir),
            ("env_bin_dir", &self.env_bin_dir),
        ] {
            if path.as_os_str().is_empty() {
                return Err(anyhow!("{label} must be non-empty"));
            }
        }
        for (label, tool) in [
            ("tools.prune", &self.tools.prune),
            ("tools.sort", &self.tools.sort),
            ("tools.format", &self.tools.format),
            ("tools.typecheck", &self.tools.typecheck),
        ] {
            if tool.trim().is_empty() {
                return Err(anyhow!("{label} must be non-empty"));
            }
        }
        if self.step_timeout_secs == Some(0) {
            return Err(anyhow!("step_timeout_secs must be > 0"));
        }
        Ok(())
    }

    pub fn targets(&self) -> TargetDirs {
        TargetDirs::new(&self.source_dir, &self.test_dir)
    }

    pub fn step_timeout(&self) -> Option<Duration> {
        self.step_timeout_secs.map(Duration::from_secs)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `LintConfig::default()`.
pub fn load_config(path: &Path) -> Result<LintConfig> {
    if !path.exists() {
        let cfg = LintConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: LintConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &LintConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, LintConfig::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE_NAME);
        let cfg = LintConfig {
            step_timeout_secs: Some(600),
            ..LintConfig::default()
        };
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "project = \"app\"\nsource_dir = \"app\"\n\n[tools]\nformat = \"ruff-format\"\n",
        )
        .expect("write");

        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.project, "app");
        assert_eq!(cfg.source_dir, PathBuf::from("app"));
        assert_eq!(cfg.test_dir, PathBuf::from("tests"));
        assert_eq!(cfg.tools.format, "ruff-format");
        assert_eq!(cfg.tools.typecheck, "mypy");
        assert_eq!(cfg.step_timeout(), None);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "step_timeout_secs = 0\n").expect("write");

        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("step_timeout_secs must be > 0"));
    }

    #[test]
    fn empty_tool_name_is_rejected() {
        let cfg = LintConfig {
            tools: ToolSet {
                sort: " ".to_string(),
                ..ToolSet::default()
            },
            ..LintConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("tools.sort"));
    }
}
