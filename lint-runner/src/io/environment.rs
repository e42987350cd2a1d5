//! Isolated environment detection.

use std::path::Path;

use tracing::debug;

use crate::core::types::ExecutionEnvironment;

/// Decide where tool binaries come from.
///
/// If `root/env_dir` is a directory, tools run from `env_dir/bin_dir`, relative
/// to `root` (the working directory the tools are spawned from). Nothing inside
/// the directory is inspected. Otherwise tools resolve through `PATH`.
pub fn detect_environment(root: &Path, env_dir: &Path, bin_dir: &Path) -> ExecutionEnvironment {
    let candidate = root.join(env_dir);
    if candidate.is_dir() {
        let prefix = env_dir.join(bin_dir);
        debug!(prefix = %prefix.display(), "isolated environment detected");
        ExecutionEnvironment::isolated(prefix)
    } else {
        debug!(env_dir = %candidate.display(), "no isolated environment, using PATH");
        ExecutionEnvironment::ambient()
    }
}
