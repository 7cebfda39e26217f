pub mod commands;

pub use commands::GitCli;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Resolve the working directory of the repository containing `path`.
/// Rejects bare repositories, which have no working copy to watch.
pub fn discover_workdir(path: &Path) -> Result<PathBuf> {
    let repo = git2::Repository::discover(path)
        .context("Not a git repository (or any parent directory)")?;
    let workdir = repo
        .workdir()
        .context("Bare repositories are not supported")?;
    Ok(workdir.to_path_buf())
}
