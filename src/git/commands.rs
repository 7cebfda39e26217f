use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Thin async wrapper over the `git` binary, scoped to one working copy.
/// Read operations return raw patch text; write operations succeed or fail
/// on the command's exit status, carrying stderr in the error.
#[derive(Clone)]
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    pub fn new(workdir: &Path) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
        }
    }

    async fn run(&self, label: &str, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .await
            .with_context(|| format!("Failed to run git {label}"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("git {label} failed: {stderr}");
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Working-tree changes not yet in the index.
    pub async fn diff_unstaged(&self) -> Result<String> {
        self.run("diff", &["diff", "--no-color", "--no-ext-diff"])
            .await
    }

    /// Index changes relative to HEAD.
    pub async fn diff_staged(&self) -> Result<String> {
        self.run(
            "diff --cached",
            &["diff", "--cached", "--no-color", "--no-ext-diff"],
        )
        .await
    }

    pub async fn stage_file(&self, path: &str) -> Result<()> {
        self.run("add", &["add", "--", path]).await.map(|_| ())
    }

    pub async fn unstage_file(&self, path: &str) -> Result<()> {
        self.run("reset", &["reset", "HEAD", "--", path])
            .await
            .map(|_| ())
    }

    pub async fn commit(&self, message: &str) -> Result<()> {
        self.run("commit", &["commit", "-m", message])
            .await
            .map(|_| ())
    }

    pub async fn push(&self) -> Result<()> {
        self.run("push", &["push"]).await.map(|_| ())
    }

    pub async fn stash(&self) -> Result<()> {
        self.run("stash", &["stash"]).await.map(|_| ())
    }
}
