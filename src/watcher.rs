use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::git::GitCli;
use crate::hash;

/// Directories whose churn never reflects working-copy changes worth
/// refreshing for. Dot-directories are filtered separately.
const IGNORED_DIRS: &[&str] = &["node_modules", "target", "dist", "build"];

/// The two diff reads the watcher needs, as a seam so tests can drive the
/// refresh loop with a fake source and a paused clock.
pub trait DiffSource: Send + Sync + 'static {
    fn unstaged_diff(&self) -> impl Future<Output = Result<String>> + Send;
    fn staged_diff(&self) -> impl Future<Output = Result<String>> + Send;
}

impl DiffSource for GitCli {
    async fn unstaged_diff(&self) -> Result<String> {
        GitCli::diff_unstaged(self).await
    }

    async fn staged_diff(&self) -> Result<String> {
        GitCli::diff_staged(self).await
    }
}

/// The current pair of unstaged/staged patches, replaced as one atomic unit.
#[derive(Debug, Clone)]
pub struct DiffSnapshot {
    pub unstaged_patch: String,
    pub staged_patch: String,
    pub updated_at: DateTime<Utc>,
}

impl DiffSnapshot {
    fn empty() -> Self {
        Self {
            unstaged_patch: String::new(),
            staged_patch: String::new(),
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    /// The fixed combined representation this snapshot fingerprints to.
    pub fn combined(&self) -> String {
        hash::combined_diff(&self.unstaged_patch, &self.staged_patch)
    }
}

/// Owns the diff snapshot for one repository and keeps it current: filesystem
/// events are debounced into refreshes, confirmed writes trigger immediate
/// ones. Only `refresh` writes the snapshot; everything else reads.
pub struct RepoWatcher<S: DiffSource> {
    repo_path: PathBuf,
    source: S,
    settle: Duration,
    snapshot: RwLock<DiffSnapshot>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<S: DiffSource> RepoWatcher<S> {
    pub fn new(repo_path: PathBuf, source: S, settle: Duration) -> Arc<Self> {
        Arc::new(Self {
            repo_path,
            source,
            settle,
            snapshot: RwLock::new(DiffSnapshot::empty()),
            pending: Mutex::new(None),
        })
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    pub async fn latest(&self) -> DiffSnapshot {
        self.snapshot.read().await.clone()
    }

    /// Recompute the snapshot from both diff reads, run concurrently. The
    /// snapshot is replaced only when both reads succeed; on any failure the
    /// previous snapshot is retained and the error is logged. Overlapping
    /// refreshes are not serialized: whichever finishes last wins.
    pub async fn refresh(&self) {
        let (unstaged, staged) =
            tokio::join!(self.source.unstaged_diff(), self.source.staged_diff());

        match (unstaged, staged) {
            (Ok(unstaged_patch), Ok(staged_patch)) => {
                let mut snapshot = self.snapshot.write().await;
                *snapshot = DiffSnapshot {
                    unstaged_patch,
                    staged_patch,
                    updated_at: Utc::now(),
                };
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("diff refresh failed, keeping previous snapshot: {e:#}");
            }
        }
    }

    /// Debounce entry point for filesystem events: cancels any pending settle
    /// timer and starts a new one. Latest event wins, fixed settle delay.
    pub async fn schedule_refresh(self: &Arc<Self>) {
        let mut pending = self.pending.lock().await;
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let watcher = Arc::clone(self);
        let settle = self.settle;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(settle).await;
            watcher.refresh().await;
        }));
    }

    /// Immediate refresh after a confirmed write (stage/unstage/commit/stash)
    /// so callers are not stuck waiting out the settle window.
    pub async fn trigger_refresh(&self) {
        self.refresh().await;
    }

    /// Perform the initial refresh and start watching the repository root.
    /// The returned notify handle must stay alive for the watch to persist.
    pub fn start(self: &Arc<Self>) -> Result<RecommendedWatcher> {
        let (tx, mut rx) = mpsc::unbounded_channel::<notify::Event>();

        let mut fs_watcher =
            notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
                if let Ok(event) = res {
                    let _ = tx.send(event);
                }
            })?;
        fs_watcher.watch(&self.repo_path, RecursiveMode::Recursive)?;

        let watcher = Arc::clone(self);
        tokio::spawn(async move {
            watcher.refresh().await;
            while let Some(event) = rx.recv().await {
                if !event.paths.is_empty()
                    && event
                        .paths
                        .iter()
                        .all(|p| is_ignored(&watcher.repo_path, p))
                {
                    debug!("ignoring filesystem event: {:?}", event.paths);
                    continue;
                }
                watcher.schedule_refresh().await;
            }
        });

        Ok(fs_watcher)
    }
}

/// Dotfiles, build output and dependency directories generate churn from
/// editors and tooling that must not cause refresh storms.
fn is_ignored(root: &Path, path: &Path) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components().any(|c| {
        let name = c.as_os_str().to_string_lossy();
        name.starts_with('.') || IGNORED_DIRS.contains(&name.as_ref())
    })
}
