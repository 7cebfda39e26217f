use std::sync::Arc;

use crate::error::AppError;
use crate::git::GitCli;
use crate::quiz::QuizStore;
use crate::watcher::RepoWatcher;

/// Everything handlers need, owned by the one long-lived server instance and
/// passed by reference to every request.
pub struct AppContext {
    /// None when no repository root was configured at startup; repo-dependent
    /// endpoints answer 503 for the lifetime of the process in that case.
    pub repo: Option<RepoContext>,
}

/// Per-repository collaborators. One repository per running instance; the
/// immutable root lives on the watcher.
pub struct RepoContext {
    pub git: GitCli,
    pub watcher: Arc<RepoWatcher<GitCli>>,
    pub quiz: QuizStore,
}

impl AppContext {
    pub fn repo(&self) -> Result<&RepoContext, AppError> {
        self.repo.as_ref().ok_or(AppError::NotConfigured)
    }
}
