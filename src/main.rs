mod cli;
mod config;
mod context;
mod error;
mod git;
mod hash;
// Client-side modules: compiled into the crate for the consuming UI and its
// tests, not called by the server itself.
#[allow(dead_code)]
mod patch;
mod quiz;
#[allow(dead_code)]
mod reconcile;
mod server;
mod watcher;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::load_config;
use crate::context::{AppContext, RepoContext};
use crate::git::GitCli;
use crate::quiz::QuizStore;
use crate::watcher::RepoWatcher;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config();

    // CLI wins over environment, environment over config file
    let port = cli.port.unwrap_or(config.port);
    let settle = Duration::from_millis(cli.debounce_ms.unwrap_or(config.debounce_ms));
    let repo_arg = cli
        .repo
        .or_else(|| env::var_os("DIFFGATE_REPO_PATH").map(PathBuf::from))
        .or(config.repo_path);

    // The notify handle must outlive the server for the watch to persist.
    let mut _fs_watcher = None;

    let repo = match repo_arg {
        Some(path) => match git::discover_workdir(&path) {
            Ok(workdir) => {
                let gitcli = GitCli::new(&workdir);
                let repo_watcher = RepoWatcher::new(workdir, gitcli.clone(), settle);
                _fs_watcher = Some(repo_watcher.start()?);
                info!(
                    "watching repository at {}",
                    repo_watcher.repo_path().display()
                );
                Some(RepoContext {
                    quiz: QuizStore::new(repo_watcher.repo_path()),
                    git: gitcli,
                    watcher: repo_watcher,
                })
            }
            Err(e) => {
                error!("cannot watch {}: {e:#}", path.display());
                None
            }
        },
        None => {
            error!("no repository configured; diff and git endpoints will answer 503");
            None
        }
    };

    let ctx = Arc::new(AppContext { repo });
    server::run(ctx, port).await
}
