use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "diffgate",
    version,
    about = "Watch a git working copy and gate commits behind quiz validation"
)]
pub struct Cli {
    /// Repository to watch (falls back to DIFFGATE_REPO_PATH, then config)
    pub repo: Option<PathBuf>,

    /// Port for the HTTP API
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Settle delay for the filesystem debounce, in milliseconds
    #[arg(long = "debounce-ms")]
    pub debounce_ms: Option<u64>,
}
