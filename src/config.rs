use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_DEBOUNCE_MS: u64 = 150;

#[derive(Debug, Clone)]
pub struct DiffgateConfig {
    pub port: u16,
    pub debounce_ms: u64,
    pub repo_path: Option<PathBuf>,
}

impl Default for DiffgateConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            repo_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    debounce_ms: Option<u64>,
    #[serde(default)]
    repo_path: Option<PathBuf>,
}

fn config_path() -> PathBuf {
    let mut path = dirs_home().unwrap_or_else(|| PathBuf::from("."));
    path.push(".config");
    path.push("diffgate");
    path.push("config.toml");
    path
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Load config from `~/.config/diffgate/config.toml`. A missing or
/// malformed file falls back to defaults; CLI flags override whatever was
/// loaded.
pub fn load_config() -> DiffgateConfig {
    let path = config_path();

    let contents = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => return DiffgateConfig::default(),
    };

    let file: ConfigFile = match toml::from_str(&contents) {
        Ok(f) => f,
        Err(_) => return DiffgateConfig::default(),
    };

    DiffgateConfig {
        port: file.port.unwrap_or(DEFAULT_PORT),
        debounce_ms: file.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS),
        repo_path: file.repo_path,
    }
}
