use std::time::Duration;

use crate::analysis::range::DEFAULT_DISPLAY_LIMIT;
use crate::git::CloneOptions;

/// Runtime settings, filled from the command line in `main`.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub clone_depth: u32,
    /// Commits read from the log.
    pub log_limit: usize,
    /// Newest commits the client may pick a range from.
    pub display_limit: usize,
    /// Commits that get a per-commit file tree. Also caps the selectable window.
    pub history_limit: usize,
    pub git_timeout: Duration,
    pub clone_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            clone_depth: 50,
            log_limit: 100,
            display_limit: DEFAULT_DISPLAY_LIMIT,
            history_limit: 50,
            git_timeout: Duration::from_secs(30),
            clone_timeout: Duration::from_secs(120),
        }
    }
}

impl Config {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn clone_options(&self) -> CloneOptions {
        CloneOptions {
            depth: self.clone_depth,
            timeout: self.clone_timeout,
        }
    }
}
