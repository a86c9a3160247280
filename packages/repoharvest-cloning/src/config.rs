use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ClonerError, Result};

/// Default remote host prefix for resolving repository identifiers.
pub const DEFAULT_REMOTE_HOST: &str = "https://github.com/";

/// Suffix appended to every resolved source URL.
pub(crate) const DOT_GIT: &str = ".git";

/// Configuration for one clone batch. Loaded once before the batch starts;
/// never reloaded mid-batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloneConfig {
    /// Number of worker slots; at most this many clones run concurrently.
    pub workers: usize,
    /// Directory all destination paths are resolved under.
    pub base_dir: PathBuf,
    /// Remote host prefix, e.g. `https://github.com/`.
    pub remote_host: String,
}

impl Default for CloneConfig {
    fn default() -> Self {
        Self {
            workers: (num_cpus::get() * 3 / 4).max(1), // 75% of cores
            base_dir: PathBuf::from("repositories"),
            remote_host: DEFAULT_REMOTE_HOST.to_string(),
        }
    }
}

impl CloneConfig {
    pub fn new(workers: usize, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            workers,
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn with_remote_host(mut self, remote_host: impl Into<String>) -> Self {
        self.remote_host = remote_host.into();
        self
    }

    /// Validate before a batch starts. Fails fast: no task is submitted on
    /// a bad configuration.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(ClonerError::config("worker count must be at least 1"));
        }
        if self.base_dir.as_os_str().is_empty() {
            return Err(ClonerError::config("base directory must not be empty"));
        }
        if self.remote_host.is_empty() {
            return Err(ClonerError::config("remote host must not be empty"));
        }
        Ok(())
    }
}
