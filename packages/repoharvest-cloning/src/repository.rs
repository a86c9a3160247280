use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{CloneConfig, DOT_GIT};

/// Opaque repository identifier, e.g. `owner/name`. Used only to derive a
/// source URL and a destination path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoId(String);

impl RepoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RepoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RepoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One (source URL, destination path) pair, resolved deterministically from
/// a [`RepoId`] at dispatch time. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClonePair {
    pub repository: RepoId,
    pub source_url: String,
    pub destination: PathBuf,
}

impl ClonePair {
    /// Resolve an identifier under the given configuration.
    ///
    /// `owner/name` becomes `<remote_host>owner/name.git` and
    /// `<base_dir>/owner/name` (the identifier's separator structure is
    /// preserved in the destination).
    pub fn resolve(repository: RepoId, config: &CloneConfig) -> Self {
        let source_url = format!("{}{}{}", config.remote_host, repository, DOT_GIT);
        let destination = config.base_dir.join(repository.as_str());
        Self {
            repository,
            source_url,
            destination,
        }
    }
}
