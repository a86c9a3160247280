use std::path::Path;

use git2::build::RepoBuilder;

use crate::error::CloneError;

/// The clone collaborator: performs the actual network transfer and local
/// materialization of one repository. Blocking from the task's perspective.
///
/// Implementations must be safe to invoke from multiple worker threads at
/// once; destination paths are never shared between concurrent calls.
pub trait CloneBackend: Send + Sync {
    fn clone_repository(
        &self,
        source_url: &str,
        destination: &Path,
    ) -> std::result::Result<(), CloneError>;
}

/// Default backend over libgit2.
///
/// No retries and no cleanup of a partially written destination after a
/// failure; rollback is the caller's responsibility.
#[derive(Debug, Default)]
pub struct Git2Backend;

impl Git2Backend {
    pub fn new() -> Self {
        Self
    }
}

impl CloneBackend for Git2Backend {
    fn clone_repository(
        &self,
        source_url: &str,
        destination: &Path,
    ) -> std::result::Result<(), CloneError> {
        RepoBuilder::new()
            .clone(source_url, destination)
            .map(|_| ())
            .map_err(CloneError::from)
    }
}
