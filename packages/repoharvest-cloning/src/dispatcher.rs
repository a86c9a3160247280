use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::CloneConfig;
use crate::error::{CloneError, CloneErrorKind, Result};
use crate::git::{CloneBackend, Git2Backend};
use crate::pool::ClonePool;
use crate::repository::{ClonePair, RepoId};
use crate::task::{CloneOutcome, CloneTask};

/// Aggregated result of one batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub outcomes: Vec<CloneOutcome>,
    pub succeeded: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

/// Runs a set of independent clone operations under a concurrency cap.
///
/// The dispatcher resolves each identifier into a clone pair, hands one
/// task per pair to a freshly built [`ClonePool`], blocks until every task
/// has produced an outcome, and aggregates the results. Individual task
/// failures never fail the batch; only a bad configuration does, before
/// any task starts.
pub struct BatchDispatcher {
    config: CloneConfig,
    backend: Arc<dyn CloneBackend>,
}

impl BatchDispatcher {
    /// Dispatcher with the default libgit2 backend.
    pub fn new(config: CloneConfig) -> Self {
        Self::with_backend(config, Arc::new(Git2Backend::new()))
    }

    /// Dispatcher with an injected clone backend.
    pub fn with_backend(config: CloneConfig, backend: Arc<dyn CloneBackend>) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &CloneConfig {
        &self.config
    }

    /// Clone every repository in `repositories`, returning one outcome per
    /// identifier in input order.
    ///
    /// Destination paths must be disjoint within a batch: the first task to
    /// claim a destination runs, and any later task resolving to the same
    /// path is failed at dispatch with `DestinationExists`, before reaching
    /// the backend. Two tasks therefore never write into one directory
    /// concurrently. Duplicate identifiers still yield one outcome each.
    ///
    /// Blocks until the batch is fully drained. The pool is scoped to this
    /// call; after return it holds no further resources.
    pub fn run(&self, repositories: &[RepoId]) -> Result<BatchReport> {
        self.config.validate()?;

        let batch_id = Uuid::new_v4();
        let timer = Instant::now();

        if repositories.is_empty() {
            info!("Batch {} has no repositories to clone", batch_id);
            return Ok(BatchReport {
                batch_id,
                outcomes: Vec::new(),
                succeeded: 0,
                failed: 0,
                duration_ms: 0,
            });
        }

        info!(
            "Starting batch {} - {} repositories, {} workers",
            batch_id,
            repositories.len(),
            self.config.workers
        );

        // One slot per identifier, in input order. Tasks whose destination
        // is already claimed by an earlier task fail here instead of racing
        // the earlier clone for the same directory.
        let mut claimed: HashSet<PathBuf> = HashSet::with_capacity(repositories.len());
        let mut slots: Vec<Option<CloneOutcome>> = Vec::with_capacity(repositories.len());
        let mut queued_positions: Vec<usize> = Vec::with_capacity(repositories.len());
        let mut tasks: Vec<CloneTask> = Vec::with_capacity(repositories.len());

        for (position, id) in repositories.iter().enumerate() {
            let task = CloneTask::new(ClonePair::resolve(id.clone(), &self.config));
            if claimed.insert(task.pair().destination.clone()) {
                queued_positions.push(position);
                tasks.push(task);
                slots.push(None);
            } else {
                let message = format!(
                    "destination '{}' already claimed by an earlier task in this batch",
                    task.pair().destination.display()
                );
                slots.push(Some(task.reject(CloneError::new(
                    CloneErrorKind::DestinationExists,
                    message,
                ))));
            }
        }

        let pool = ClonePool::new(self.config.workers)?;
        let executed = pool.run_all(tasks, self.backend.as_ref());
        for (position, outcome) in queued_positions.into_iter().zip(executed) {
            slots[position] = Some(outcome);
        }
        let outcomes: Vec<CloneOutcome> = slots.into_iter().flatten().collect();

        let succeeded = outcomes.iter().filter(|o| o.success()).count();
        let failed = outcomes.len() - succeeded;
        let duration_ms = timer.elapsed().as_millis() as u64;

        if failed > 0 {
            warn!(
                "Batch {} completed with {} failures ({} cloned) in {}ms",
                batch_id, failed, succeeded, duration_ms
            );
        } else {
            info!(
                "Batch {} completed - {} repositories cloned in {}ms",
                batch_id, succeeded, duration_ms
            );
        }

        Ok(BatchReport {
            batch_id,
            outcomes,
            succeeded,
            failed,
            duration_ms,
        })
    }
}

/// Convenience entry point using the default libgit2 backend.
pub fn run_batch(repositories: &[RepoId], config: &CloneConfig) -> Result<Vec<CloneOutcome>> {
    BatchDispatcher::new(config.clone())
        .run(repositories)
        .map(|report| report.outcomes)
}
