use rayon::prelude::*;

use crate::error::{ClonerError, Result};
use crate::git::CloneBackend;
use crate::task::{CloneOutcome, CloneTask};

/// Fixed-size worker pool for one clone batch.
///
/// Owns exactly `workers` execution slots; at most that many clone
/// operations run concurrently. Created at the start of a batch and
/// dropped once the batch is drained, so no threads outlive the batch.
pub struct ClonePool {
    inner: rayon::ThreadPool,
    workers: usize,
}

impl ClonePool {
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(ClonerError::config("worker count must be at least 1"));
        }

        let inner = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("clone-worker-{}", i))
            .build()
            .map_err(ClonerError::pool)?;

        Ok(Self { inner, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run every task on the pool and block until all outcomes are in.
    ///
    /// This is an unconditional join: there is no timeout or cancellation,
    /// so a hung backend call stalls the batch's completion signal (it does
    /// not block other tasks from running in the remaining slots).
    /// Outcomes come back in submission order.
    pub fn run_all(&self, tasks: Vec<CloneTask>, backend: &dyn CloneBackend) -> Vec<CloneOutcome> {
        self.inner.install(|| {
            tasks
                .into_par_iter()
                .map(|task| task.run(backend))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CloneConfig;
    use crate::error::CloneError;
    use crate::repository::{ClonePair, RepoId};
    use std::path::Path;

    struct OkBackend;

    impl CloneBackend for OkBackend {
        fn clone_repository(
            &self,
            _source_url: &str,
            _destination: &Path,
        ) -> std::result::Result<(), CloneError> {
            Ok(())
        }
    }

    fn tasks(ids: &[&str]) -> Vec<CloneTask> {
        let config = CloneConfig::new(2, "/tmp/repositories");
        ids.iter()
            .map(|id| CloneTask::new(ClonePair::resolve(RepoId::from(*id), &config)))
            .collect()
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(ClonePool::new(0), Err(ClonerError::Config(_))));
    }

    #[test]
    fn test_pool_reports_worker_count() {
        let pool = ClonePool::new(3).unwrap();
        assert_eq!(pool.workers(), 3);
    }

    #[test]
    fn test_run_all_preserves_submission_order() {
        let pool = ClonePool::new(2).unwrap();
        let outcomes = pool.run_all(tasks(&["a/b", "c/d", "e/f"]), &OkBackend);

        let ids: Vec<_> = outcomes.iter().map(|o| o.repository.as_str()).collect();
        assert_eq!(ids, vec!["a/b", "c/d", "e/f"]);
    }

    #[test]
    fn test_run_all_empty() {
        let pool = ClonePool::new(1).unwrap();
        let outcomes = pool.run_all(Vec::new(), &OkBackend);
        assert!(outcomes.is_empty());
    }
}
