/*
 * Repoharvest Cloning - Bounded-Concurrency Batch Repository Cloner
 *
 * Clones a batch of remote repositories into a local workspace while
 * capping how many clone operations run at once.
 *
 * Architecture:
 * - Batch Dispatcher (resolves identifiers, owns the batch lifecycle)
 * - Clone Pool (fixed-size worker pool, one slot per concurrent clone)
 * - Clone Task (one repository, failures reported as data)
 * - Clone Backend (pluggable; git2 by default)
 */

// Public modules
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod git;
pub mod pool;
pub mod repository;
pub mod task;

// Re-exports
pub use config::CloneConfig;
pub use dispatcher::{run_batch, BatchDispatcher, BatchReport};
pub use error::{CloneError, CloneErrorKind, ClonerError, Result};
pub use git::{CloneBackend, Git2Backend};
pub use pool::ClonePool;
pub use repository::{ClonePair, RepoId};
pub use task::{CloneOutcome, CloneTask, TaskState};
