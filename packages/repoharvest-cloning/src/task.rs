use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{CloneError, ClonerError, Result};
use crate::git::CloneBackend;
use crate::repository::{ClonePair, RepoId};

/// Per-task state. Terminal states only; there is no retry transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskState {
    Pending {
        queued_at: DateTime<Utc>,
    },
    Running {
        started_at: DateTime<Utc>,
    },
    Completed {
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        duration_ms: u64,
    },
    Failed {
        started_at: DateTime<Utc>,
        failed_at: DateTime<Utc>,
        error: CloneError,
    },
}

impl TaskState {
    pub fn state_name(&self) -> &'static str {
        match self {
            TaskState::Pending { .. } => "pending",
            TaskState::Running { .. } => "running",
            TaskState::Completed { .. } => "completed",
            TaskState::Failed { .. } => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed { .. } | TaskState::Failed { .. }
        )
    }
}

/// Result of one clone task, consumed by the dispatcher for aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloneOutcome {
    pub repository: RepoId,
    pub source_url: String,
    pub destination: PathBuf,
    pub duration_ms: u64,
    /// `None` on success.
    pub error: Option<CloneError>,
}

impl CloneOutcome {
    pub fn success(&self) -> bool {
        self.error.is_none()
    }
}

/// One unit of work bound to a single (source, destination) pair.
///
/// Executes exactly one clone operation and converts any failure into a
/// reportable [`CloneOutcome`] rather than letting it escape into the
/// worker pool.
#[derive(Debug)]
pub struct CloneTask {
    pair: ClonePair,
    state: TaskState,
}

impl CloneTask {
    pub fn new(pair: ClonePair) -> Self {
        Self {
            pair,
            state: TaskState::Pending {
                queued_at: Utc::now(),
            },
        }
    }

    pub fn pair(&self) -> &ClonePair {
        &self.pair
    }

    pub fn state(&self) -> &TaskState {
        &self.state
    }

    /// Transition: PENDING → RUNNING
    pub fn start(&mut self) -> Result<()> {
        match &self.state {
            TaskState::Pending { .. } => {
                self.state = TaskState::Running {
                    started_at: Utc::now(),
                };
                Ok(())
            }
            _ => Err(ClonerError::InvalidStateTransition {
                from: self.state.state_name().to_string(),
                to: "running".to_string(),
            }),
        }
    }

    /// Transition: RUNNING → COMPLETED
    pub fn complete(&mut self) -> Result<()> {
        match &self.state {
            TaskState::Running { started_at } => {
                let now = Utc::now();
                let duration_ms = (now - *started_at).num_milliseconds().max(0) as u64;
                self.state = TaskState::Completed {
                    started_at: *started_at,
                    finished_at: now,
                    duration_ms,
                };
                Ok(())
            }
            _ => Err(ClonerError::InvalidStateTransition {
                from: self.state.state_name().to_string(),
                to: "completed".to_string(),
            }),
        }
    }

    /// Transition: RUNNING → FAILED
    pub fn fail(&mut self, error: CloneError) -> Result<()> {
        match &self.state {
            TaskState::Running { started_at } => {
                self.state = TaskState::Failed {
                    started_at: *started_at,
                    failed_at: Utc::now(),
                    error,
                };
                Ok(())
            }
            _ => Err(ClonerError::InvalidStateTransition {
                from: self.state.state_name().to_string(),
                to: "failed".to_string(),
            }),
        }
    }

    /// Execute the clone and report the outcome.
    ///
    /// Never lets a failure escape: backend errors become failed outcomes,
    /// and a panic inside the backend is caught and reported as an
    /// `unknown` failure instead of tearing down the worker pool.
    pub fn run(mut self, backend: &dyn CloneBackend) -> CloneOutcome {
        let timer = Instant::now();

        let mut error = match self.start() {
            Ok(()) => {
                let result = catch_unwind(AssertUnwindSafe(|| {
                    backend.clone_repository(&self.pair.source_url, &self.pair.destination)
                }));
                match result {
                    Ok(Ok(())) => None,
                    Ok(Err(e)) => Some(e),
                    Err(panic) => Some(CloneError::unknown(panic_message(panic.as_ref()))),
                }
            }
            Err(e) => Some(CloneError::unknown(e.to_string())),
        };

        let transition = match &error {
            None => self.complete(),
            Some(e) => self.fail(e.clone()),
        };
        if let Err(e) = transition {
            error = Some(CloneError::unknown(e.to_string()));
        }

        match &error {
            None => info!("{} cloned", self.pair.source_url),
            Some(e) => error!("{} failed: {}", self.pair.source_url, e),
        }

        CloneOutcome {
            repository: self.pair.repository,
            source_url: self.pair.source_url,
            destination: self.pair.destination,
            duration_ms: timer.elapsed().as_millis() as u64,
            error,
        }
    }

    /// Fail the task without invoking the backend.
    ///
    /// Used by the dispatcher for tasks whose destination is already
    /// claimed by an earlier task in the same batch. Drives the state
    /// machine to its Failed terminal state so the task lifecycle holds.
    pub fn reject(mut self, error: CloneError) -> CloneOutcome {
        let error = match self.start().and_then(|()| self.fail(error.clone())) {
            Ok(()) => error,
            Err(e) => CloneError::unknown(e.to_string()),
        };

        error!("{} failed: {}", self.pair.source_url, error);

        CloneOutcome {
            repository: self.pair.repository,
            source_url: self.pair.source_url,
            destination: self.pair.destination,
            duration_ms: 0,
            error: Some(error),
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("clone task panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("clone task panicked: {}", s)
    } else {
        "clone task panicked".to_string()
    }
}
