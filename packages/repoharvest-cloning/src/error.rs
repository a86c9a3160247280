use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClonerError>;

/// Batch-level failures. Raised before any clone task starts; per-task
/// failures are reported as [`CloneError`] data instead.
#[derive(Error, Debug)]
pub enum ClonerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Worker pool error: {0}")]
    Pool(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ClonerError {
    pub fn config<E: std::fmt::Display>(e: E) -> Self {
        Self::Config(e.to_string())
    }

    pub fn pool<E: std::fmt::Display>(e: E) -> Self {
        Self::Pool(e.to_string())
    }
}

/// Why a single clone operation failed. Recovered locally: converted into
/// a failed outcome and never propagated across the task boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct CloneError {
    pub kind: CloneErrorKind,
    pub message: String,
}

impl CloneError {
    pub fn new(kind: CloneErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Unclassified failure (e.g. a panic inside a clone task).
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(CloneErrorKind::Unknown, message)
    }
}

impl From<git2::Error> for CloneError {
    fn from(e: git2::Error) -> Self {
        use git2::{ErrorClass, ErrorCode};

        // Code takes precedence: an auth failure over HTTP carries the
        // Http class but the Auth code.
        let kind = match (e.class(), e.code()) {
            (_, ErrorCode::Auth) | (_, ErrorCode::Certificate) => CloneErrorKind::Authentication,
            (_, ErrorCode::NotFound) => CloneErrorKind::NotFound,
            (_, ErrorCode::Exists) => CloneErrorKind::DestinationExists,
            (ErrorClass::Net, _) | (ErrorClass::Http, _) | (ErrorClass::Ssh, _) => {
                CloneErrorKind::Network
            }
            (ErrorClass::Os, _) | (ErrorClass::Filesystem, _) => CloneErrorKind::Filesystem,
            _ => CloneErrorKind::Unknown,
        };

        Self::new(kind, e.message())
    }
}

/// Failure category for a clone operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloneErrorKind {
    /// Network-level failure (DNS, connection, transport)
    Network,
    /// Remote rejected credentials or certificate
    Authentication,
    /// Remote repository does not exist
    NotFound,
    /// Destination path already occupied
    DestinationExists,
    /// Local filesystem failure (permissions, disk full)
    Filesystem,
    /// Anything libgit2 or the task could not classify
    Unknown,
}

impl CloneErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloneErrorKind::Network => "network",
            CloneErrorKind::Authentication => "authentication",
            CloneErrorKind::NotFound => "not_found",
            CloneErrorKind::DestinationExists => "destination_exists",
            CloneErrorKind::Filesystem => "filesystem",
            CloneErrorKind::Unknown => "unknown",
        }
    }

    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "network" => Ok(CloneErrorKind::Network),
            "authentication" => Ok(CloneErrorKind::Authentication),
            "not_found" => Ok(CloneErrorKind::NotFound),
            "destination_exists" => Ok(CloneErrorKind::DestinationExists),
            "filesystem" => Ok(CloneErrorKind::Filesystem),
            "unknown" => Ok(CloneErrorKind::Unknown),
            _ => Err(ClonerError::config(format!(
                "Invalid clone error kind: {}",
                s
            ))),
        }
    }
}

impl std::fmt::Display for CloneErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
