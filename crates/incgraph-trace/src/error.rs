use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TraceError>;

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("a trace of '{in_flight}' is already in progress")]
    Busy { in_flight: String },

    #[error("'{file}' cannot be traced: {reason}")]
    NotTraceable { file: String, reason: String },

    #[error("cannot compile with include tracing: {0}")]
    TracingFlag(String),

    #[error("compilation of '{file}' failed: {reason}")]
    CompileFailed { file: String, reason: String },

    #[error("malformed include trace at line {line}: {message}")]
    MalformedTrace { line: usize, message: String },

    #[error("invalid config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`TraceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Another trace holds the session. Nothing was mutated.
    ResourceBusy,
    /// The build host refused before any parsing. Nothing was mutated.
    Precondition,
    /// The transcript broke the parser. Edges added before the failure remain.
    Malformed,
    /// Config or filesystem trouble outside the trace itself.
    Environment,
}

impl TraceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TraceError::Busy { .. } => ErrorKind::ResourceBusy,
            TraceError::NotTraceable { .. }
            | TraceError::TracingFlag(_)
            | TraceError::CompileFailed { .. } => ErrorKind::Precondition,
            TraceError::MalformedTrace { .. } => ErrorKind::Malformed,
            TraceError::Config { .. } | TraceError::Io(_) => ErrorKind::Environment,
        }
    }
}
