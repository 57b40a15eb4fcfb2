use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Errors from task registry operations.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task not found")]
    NotFound,

    /// A terminal transition was attempted on an already-terminal task.
    /// The existing terminal state is never overwritten.
    #[error("task {0} is already terminal")]
    AlreadyTerminal(Uuid),

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// Errors from profile operations.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile not found")]
    NotFound,

    /// Optimistic update rejected: stored content no longer matches the
    /// caller's `content_before`.
    #[error("profile '{pid}' was modified concurrently")]
    Conflict { pid: String },

    #[error("invalid profile request: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from action dispatch.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("invalid action type: '{0}'")]
    InvalidActionType(String),

    #[error("action record carries neither 'action_type' nor 'action'")]
    MissingTag,
}

/// Errors surfaced by the external memory engine boundary.
#[derive(Debug, Error)]
pub enum MemoryServiceError {
    #[error("memory engine request timed out")]
    Timeout,

    #[error("memory engine returned status {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("memory engine transport error: {0}")]
    Transport(String),

    #[error("invalid memory request: {0}")]
    Validation(String),
}

/// Errors from repository operations (used by trait definitions in mnemon-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}
