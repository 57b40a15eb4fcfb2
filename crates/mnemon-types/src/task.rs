//! Tracked background task types.
//!
//! Every write-heavy operation (memory ingest, clear, action recording) is
//! executed off the request path as a tracked task. A task is created in
//! `Running` state and transitions at most once into a terminal state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a tracked task.
///
/// `Completed` and `Failed` are terminal: no further transitions are
/// permitted once either is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    /// Whether this status is terminal (`Completed` or `Failed`).
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::Running)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "running" => Ok(TaskStatus::Running),
            "completed" => Ok(TaskStatus::Completed),
            "failed" => Ok(TaskStatus::Failed),
            other => Err(format!("invalid task status: '{other}'")),
        }
    }
}

/// A tracked unit of asynchronous work.
///
/// Invariants:
/// - `result` is present iff `status == Completed`.
/// - `error` is present iff `status == Failed`.
/// - `completed_at` is present iff the status is terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Unique identifier handed back at submission time. Immutable.
    pub submit_id: Uuid,
    pub status: TaskStatus,
    /// Opaque success payload, set at the `Completed` transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Failure description, set at the `Failed` transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskRecord {
    /// Create a fresh record in `Running` state with `created_at = now`.
    pub fn new(submit_id: Uuid) -> Self {
        Self {
            submit_id,
            status: TaskStatus::Running,
            result: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

/// Aggregate counts over the task registry.
///
/// `completed + failed + running == total` at any consistent snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: u64,
    pub completed: u64,
    pub failed: u64,
    pub running: u64,
    /// Number of task records currently held by the registry.
    pub storage_size: u64,
}
