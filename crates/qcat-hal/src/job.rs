//! Task lifecycle types.
//!
//! Remote tasks move through a small state machine:
//!
//! ```text
//!   create_task() ──→ Queued ──→ Running ──→ Completed
//!                       │           │
//!                       │           ├──→ Failed(reason)
//!                       │           │
//!                       └───────────┴──→ Cancelled
//! ```
//!
//! Terminal states are permanent; results are only fetched after
//! `Completed`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::kind::BackendKind;

/// Opaque handle for a submitted task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    /// Create a job ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Status of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Waiting in a queue.
    Queued,
    /// Currently running.
    Running,
    /// Completed successfully.
    Completed,
    /// Failed with a reason.
    Failed(String),
    /// Cancelled.
    Cancelled,
}

impl JobStatus {
    /// Whether this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed(_) | JobStatus::Cancelled
        )
    }

    /// Whether the task is still queued or running.
    pub fn is_pending(&self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::Running)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "Queued"),
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Completed => write!(f, "Completed"),
            JobStatus::Failed(msg) => write!(f, "Failed: {msg}"),
            JobStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// A task with its lifecycle timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// The task handle.
    pub id: JobId,
    /// Current status.
    pub status: JobStatus,
    /// Number of repetitions requested.
    pub shots: u32,
    /// Backend the task was submitted to.
    pub backend: BackendKind,
    /// Time the task was created.
    pub created_at: DateTime<Utc>,
    /// Time the task was first seen running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Time the task reached a terminal state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    /// Number of status checks performed.
    pub polls: u32,
}

impl Job {
    /// Record a freshly created task.
    pub fn new(id: impl Into<JobId>, backend: BackendKind, shots: u32) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Queued,
            shots,
            backend,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
            polls: 0,
        }
    }

    /// Update the status, stamping start and finish times.
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = status;
        if !matches!(self.status, JobStatus::Queued) && self.started_at.is_none() {
            self.started_at = Some(Utc::now());
        }
        if self.status.is_terminal() && self.finished_at.is_none() {
            self.finished_at = Some(Utc::now());
        }
        self
    }
}
