//! Task records and the task status state machine.
//!
//! Status transitions are forward-only: `pending -> in_progress ->
//! {completed | failed}`, or `pending -> skipped`. All three of `completed`,
//! `failed`, and `skipped` are terminal and unreachable-from.

use crate::models::workflow::WorkflowId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Opaque task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Task state definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Initial state when the task is created
    Pending,
    /// Task is currently being executed
    InProgress,
    /// Task completed successfully
    Completed,
    /// Task was deliberately skipped before it ever ran
    Skipped,
    /// Task failed with an error
    Failed,
}

impl TaskStatus {
    /// Check if this is a terminal state (no further transitions allowed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Skipped | Self::Failed)
    }

    /// Check if this state satisfies a downstream dependency.
    ///
    /// `failed` is terminal but does not satisfy; a dependent of a failed
    /// task never becomes ready.
    pub fn satisfies_dependency(&self) -> bool {
        matches!(self, Self::Completed | Self::Skipped)
    }

    /// Whether the state machine permits a transition to `next`.
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, TaskStatus::InProgress)
                | (Self::Pending, TaskStatus::Skipped)
                | (Self::InProgress, TaskStatus::Completed)
                | (Self::InProgress, TaskStatus::Failed)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
            Self::Skipped => write!(f, "skipped"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "skipped" => Ok(Self::Skipped),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Invalid task status: {s}")),
        }
    }
}

/// Back-reference recorded on a task spawned by delegation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelegationLink {
    /// The task whose execution spawned this one.
    pub parent_task_id: TaskId,
    /// Responsible party the work was handed off from.
    pub delegated_from: String,
    /// Action/payload the delegating party attached for the child's
    /// executor. Travels with the handoff; `results` stays execution output.
    pub metadata: Option<serde_json::Value>,
}

/// Forward record written on a parent task once it delegates.
///
/// Best-effort bookkeeping; the child's own [`DelegationLink`] is the primary
/// record of the handoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationHandoff {
    /// The task created by the handoff.
    pub child_task_id: TaskId,
    /// Responsible party the work was handed off to.
    pub delegated_to: String,
}

/// The unit of schedulable work within a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub workflow_id: WorkflowId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    /// Ordering key among otherwise-equal tasks. Fractional so that delegation
    /// can insert "just after" a parent without renumbering siblings.
    pub position: f64,
    /// Task ids that must reach a satisfying terminal state before this task
    /// may run. First-class and typed; an empty set means no gating.
    pub dependencies: HashSet<TaskId>,
    /// Who executes the task.
    pub responsible_party: String,
    pub delegation: Option<DelegationLink>,
    pub delegated_to: Option<DelegationHandoff>,
    pub results: Option<serde_json::Value>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Fields supplied when creating a task. Status starts `pending`; timestamps
/// are owned by the store and coordinator.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub workflow_id: WorkflowId,
    pub title: String,
    pub description: String,
    pub position: f64,
    pub dependencies: HashSet<TaskId>,
    pub responsible_party: String,
    pub delegation: Option<DelegationLink>,
}

impl NewTask {
    /// Minimal constructor for an undelegated task with no dependencies.
    pub fn new(
        workflow_id: WorkflowId,
        title: impl Into<String>,
        responsible_party: impl Into<String>,
        position: f64,
    ) -> Self {
        Self {
            workflow_id,
            title: title.into(),
            description: String::new(),
            position,
            dependencies: HashSet::new(),
            responsible_party: responsible_party.into(),
            delegation: None,
        }
    }

    pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = TaskId>) -> Self {
        self.dependencies = dependencies.into_iter().collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Partial update applied atomically by the store. `None` fields are left
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    /// Compare-and-swap guard: when set, the store applies the update only
    /// while the task's current status equals this value and returns
    /// `Conflict` otherwise. Status transitions that must happen at most
    /// once (claiming a pending task) ride on this.
    pub expected_status: Option<TaskStatus>,
    pub status: Option<TaskStatus>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub results: Option<serde_json::Value>,
    pub failure_reason: Option<String>,
    pub delegated_to: Option<DelegationHandoff>,
    /// Replacement dependency declaration, used by authors to correct a
    /// workflow (e.g. after the validator reports a cycle).
    pub dependencies: Option<HashSet<TaskId>>,
}

impl TaskUpdate {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}
