//! Shared orchestration types: execution mode, per-task outcomes, and the
//! result of one scheduling pass.

use crate::models::{TaskId, WorkflowStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a scheduling pass invokes executors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Run the full transition/persistence path through the built-in
    /// always-succeeding executor.
    Simulate,
    /// Resolve the registered executor for each task's responsible party.
    Real,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simulate => write!(f, "simulate"),
            Self::Real => write!(f, "real"),
        }
    }
}

/// Outcome of one task within a scheduling pass.
///
/// `success` reflects task execution. The one case where `success` is true
/// and `error` is still set is an exhausted counter-increment retry budget:
/// the task completed, but its workflow's `completed_tasks` increment was
/// abandoned after repeated conflicts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub task_id: TaskId,
    pub success: bool,
    pub error: Option<String>,
}

impl TaskOutcome {
    pub fn failed(task_id: TaskId, error: impl Into<String>) -> Self {
        Self {
            task_id,
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Structured result of one scheduling pass. Always returned, even when some
/// tasks failed; callers inspect per-task flags to detect partial failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingPassResult {
    pub executed_count: usize,
    pub outcomes: Vec<TaskOutcome>,
    pub workflow_status: WorkflowStatus,
}
