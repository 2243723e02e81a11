//! # Engine Error Types
//!
//! Structured error handling for the execution engine using thiserror
//! for typed error variants instead of `Box<dyn Error>` patterns.
//!
//! Graph-level errors (`GraphInvalid`, `WorkflowNotFound`) abort a scheduling
//! pass before any task is touched. Task-level executor failures are never
//! represented here; they are captured per-task in
//! [`TaskOutcome`](crate::orchestration::types::TaskOutcome).

use crate::models::{TaskId, TaskStatus, WorkflowId};
use crate::store::StoreError;
use thiserror::Error;

/// Errors surfaced by the engine's public operations.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("dependency graph for workflow {workflow_id} contains {} cycle(s)", cycles.len())]
    GraphInvalid {
        workflow_id: WorkflowId,
        cycles: Vec<Vec<TaskId>>,
    },

    #[error("workflow not found: {0}")]
    WorkflowNotFound(WorkflowId),

    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("invalid status transition for task {task_id}: {from} -> {to}")]
    InvalidTransition {
        task_id: TaskId,
        from: TaskStatus,
        to: TaskStatus,
    },

    #[error("persistence conflict on {resource} after {attempts} attempt(s)")]
    PersistenceConflict { resource: String, attempts: u32 },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Create a graph validation error from the validator's cycle report.
    pub fn graph_invalid(workflow_id: WorkflowId, cycles: Vec<Vec<TaskId>>) -> Self {
        Self::GraphInvalid {
            workflow_id,
            cycles,
        }
    }

    /// Create a persistence conflict error for an exhausted retry budget.
    pub fn persistence_conflict(resource: impl Into<String>, attempts: u32) -> Self {
        Self::PersistenceConflict {
            resource: resource.into(),
            attempts,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
