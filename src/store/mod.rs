//! # Task Store Seam
//!
//! The engine's only persistence boundary. Durable storage is an external
//! collaborator; the engine requires per-record atomic writes and an atomic
//! counter-increment primitive, nothing more.
//!
//! All writes are atomic per call. A store that cannot increment a counter
//! atomically must surface contention as [`StoreError::Conflict`] so the
//! coordinator can retry with a fresh read.

pub mod memory;

pub use memory::InMemoryTaskStore;

use crate::models::{
    NewTask, NewWorkflow, Task, TaskId, TaskUpdate, Workflow, WorkflowId, WorkflowStatus,
};
use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced at the store boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("workflow not found: {0}")]
    WorkflowNotFound(WorkflowId),

    #[error("write conflict on {resource}")]
    Conflict { resource: String },

    #[error("store internal error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn conflict(resource: impl Into<String>) -> Self {
        Self::Conflict {
            resource: resource.into(),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistence operations the engine consumes.
///
/// `tasks_for_workflow` must return tasks in stable creation order; the
/// ready-set selector's tie-break depends on it.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn tasks_for_workflow(&self, workflow_id: WorkflowId) -> StoreResult<Vec<Task>>;

    async fn get_task(&self, task_id: TaskId) -> StoreResult<Option<Task>>;

    async fn create_task(&self, new_task: NewTask) -> StoreResult<Task>;

    /// Apply a partial update atomically. When `update.expected_status` is
    /// set, the write is a compare-and-swap on status: a mismatch fails with
    /// [`StoreError::Conflict`] and leaves the record untouched.
    async fn update_task(&self, task_id: TaskId, update: TaskUpdate) -> StoreResult<Task>;

    async fn get_workflow(&self, workflow_id: WorkflowId) -> StoreResult<Option<Workflow>>;

    async fn create_workflow(&self, new_workflow: NewWorkflow) -> StoreResult<Workflow>;

    async fn update_workflow_status(
        &self,
        workflow_id: WorkflowId,
        status: WorkflowStatus,
    ) -> StoreResult<Workflow>;

    /// Atomically increment `completed_tasks` by one, returning the new value.
    async fn increment_completed_tasks(&self, workflow_id: WorkflowId) -> StoreResult<u32>;

    /// Atomically increment `total_tasks` by one, returning the new value.
    /// Used when delegation adds a task to a live workflow.
    async fn increment_total_tasks(&self, workflow_id: WorkflowId) -> StoreResult<u32>;
}
