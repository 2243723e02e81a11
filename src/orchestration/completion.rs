//! # Workflow Completion Tracking
//!
//! After any task-status mutation, decides whether the owning workflow has
//! reached its terminal state. Idempotent; the engine only ever writes
//! `completed` and never flips a workflow back to `active`.

use crate::error::{EngineError, Result};
use crate::models::{WorkflowId, WorkflowStatus};
use crate::store::TaskStore;
use std::sync::Arc;
use tracing::{debug, info};

/// Checks the all-tasks-terminal condition and persists the workflow's
/// `completed` transition exactly once.
pub struct CompletionTracker {
    store: Arc<dyn TaskStore>,
}

impl CompletionTracker {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Re-evaluate a workflow's terminal condition and return its (possibly
    /// updated) status.
    ///
    /// Only an `active` workflow is promoted; `paused` and `cancelled` are
    /// externally owned states the engine never overwrites. A workflow with
    /// zero tasks stays `active` (no task transition ever occurred).
    pub async fn check_completion(&self, workflow_id: WorkflowId) -> Result<WorkflowStatus> {
        let workflow = self
            .store
            .get_workflow(workflow_id)
            .await?
            .ok_or(EngineError::WorkflowNotFound(workflow_id))?;

        if workflow.status != WorkflowStatus::Active {
            return Ok(workflow.status);
        }

        let tasks = self.store.tasks_for_workflow(workflow_id).await?;
        if tasks.is_empty() {
            return Ok(workflow.status);
        }

        let remaining = tasks.iter().filter(|t| !t.status.is_terminal()).count();
        if remaining > 0 {
            debug!(
                workflow_id = %workflow_id,
                remaining_tasks = remaining,
                "Workflow not yet terminal"
            );
            return Ok(workflow.status);
        }

        let updated = self
            .store
            .update_workflow_status(workflow_id, WorkflowStatus::Completed)
            .await?;

        info!(
            workflow_id = %workflow_id,
            total_tasks = updated.total_tasks,
            completed_tasks = updated.completed_tasks,
            "Workflow completed: all tasks terminal"
        );

        Ok(updated.status)
    }
}
