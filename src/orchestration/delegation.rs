//! # Delegation
//!
//! Hands continued work off to a different responsible party by spawning a
//! new task "just after" its originator. Fractional positions
//! (`parent.position + 0.5`) insert without renumbering siblings.
//!
//! Delegation is advisory bookkeeping, not a dependency edge: the parent's
//! status is unaffected and it can complete independently of the child.

use crate::error::{EngineError, Result};
use crate::models::{DelegationHandoff, DelegationLink, NewTask, TaskId, TaskUpdate, WorkflowId};
use crate::store::TaskStore;
use std::sync::Arc;
use tracing::{info, warn};

/// A request to hand work off to another responsible party.
#[derive(Debug, Clone)]
pub struct DelegationRequest {
    pub parent_task_id: TaskId,
    pub workflow_id: WorkflowId,
    /// Who the new task is handed to.
    pub responsible_party: String,
    /// Human-readable description of the continued work.
    pub description: String,
    /// Optional action/payload carried to the child on its delegation link.
    pub metadata: Option<serde_json::Value>,
}

/// Creates delegation child tasks and records the handoff on both ends.
pub struct DelegationSpawner {
    store: Arc<dyn TaskStore>,
}

impl DelegationSpawner {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Spawn the delegation child and return its id.
    ///
    /// The child is created first; the parent's forward record is written
    /// best-effort afterwards (the child's own back-reference is the primary
    /// record of the handoff).
    pub async fn delegate(&self, request: DelegationRequest) -> Result<TaskId> {
        let parent = self
            .store
            .get_task(request.parent_task_id)
            .await?
            .filter(|task| task.workflow_id == request.workflow_id)
            .ok_or(EngineError::TaskNotFound(request.parent_task_id))?;

        let mut new_task = NewTask::new(
            request.workflow_id,
            request.description.clone(),
            request.responsible_party.clone(),
            parent.position + 0.5,
        )
        .with_description(format!(
            "Delegated from {} (task {})",
            parent.responsible_party, parent.id
        ));
        new_task.delegation = Some(DelegationLink {
            parent_task_id: parent.id,
            delegated_from: parent.responsible_party.clone(),
            metadata: request.metadata,
        });

        let child = self.store.create_task(new_task).await?;

        // The child joins the live workflow's aggregate counts.
        self.store
            .increment_total_tasks(request.workflow_id)
            .await?;

        let handoff = TaskUpdate {
            delegated_to: Some(DelegationHandoff {
                child_task_id: child.id,
                delegated_to: request.responsible_party.clone(),
            }),
            ..TaskUpdate::default()
        };
        if let Err(e) = self.store.update_task(parent.id, handoff).await {
            warn!(
                parent_task_id = %parent.id,
                child_task_id = %child.id,
                error = %e,
                "Failed to record handoff on parent task; child remains authoritative"
            );
        }

        info!(
            parent_task_id = %parent.id,
            child_task_id = %child.id,
            delegated_from = %parent.responsible_party,
            delegated_to = %request.responsible_party,
            position = child.position,
            "Delegated task spawned"
        );

        Ok(child.id)
    }
}
