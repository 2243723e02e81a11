//! # Ready-Set Selection
//!
//! Computes, from current task statuses and declared dependencies, the subset
//! of a workflow's tasks eligible to run now. A pure query with no side
//! effects; safe to call repeatedly and concurrently.

use crate::error::{EngineError, Result};
use crate::models::{Task, TaskId, TaskStatus, WorkflowId};
use crate::store::TaskStore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Selects pending tasks whose every dependency has reached a satisfying
/// terminal state (`completed` or `skipped`).
pub struct ReadySetSelector {
    store: Arc<dyn TaskStore>,
}

impl ReadySetSelector {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// The ordered ready set for a workflow, optionally filtered to one
    /// responsible party.
    ///
    /// A dependency id that resolves to no existing task is unsatisfied, not
    /// fatal: the dependent task is held back and logged, siblings are
    /// unaffected. Results are sorted ascending by position; ties keep the
    /// store's load order (stable sort).
    pub async fn ready_tasks(
        &self,
        workflow_id: WorkflowId,
        responsible_party: Option<&str>,
    ) -> Result<Vec<Task>> {
        if self.store.get_workflow(workflow_id).await?.is_none() {
            return Err(EngineError::WorkflowNotFound(workflow_id));
        }

        let tasks = self.store.tasks_for_workflow(workflow_id).await?;
        let statuses: HashMap<TaskId, TaskStatus> =
            tasks.iter().map(|t| (t.id, t.status)).collect();

        let mut ready: Vec<Task> = tasks
            .into_iter()
            .filter(|task| {
                if task.status != TaskStatus::Pending {
                    return false;
                }
                if let Some(party) = responsible_party {
                    if task.responsible_party != party {
                        return false;
                    }
                }
                dependencies_satisfied(task, &statuses)
            })
            .collect();

        ready.sort_by(|a, b| a.position.total_cmp(&b.position));

        debug!(
            workflow_id = %workflow_id,
            ready_count = ready.len(),
            party_filter = responsible_party.unwrap_or("<none>"),
            "Computed ready set"
        );

        Ok(ready)
    }
}

fn dependencies_satisfied(task: &Task, statuses: &HashMap<TaskId, TaskStatus>) -> bool {
    task.dependencies.iter().all(|dep_id| {
        match statuses.get(dep_id) {
            Some(status) => status.satisfies_dependency(),
            None => {
                warn!(
                    task_id = %task.id,
                    dependency_id = %dep_id,
                    "Dependency does not resolve to any task; treating as unsatisfied"
                );
                false
            }
        }
    })
}
