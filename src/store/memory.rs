//! In-memory reference implementation of [`TaskStore`].
//!
//! Backed by concurrent maps with per-record atomic mutation. Suitable for
//! tests, simulations, and embedding the engine without a durable store.

use crate::models::{
    NewTask, NewWorkflow, Task, TaskId, TaskStatus, TaskUpdate, Workflow, WorkflowId,
    WorkflowStatus,
};
use crate::store::{StoreError, StoreResult, TaskStore};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, Ordering};

/// Concurrent in-memory task store.
///
/// Tasks and workflows live in `DashMap`s; every update mutates a single
/// record under its shard lock, which gives the per-record atomicity the
/// [`TaskStore`] contract requires. Creation order per workflow is tracked
/// separately so `tasks_for_workflow` can return a stable load order.
pub struct InMemoryTaskStore {
    tasks: DashMap<TaskId, Task>,
    workflows: DashMap<WorkflowId, Workflow>,
    task_order: DashMap<WorkflowId, Vec<TaskId>>,
    injected_conflicts: AtomicU32,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self {
            tasks: DashMap::new(),
            workflows: DashMap::new(),
            task_order: DashMap::new(),
            injected_conflicts: AtomicU32::new(0),
        }
    }

    /// Queue up `n` synthetic [`StoreError::Conflict`] results for the next
    /// `n` calls to `increment_completed_tasks`. Test support for exercising
    /// the coordinator's conflict-retry handling.
    pub fn inject_counter_conflicts(&self, n: u32) {
        self.injected_conflicts.store(n, Ordering::SeqCst);
    }

    fn consume_injected_conflict(&self) -> bool {
        self.injected_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| v.checked_sub(1))
            .is_ok()
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn tasks_for_workflow(&self, workflow_id: WorkflowId) -> StoreResult<Vec<Task>> {
        if !self.workflows.contains_key(&workflow_id) {
            return Err(StoreError::WorkflowNotFound(workflow_id));
        }

        let order = self
            .task_order
            .get(&workflow_id)
            .map(|ids| ids.clone())
            .unwrap_or_default();

        Ok(order
            .iter()
            .filter_map(|id| self.tasks.get(id).map(|t| t.clone()))
            .collect())
    }

    async fn get_task(&self, task_id: TaskId) -> StoreResult<Option<Task>> {
        Ok(self.tasks.get(&task_id).map(|t| t.clone()))
    }

    async fn create_task(&self, new_task: NewTask) -> StoreResult<Task> {
        if !self.workflows.contains_key(&new_task.workflow_id) {
            return Err(StoreError::WorkflowNotFound(new_task.workflow_id));
        }

        let task = Task {
            id: TaskId::new(),
            workflow_id: new_task.workflow_id,
            title: new_task.title,
            description: new_task.description,
            status: TaskStatus::Pending,
            position: new_task.position,
            dependencies: new_task.dependencies,
            responsible_party: new_task.responsible_party,
            delegation: new_task.delegation,
            delegated_to: None,
            results: None,
            failure_reason: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        };

        self.task_order
            .entry(task.workflow_id)
            .or_default()
            .push(task.id);
        self.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update_task(&self, task_id: TaskId, update: TaskUpdate) -> StoreResult<Task> {
        let mut entry = self
            .tasks
            .get_mut(&task_id)
            .ok_or(StoreError::TaskNotFound(task_id))?;

        let task = entry.value_mut();
        if let Some(expected) = update.expected_status {
            if task.status != expected {
                // checked under the record's shard lock, so the guard and
                // the write are one atomic step
                return Err(StoreError::conflict(format!("task {task_id} status")));
            }
        }
        if let Some(status) = update.status {
            task.status = status;
        }
        if let Some(started_at) = update.started_at {
            task.started_at = Some(started_at);
        }
        if let Some(completed_at) = update.completed_at {
            task.completed_at = Some(completed_at);
        }
        if let Some(results) = update.results {
            task.results = Some(results);
        }
        if let Some(reason) = update.failure_reason {
            task.failure_reason = Some(reason);
        }
        if let Some(handoff) = update.delegated_to {
            task.delegated_to = Some(handoff);
        }
        if let Some(dependencies) = update.dependencies {
            task.dependencies = dependencies;
        }

        Ok(task.clone())
    }

    async fn get_workflow(&self, workflow_id: WorkflowId) -> StoreResult<Option<Workflow>> {
        Ok(self.workflows.get(&workflow_id).map(|w| w.clone()))
    }

    async fn create_workflow(&self, new_workflow: NewWorkflow) -> StoreResult<Workflow> {
        let now = Utc::now();
        let workflow = Workflow {
            id: WorkflowId::new(),
            name: new_workflow.name,
            status: WorkflowStatus::Active,
            total_tasks: new_workflow.total_tasks,
            completed_tasks: 0,
            created_at: now,
            updated_at: now,
        };
        self.workflows.insert(workflow.id, workflow.clone());
        Ok(workflow)
    }

    async fn update_workflow_status(
        &self,
        workflow_id: WorkflowId,
        status: WorkflowStatus,
    ) -> StoreResult<Workflow> {
        let mut entry = self
            .workflows
            .get_mut(&workflow_id)
            .ok_or(StoreError::WorkflowNotFound(workflow_id))?;

        let workflow = entry.value_mut();
        workflow.status = status;
        workflow.updated_at = Utc::now();
        Ok(workflow.clone())
    }

    async fn increment_completed_tasks(&self, workflow_id: WorkflowId) -> StoreResult<u32> {
        if self.consume_injected_conflict() {
            return Err(StoreError::conflict(format!(
                "workflow {workflow_id} completed_tasks"
            )));
        }

        let mut entry = self
            .workflows
            .get_mut(&workflow_id)
            .ok_or(StoreError::WorkflowNotFound(workflow_id))?;

        let workflow = entry.value_mut();
        if workflow.completed_tasks >= workflow.total_tasks {
            // completed_tasks <= total_tasks must hold; an over-count means a
            // double increment somewhere upstream
            return Err(StoreError::Internal(format!(
                "completed_tasks would exceed total_tasks ({}) for workflow {workflow_id}",
                workflow.total_tasks
            )));
        }
        workflow.completed_tasks += 1;
        workflow.updated_at = Utc::now();
        Ok(workflow.completed_tasks)
    }

    async fn increment_total_tasks(&self, workflow_id: WorkflowId) -> StoreResult<u32> {
        let mut entry = self
            .workflows
            .get_mut(&workflow_id)
            .ok_or(StoreError::WorkflowNotFound(workflow_id))?;

        let workflow = entry.value_mut();
        workflow.total_tasks += 1;
        workflow.updated_at = Utc::now();
        Ok(workflow.total_tasks)
    }
}
