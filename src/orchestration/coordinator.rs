//! # Execution Coordinator
//!
//! Drives one scheduling pass for a workflow: validates the dependency graph,
//! pulls the ready set, runs each ready task through an executor in sorted
//! order, applies status transitions, and keeps workflow aggregates
//! consistent.
//!
//! ## Failure semantics
//!
//! The pass has partial-failure semantics, not all-or-nothing batches.
//! Graph-level problems (`GraphInvalid`, workflow not found) abort before any
//! task is touched; an individual task's executor failure is captured in that
//! task's outcome and never aborts its siblings. There is no rollback.
//!
//! ## Ordering
//!
//! Ready tasks run sequentially, one at a time, in ascending position order.
//! Nothing within a workflow requires this seriality for correctness; it is
//! chosen for deterministic, totally-ordered dependency-satisfying
//! transitions. Across workflows, passes may run concurrently against the
//! same store.

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::execution::{ExecutionContext, ExecutorRegistry, SimulatedExecutor, TaskExecutor};
use crate::graph::{validate_acyclic, DependencyGraph};
use crate::models::{Task, TaskId, TaskStatus, TaskUpdate, WorkflowId};
use crate::orchestration::completion::CompletionTracker;
use crate::orchestration::ready_set::ReadySetSelector;
use crate::orchestration::types::{ExecutionMode, SchedulingPassResult, TaskOutcome};
use crate::store::{StoreError, TaskStore};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Coordinates scheduling passes over one store and one executor registry.
pub struct ExecutionCoordinator {
    store: Arc<dyn TaskStore>,
    registry: Arc<ExecutorRegistry>,
    selector: ReadySetSelector,
    tracker: CompletionTracker,
    config: EngineConfig,
}

impl ExecutionCoordinator {
    pub fn new(store: Arc<dyn TaskStore>, registry: Arc<ExecutorRegistry>) -> Self {
        Self::with_config(store, registry, EngineConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn TaskStore>,
        registry: Arc<ExecutorRegistry>,
        config: EngineConfig,
    ) -> Self {
        Self {
            selector: ReadySetSelector::new(Arc::clone(&store)),
            tracker: CompletionTracker::new(Arc::clone(&store)),
            store,
            registry,
            config,
        }
    }

    /// Run one scheduling pass for a workflow.
    ///
    /// An empty ready set is a normal outcome (`executed_count = 0`): the
    /// workflow may be waiting on dependencies or already fully scheduled.
    #[instrument(skip(self), fields(workflow_id = %workflow_id, mode = %mode))]
    pub async fn run_ready_tasks(
        &self,
        workflow_id: WorkflowId,
        mode: ExecutionMode,
    ) -> Result<SchedulingPassResult> {
        let workflow = self
            .store
            .get_workflow(workflow_id)
            .await?
            .ok_or(EngineError::WorkflowNotFound(workflow_id))?;

        let graph = DependencyGraph::build(self.store.as_ref(), workflow_id).await?;
        let validation = validate_acyclic(&graph);
        if !validation.valid {
            return Err(EngineError::graph_invalid(workflow_id, validation.cycles));
        }

        let ready = self.selector.ready_tasks(workflow_id, None).await?;
        if ready.is_empty() {
            debug!(workflow_id = %workflow_id, "Ready set empty; nothing to execute");
            return Ok(SchedulingPassResult {
                executed_count: 0,
                outcomes: Vec::new(),
                workflow_status: workflow.status,
            });
        }

        info!(
            workflow_id = %workflow_id,
            ready_count = ready.len(),
            "Executing ready set"
        );

        let mut outcomes = Vec::with_capacity(ready.len());
        for task in ready {
            if let Some(outcome) = self.execute_one(task, mode).await {
                outcomes.push(outcome);
            }
        }

        let workflow_status = self
            .store
            .get_workflow(workflow_id)
            .await?
            .ok_or(EngineError::WorkflowNotFound(workflow_id))?
            .status;

        Ok(SchedulingPassResult {
            executed_count: outcomes.len(),
            outcomes,
            workflow_status,
        })
    }

    /// Skip a still-pending task. A deliberate external action, not a
    /// cancellation of running work; returns `InvalidTransition` once the
    /// task has left `pending`.
    pub async fn skip_task(&self, task_id: TaskId) -> Result<Task> {
        let task = self
            .store
            .get_task(task_id)
            .await?
            .ok_or(EngineError::TaskNotFound(task_id))?;

        if !task.status.can_transition_to(TaskStatus::Skipped) {
            return Err(EngineError::InvalidTransition {
                task_id,
                from: task.status,
                to: TaskStatus::Skipped,
            });
        }

        // guarded like the coordinator's own claim, in case a pass starts
        // the task between the check above and this write
        let skip = TaskUpdate {
            expected_status: Some(TaskStatus::Pending),
            status: Some(TaskStatus::Skipped),
            ..TaskUpdate::default()
        };
        let skipped = match self.store.update_task(task_id, skip).await {
            Ok(skipped) => skipped,
            Err(StoreError::Conflict { .. }) => {
                let current = self
                    .store
                    .get_task(task_id)
                    .await?
                    .ok_or(EngineError::TaskNotFound(task_id))?;
                return Err(EngineError::InvalidTransition {
                    task_id,
                    from: current.status,
                    to: TaskStatus::Skipped,
                });
            }
            Err(e) => return Err(e.into()),
        };
        self.tracker.check_completion(skipped.workflow_id).await?;

        info!(task_id = %task_id, "Task skipped");
        Ok(skipped)
    }

    /// Execute one ready task end to end. All failure paths are folded into
    /// the returned outcome so siblings keep running. Returns `None` when an
    /// overlapping pass claimed the task first.
    async fn execute_one(&self, task: Task, mode: ExecutionMode) -> Option<TaskOutcome> {
        let task_id = task.id;

        // The ready set is a snapshot; an overlapping pass may race us to
        // this task. The guarded write makes the claim a compare-and-swap,
        // so at most one pass ever moves it out of pending.
        let claim = TaskUpdate {
            expected_status: Some(TaskStatus::Pending),
            status: Some(TaskStatus::InProgress),
            started_at: Some(Utc::now()),
            ..TaskUpdate::default()
        };
        let claimed = match self.store.update_task(task_id, claim).await {
            Ok(claimed) => claimed,
            Err(StoreError::Conflict { .. }) => {
                debug!(
                    task_id = %task_id,
                    "Task no longer pending; leaving it to the pass that claimed it"
                );
                return None;
            }
            Err(StoreError::TaskNotFound(_)) => {
                return Some(TaskOutcome::failed(task_id, "task disappeared from store"));
            }
            Err(e) => {
                error!(task_id = %task_id, error = %e, "Failed to start task");
                return Some(TaskOutcome::failed(task_id, e.to_string()));
            }
        };

        let context = ExecutionContext::for_task(&claimed);
        let invocation = match self.resolve_executor(&claimed, mode) {
            Ok(executor) => executor.execute(context).await,
            Err(reason) => Err(anyhow::anyhow!(reason)),
        };

        let outcome = match invocation {
            Ok(outcome) if outcome.success => self.finish_success(&claimed, outcome.results).await,
            Ok(outcome) => {
                let reason = outcome
                    .error
                    .unwrap_or_else(|| "executor reported failure without a reason".to_string());
                self.finish_failure(&claimed, reason).await
            }
            Err(e) => self.finish_failure(&claimed, e.to_string()).await,
        };
        Some(outcome)
    }

    fn resolve_executor(
        &self,
        task: &Task,
        mode: ExecutionMode,
    ) -> std::result::Result<Arc<dyn TaskExecutor>, String> {
        match mode {
            ExecutionMode::Simulate => Ok(Arc::new(SimulatedExecutor)),
            ExecutionMode::Real => self.registry.resolve(&task.responsible_party).ok_or_else(|| {
                format!(
                    "no executor registered for responsible party '{}'",
                    task.responsible_party
                )
            }),
        }
    }

    async fn finish_success(&self, task: &Task, results: Option<serde_json::Value>) -> TaskOutcome {
        let update = TaskUpdate {
            status: Some(TaskStatus::Completed),
            completed_at: Some(Utc::now()),
            results,
            ..TaskUpdate::default()
        };
        if let Err(e) = self.store.update_task(task.id, update).await {
            error!(task_id = %task.id, error = %e, "Failed to persist task completion");
            return TaskOutcome::failed(task.id, e.to_string());
        }

        let counter_error = match self.increment_completed_with_retry(task.workflow_id).await {
            Ok(()) => None,
            Err(e) => {
                // The task is completed; only the aggregate increment was
                // abandoned. Surfaced on the outcome, never unwound.
                error!(task_id = %task.id, error = %e, "Abandoned completed_tasks increment");
                Some(e.to_string())
            }
        };

        if let Err(e) = self.tracker.check_completion(task.workflow_id).await {
            warn!(workflow_id = %task.workflow_id, error = %e, "Completion check failed");
        }

        debug!(task_id = %task.id, "Task completed");
        TaskOutcome {
            task_id: task.id,
            success: true,
            error: counter_error,
        }
    }

    async fn finish_failure(&self, task: &Task, reason: String) -> TaskOutcome {
        let update = TaskUpdate {
            status: Some(TaskStatus::Failed),
            failure_reason: Some(reason.clone()),
            ..TaskUpdate::default()
        };
        if let Err(e) = self.store.update_task(task.id, update).await {
            error!(task_id = %task.id, error = %e, "Failed to persist task failure");
        }

        // Failed is terminal, so the workflow may still complete on it.
        if let Err(e) = self.tracker.check_completion(task.workflow_id).await {
            warn!(workflow_id = %task.workflow_id, error = %e, "Completion check failed");
        }

        info!(task_id = %task.id, reason = %reason, "Task failed");
        TaskOutcome::failed(task.id, reason)
    }

    /// Atomic counter increment with jittered exponential backoff on write
    /// conflicts. Exhaustion affects only this increment.
    async fn increment_completed_with_retry(&self, workflow_id: WorkflowId) -> Result<()> {
        let mut attempt: u32 = 0;
        loop {
            match self.store.increment_completed_tasks(workflow_id).await {
                Ok(_) => return Ok(()),
                Err(StoreError::Conflict { resource }) => {
                    match self.config.retry_delay(attempt) {
                        Some(delay) => {
                            warn!(
                                workflow_id = %workflow_id,
                                resource = %resource,
                                attempt = attempt + 1,
                                delay_ms = delay.as_millis() as u64,
                                "Counter increment conflict; retrying"
                            );
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                        }
                        None => {
                            return Err(EngineError::persistence_conflict(resource, attempt + 1));
                        }
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
