//! Executor trait, execution context, and the party-keyed registry.
//!
//! Executors run arbitrary business logic. The engine imposes no timeout on
//! an invocation; callers wanting bounded latency wrap their executor in
//! their own timeout layer, and the engine surfaces whatever error that
//! wrapper produces as a task failure.

use crate::models::{Task, TaskId, WorkflowId};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

/// Everything an executor gets to see about the task it is running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionContext {
    pub task_id: TaskId,
    pub workflow_id: WorkflowId,
    pub title: String,
    pub description: String,
    pub responsible_party: String,
    /// Payload already attached to the task, if any: prior results, or the
    /// action metadata a delegating party put on the handoff link.
    pub attachments: Option<serde_json::Value>,
}

impl ExecutionContext {
    pub fn for_task(task: &Task) -> Self {
        Self {
            task_id: task.id,
            workflow_id: task.workflow_id,
            title: task.title.clone(),
            description: task.description.clone(),
            responsible_party: task.responsible_party.clone(),
            attachments: task.results.clone().or_else(|| {
                task.delegation
                    .as_ref()
                    .and_then(|link| link.metadata.clone())
            }),
        }
    }
}

/// What an executor invocation produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorOutcome {
    pub success: bool,
    pub results: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl ExecutorOutcome {
    pub fn success(results: serde_json::Value) -> Self {
        Self {
            success: true,
            results: Some(results),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            results: None,
            error: Some(error.into()),
        }
    }
}

/// Opaque execution capability for one responsible party.
///
/// Returning `Err` and returning `Ok` with `success: false` are both failure
/// signals; the coordinator records either as the task's failure reason.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    async fn execute(&self, context: ExecutionContext) -> anyhow::Result<ExecutorOutcome>;
}

/// Registry of executors keyed by responsible party.
#[derive(Default)]
pub struct ExecutorRegistry {
    executors: RwLock<HashMap<String, Arc<dyn TaskExecutor>>>,
}

impl ExecutorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, responsible_party: impl Into<String>, executor: Arc<dyn TaskExecutor>) {
        self.executors
            .write()
            .insert(responsible_party.into(), executor);
    }

    pub fn resolve(&self, responsible_party: &str) -> Option<Arc<dyn TaskExecutor>> {
        self.executors.read().get(responsible_party).cloned()
    }

    pub fn registered_parties(&self) -> Vec<String> {
        self.executors.read().keys().cloned().collect()
    }
}

/// Built-in executor used by simulate mode: always succeeds and echoes the
/// context so the full transition/persistence path is exercised.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedExecutor;

#[async_trait]
impl TaskExecutor for SimulatedExecutor {
    async fn execute(&self, context: ExecutionContext) -> anyhow::Result<ExecutorOutcome> {
        Ok(ExecutorOutcome::success(json!({
            "simulated": true,
            "task_id": context.task_id,
            "title": context.title,
            "responsible_party": context.responsible_party,
        })))
    }
}
