//! Shared fixtures for engine integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use taskflow_core::execution::{ExecutionContext, ExecutorOutcome, TaskExecutor};
use taskflow_core::models::{NewTask, NewWorkflow, Task, TaskId, Workflow};
use taskflow_core::store::{InMemoryTaskStore, TaskStore};

pub fn store() -> Arc<InMemoryTaskStore> {
    Arc::new(InMemoryTaskStore::new())
}

pub async fn create_workflow(
    store: &InMemoryTaskStore,
    name: &str,
    total_tasks: u32,
) -> Workflow {
    store
        .create_workflow(NewWorkflow::new(name, total_tasks))
        .await
        .expect("workflow creation")
}

pub async fn add_task(
    store: &InMemoryTaskStore,
    workflow: &Workflow,
    title: &str,
    responsible_party: &str,
    position: f64,
    dependencies: impl IntoIterator<Item = TaskId>,
) -> Task {
    store
        .create_task(
            NewTask::new(workflow.id, title, responsible_party, position)
                .with_dependencies(dependencies),
        )
        .await
        .expect("task creation")
}

/// Executor that fails tasks whose title is in the fail set and succeeds for
/// everything else, recording invocation order.
pub struct ScriptedExecutor {
    fail_titles: HashSet<String>,
    pub invocations: Mutex<Vec<TaskId>>,
}

impl ScriptedExecutor {
    pub fn succeeding() -> Self {
        Self::failing_on([])
    }

    pub fn failing_on(titles: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            fail_titles: titles.into_iter().map(str::to_string).collect(),
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn invocation_order(&self) -> Vec<TaskId> {
        self.invocations.lock().clone()
    }
}

#[async_trait]
impl TaskExecutor for ScriptedExecutor {
    async fn execute(&self, context: ExecutionContext) -> anyhow::Result<ExecutorOutcome> {
        self.invocations.lock().push(context.task_id);
        if self.fail_titles.contains(&context.title) {
            Ok(ExecutorOutcome::failure(format!(
                "scripted failure for '{}'",
                context.title
            )))
        } else {
            Ok(ExecutorOutcome::success(json!({ "ran": context.title })))
        }
    }
}
