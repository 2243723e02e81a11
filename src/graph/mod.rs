//! # Dependency Graph
//!
//! Derives, for one workflow, the mapping from task id to the set of task ids
//! it depends on, and proves that mapping acyclic before any scheduling
//! decision is trusted.
//!
//! The builder performs no validation beyond loading: unresolvable ids and
//! cycles are the concern of the validator and the ready-set selector.

pub mod cycle;

pub use cycle::{validate_acyclic, CycleValidation};

use crate::error::{EngineError, Result};
use crate::models::{TaskId, WorkflowId};
use crate::store::TaskStore;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Per-workflow dependency mapping. Tasks with no declared dependencies map
/// to an empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    edges: HashMap<TaskId, HashSet<TaskId>>,
}

impl DependencyGraph {
    /// Build the graph for a workflow by loading its tasks from the store.
    ///
    /// The workflow must exist; a workflow with zero tasks yields an empty
    /// graph, not an error.
    pub async fn build(store: &dyn TaskStore, workflow_id: WorkflowId) -> Result<Self> {
        if store.get_workflow(workflow_id).await?.is_none() {
            return Err(EngineError::WorkflowNotFound(workflow_id));
        }

        let tasks = store.tasks_for_workflow(workflow_id).await?;
        let edges: HashMap<TaskId, HashSet<TaskId>> = tasks
            .into_iter()
            .map(|task| (task.id, task.dependencies))
            .collect();

        debug!(
            workflow_id = %workflow_id,
            node_count = edges.len(),
            edge_count = edges.values().map(HashSet::len).sum::<usize>(),
            "Built dependency graph"
        );

        Ok(Self { edges })
    }

    /// Construct directly from an id -> dependencies mapping.
    pub fn from_edges(edges: HashMap<TaskId, HashSet<TaskId>>) -> Self {
        Self { edges }
    }

    pub fn dependencies_of(&self, task_id: TaskId) -> Option<&HashSet<TaskId>> {
        self.edges.get(&task_id)
    }

    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub(crate) fn nodes(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.edges.keys().copied()
    }
}
