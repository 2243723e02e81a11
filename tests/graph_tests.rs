//! Integration tests for dependency graph derivation and validation against
//! the store seam.

mod common;

use common::{add_task, create_workflow, store};
use std::collections::HashSet;
use taskflow_core::error::EngineError;
use taskflow_core::graph::{validate_acyclic, DependencyGraph};
use taskflow_core::models::{TaskUpdate, WorkflowId};
use taskflow_core::store::TaskStore;

#[tokio::test]
async fn test_missing_workflow_fails_graph_build() {
    let store = store();
    let missing = WorkflowId::new();

    let result = DependencyGraph::build(store.as_ref(), missing).await;
    assert!(matches!(
        result,
        Err(EngineError::WorkflowNotFound(id)) if id == missing
    ));
}

#[tokio::test]
async fn test_zero_task_workflow_yields_empty_graph() {
    let store = store();
    let workflow = create_workflow(&store, "empty", 0).await;

    let graph = DependencyGraph::build(store.as_ref(), workflow.id)
        .await
        .unwrap();
    assert!(graph.is_empty());
    assert!(validate_acyclic(&graph).valid);
}

#[tokio::test]
async fn test_graph_maps_declared_dependencies() {
    let store = store();
    let workflow = create_workflow(&store, "chain", 3).await;

    let a = add_task(&store, &workflow, "a", "worker", 1.0, []).await;
    let b = add_task(&store, &workflow, "b", "worker", 2.0, [a.id]).await;
    let c = add_task(&store, &workflow, "c", "worker", 3.0, [a.id, b.id]).await;

    let graph = DependencyGraph::build(store.as_ref(), workflow.id)
        .await
        .unwrap();

    assert_eq!(graph.node_count(), 3);
    assert!(graph.dependencies_of(a.id).unwrap().is_empty());
    assert_eq!(
        graph.dependencies_of(b.id).unwrap(),
        &HashSet::from([a.id])
    );
    assert_eq!(
        graph.dependencies_of(c.id).unwrap(),
        &HashSet::from([a.id, b.id])
    );
    assert!(validate_acyclic(&graph).valid);
}

#[tokio::test]
async fn test_cyclic_declarations_detected_from_store() {
    let store = store();
    let workflow = create_workflow(&store, "cyclic", 2).await;

    let a = add_task(&store, &workflow, "a", "worker", 1.0, []).await;
    let b = add_task(&store, &workflow, "b", "worker", 2.0, [a.id]).await;

    // Author edits a's declaration to depend on b, closing the loop.
    store
        .update_task(
            a.id,
            TaskUpdate {
                dependencies: Some(HashSet::from([b.id])),
                ..TaskUpdate::default()
            },
        )
        .await
        .unwrap();

    let graph = DependencyGraph::build(store.as_ref(), workflow.id)
        .await
        .unwrap();

    let validation = validate_acyclic(&graph);
    assert!(!validation.valid);
    assert_eq!(validation.cycles.len(), 1);

    let cycle = &validation.cycles[0];
    assert_eq!(cycle.first(), cycle.last());
    assert_eq!(cycle.len(), 3);
    assert!(cycle.contains(&a.id) && cycle.contains(&b.id));
}
