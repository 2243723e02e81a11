//! Cycle detection over a dependency graph.
//!
//! Depth-first traversal with an explicit recursion stack. A global visited
//! set guarantees every node is expanded exactly once across the whole
//! traversal (O(V+E)); a per-path set detects back-edges. A reported cycle is
//! the path slice from the re-entered node, closed by repeating that node:
//! `[a, b, c, a]` for `a -> b -> c -> a`.

use crate::graph::DependencyGraph;
use crate::models::TaskId;
use std::collections::HashSet;
use tracing::warn;

/// Outcome of a validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleValidation {
    pub valid: bool,
    pub cycles: Vec<Vec<TaskId>>,
}

/// Validate that the graph is a DAG, reporting every cycle found.
///
/// The engine never auto-repairs: a failed validation means no scheduling
/// decision for the workflow can be trusted until the declarations are
/// corrected.
pub fn validate_acyclic(graph: &DependencyGraph) -> CycleValidation {
    let mut visited: HashSet<TaskId> = HashSet::new();
    let mut cycles: Vec<Vec<TaskId>> = Vec::new();

    let mut roots: Vec<TaskId> = graph.nodes().collect();
    roots.sort();

    for root in roots {
        if !visited.contains(&root) {
            explore(graph, root, &mut visited, &mut cycles);
        }
    }

    if !cycles.is_empty() {
        warn!(cycle_count = cycles.len(), "Dependency graph contains cycles");
    }

    CycleValidation {
        valid: cycles.is_empty(),
        cycles,
    }
}

/// One DFS frame: the node, its dependency list, and the next edge to expand.
type Frame = (TaskId, Vec<TaskId>, usize);

fn explore(
    graph: &DependencyGraph,
    root: TaskId,
    visited: &mut HashSet<TaskId>,
    cycles: &mut Vec<Vec<TaskId>>,
) {
    let mut stack: Vec<Frame> = Vec::new();
    let mut path: Vec<TaskId> = Vec::new();
    let mut on_path: HashSet<TaskId> = HashSet::new();

    visited.insert(root);
    stack.push((root, sorted_dependencies(graph, root), 0));
    path.push(root);
    on_path.insert(root);

    while let Some(frame) = stack.last_mut() {
        if frame.2 < frame.1.len() {
            let next = frame.1[frame.2];
            frame.2 += 1;

            if on_path.contains(&next) {
                // Back-edge: the cycle runs from next's position on the
                // current path through here, closed by repeating next.
                if let Some(start) = path.iter().position(|id| *id == next) {
                    let mut cycle = path[start..].to_vec();
                    cycle.push(next);
                    cycles.push(cycle);
                }
            } else if !visited.contains(&next) && graph.dependencies_of(next).is_some() {
                // Unresolvable ids cannot participate in a cycle; the
                // ready-set selector reports them as unsatisfied.
                visited.insert(next);
                stack.push((next, sorted_dependencies(graph, next), 0));
                path.push(next);
                on_path.insert(next);
            }
        } else {
            let node = frame.0;
            stack.pop();
            path.pop();
            on_path.remove(&node);
        }
    }
}

/// Dependencies in sorted order so traversal (and cycle reporting) is
/// deterministic for a given graph.
fn sorted_dependencies(graph: &DependencyGraph, node: TaskId) -> Vec<TaskId> {
    let mut deps: Vec<TaskId> = graph
        .dependencies_of(node)
        .map(|set| set.iter().copied().collect())
        .unwrap_or_default();
    deps.sort();
    deps
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn graph_of(edges: &[(TaskId, &[TaskId])]) -> DependencyGraph {
        let map: HashMap<TaskId, HashSet<TaskId>> = edges
            .iter()
            .map(|(id, deps)| (*id, deps.iter().copied().collect()))
            .collect();
        DependencyGraph::from_edges(map)
    }

    #[test]
    fn test_empty_graph_is_valid() {
        let validation = validate_acyclic(&DependencyGraph::default());
        assert!(validation.valid);
        assert!(validation.cycles.is_empty());
    }

    #[test]
    fn test_linear_chain_is_valid() {
        let (a, b, c) = (TaskId::new(), TaskId::new(), TaskId::new());
        let graph = graph_of(&[(a, &[]), (b, &[a]), (c, &[b])]);
        assert!(validate_acyclic(&graph).valid);
    }

    #[test]
    fn test_diamond_is_valid() {
        let (a, b, c, d) = (TaskId::new(), TaskId::new(), TaskId::new(), TaskId::new());
        let graph = graph_of(&[(a, &[]), (b, &[a]), (c, &[a]), (d, &[b, c])]);
        assert!(validate_acyclic(&graph).valid);
    }

    #[test]
    fn test_two_node_cycle_reported_closed() {
        let (a, b) = (TaskId::new(), TaskId::new());
        let graph = graph_of(&[(a, &[b]), (b, &[a])]);

        let validation = validate_acyclic(&graph);
        assert!(!validation.valid);
        assert_eq!(validation.cycles.len(), 1);

        let cycle = &validation.cycles[0];
        assert_eq!(cycle.len(), 3);
        assert_eq!(cycle.first(), cycle.last());
        assert!(cycle.contains(&a) && cycle.contains(&b));
    }

    #[test]
    fn test_self_loop_reported() {
        let a = TaskId::new();
        let graph = graph_of(&[(a, &[a])]);

        let validation = validate_acyclic(&graph);
        assert!(!validation.valid);
        assert_eq!(validation.cycles, vec![vec![a, a]]);
    }

    #[test]
    fn test_node_reachable_from_cycle_is_not_in_cycle() {
        // d depends on a cycle a->b->a but is not part of it
        let (a, b, d) = (TaskId::new(), TaskId::new(), TaskId::new());
        let graph = graph_of(&[(a, &[b]), (b, &[a]), (d, &[a])]);

        let validation = validate_acyclic(&graph);
        assert!(!validation.valid);
        for cycle in &validation.cycles {
            assert!(!cycle.contains(&d), "non-member {d} reported inside a cycle");
        }
    }

    #[test]
    fn test_disjoint_cycles_both_reported() {
        let (a, b) = (TaskId::new(), TaskId::new());
        let (c, d) = (TaskId::new(), TaskId::new());
        let graph = graph_of(&[(a, &[b]), (b, &[a]), (c, &[d]), (d, &[c])]);

        let validation = validate_acyclic(&graph);
        assert!(!validation.valid);
        assert_eq!(validation.cycles.len(), 2);
    }

    #[test]
    fn test_unresolved_dependency_is_not_a_cycle() {
        let (a, ghost) = (TaskId::new(), TaskId::new());
        let graph = graph_of(&[(a, &[ghost])]);
        assert!(validate_acyclic(&graph).valid);
    }
}
