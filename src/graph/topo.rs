use crate::error::{ScheduleError, ScheduleResult};
use crate::graph::schedule_dag::ScheduleDag;
use petgraph::algo::tarjan_scc;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, warn};

/// Order tasks with Kahn's algorithm.
///
/// The queue is seeded with zero in-degree tasks in input order and
/// successors are released in their recorded order, so ties always break by
/// input position. A short order means the remaining tasks sit on or behind a
/// cycle.
pub fn topological_order(dag: &ScheduleDag) -> ScheduleResult<Vec<String>> {
    let mut indegree = dag.indegrees().clone();
    let mut queue: VecDeque<&str> = dag
        .task_ids()
        .iter()
        .filter(|id| dag.indegree(id) == 0)
        .map(String::as_str)
        .collect();

    let mut order: Vec<String> = Vec::with_capacity(dag.len());
    while let Some(task_id) = queue.pop_front() {
        order.push(task_id.to_string());
        for succ in dag.successors(task_id) {
            if let Some(degree) = indegree.get_mut(succ.as_str()) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(succ.as_str());
                }
            }
        }
    }

    if order.len() < dag.len() {
        let visited: HashSet<&str> = order.iter().map(String::as_str).collect();
        let unresolved: Vec<String> = dag
            .task_ids()
            .iter()
            .filter(|id| !visited.contains(id.as_str()))
            .cloned()
            .collect();
        let cycles = find_cycles(dag);
        warn!(
            unresolved = unresolved.len(),
            cycles = cycles.len(),
            "dependency cycle detected"
        );
        return Err(ScheduleError::CycleDetected { unresolved, cycles });
    }

    debug!(ordered = order.len(), "topological order computed");
    Ok(order)
}

/// Strongly connected components that form a cycle, each listed in input
/// order and sorted by their first member.
pub fn find_cycles(dag: &ScheduleDag) -> Vec<Vec<String>> {
    let mut components: Vec<Vec<usize>> = tarjan_scc(dag.graph())
        .into_iter()
        .filter(|component| {
            component.len() > 1 || dag.graph().contains_edge(component[0], component[0])
        })
        .map(|component| {
            let mut positions: Vec<usize> = component.iter().map(|ix| ix.index()).collect();
            positions.sort_unstable();
            positions
        })
        .collect();
    components.sort_unstable_by_key(|positions| positions[0]);

    components
        .into_iter()
        .map(|positions| {
            positions
                .into_iter()
                .filter_map(|pos| dag.task_ids().get(pos).cloned())
                .collect()
        })
        .collect()
}
