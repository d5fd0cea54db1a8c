use crate::task::Task;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Dependency graph over a validated task set.
///
/// Edges run dependency -> dependent. Node indices follow input order, and
/// every successor list keeps the input order of the dependents so that
/// downstream iteration is deterministic.
#[derive(Debug, Clone)]
pub struct ScheduleDag {
    graph: DiGraph<String, ()>,
    durations: HashMap<String, u32>,
    task_ids: Vec<String>,
    dependencies: HashMap<String, Vec<String>>,
    successors: HashMap<String, Vec<String>>,
    indegree: HashMap<String, usize>,
}

impl ScheduleDag {
    pub fn build(tasks: &[Task]) -> Self {
        let mut graph: DiGraph<String, ()> = DiGraph::with_capacity(tasks.len(), tasks.len());
        let mut id_to_index: HashMap<String, NodeIndex> = HashMap::with_capacity(tasks.len());
        let mut durations: HashMap<String, u32> = HashMap::with_capacity(tasks.len());
        let mut dependencies: HashMap<String, Vec<String>> = HashMap::with_capacity(tasks.len());
        let mut successors: HashMap<String, Vec<String>> = HashMap::with_capacity(tasks.len());
        let mut indegree: HashMap<String, usize> = HashMap::with_capacity(tasks.len());

        // Add nodes first
        for task in tasks {
            let node_ix = graph.add_node(task.id.clone());
            id_to_index.insert(task.id.clone(), node_ix);
            durations.insert(task.id.clone(), task.duration_days);
            successors.insert(task.id.clone(), Vec::new());
            indegree.insert(task.id.clone(), 0);
        }

        // Add edges: dependency -> task
        for task in tasks {
            let mut resolved = Vec::with_capacity(task.dependencies.len());
            for dep in &task.dependencies {
                if let (Some(&u), Some(&v)) = (id_to_index.get(dep), id_to_index.get(&task.id)) {
                    graph.add_edge(u, v, ());
                    if let Some(list) = successors.get_mut(dep) {
                        list.push(task.id.clone());
                    }
                    resolved.push(dep.clone());
                }
            }
            indegree.insert(task.id.clone(), resolved.len());
            dependencies.insert(task.id.clone(), resolved);
        }

        Self {
            graph,
            durations,
            task_ids: tasks.iter().map(|task| task.id.clone()).collect(),
            dependencies,
            successors,
            indegree,
        }
    }

    /// Task ids in input order.
    pub fn task_ids(&self) -> &[String] {
        &self.task_ids
    }

    pub fn len(&self) -> usize {
        self.task_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.task_ids.is_empty()
    }

    pub fn successors(&self, id: &str) -> &[String] {
        self.successors.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn dependencies(&self, id: &str) -> &[String] {
        self.dependencies.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn indegree(&self, id: &str) -> usize {
        self.indegree.get(id).copied().unwrap_or(0)
    }

    pub fn indegrees(&self) -> &HashMap<String, usize> {
        &self.indegree
    }

    pub fn duration(&self, id: &str) -> u32 {
        self.durations.get(id).copied().unwrap_or(0)
    }

    /// Petgraph view; node indices follow input order.
    pub fn graph(&self) -> &DiGraph<String, ()> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Task> {
        vec![
            Task::new("A", 2),
            Task::new("C", 1).with_dependencies(["A"]),
            Task::new("B", 3).with_dependencies(["A"]),
            Task::new("D", 2).with_dependencies(["B", "C"]),
        ]
    }

    #[test]
    fn builds_edges_from_dependencies() {
        let dag = ScheduleDag::build(&sample());
        assert_eq!(dag.graph().node_count(), 4);
        assert_eq!(dag.graph().edge_count(), 4);
        // node indices follow input order: A, C, B, D
        assert!(dag.graph().contains_edge(NodeIndex::new(0), NodeIndex::new(1)));
        assert!(!dag.graph().contains_edge(NodeIndex::new(0), NodeIndex::new(3)));
    }

    #[test]
    fn successor_lists_keep_input_order() {
        let dag = ScheduleDag::build(&sample());
        assert_eq!(dag.successors("A"), ["C".to_string(), "B".to_string()]);
        assert_eq!(dag.successors("C"), ["D".to_string()]);
        assert!(dag.successors("D").is_empty());
    }

    #[test]
    fn indegree_counts_dependencies() {
        let dag = ScheduleDag::build(&sample());
        assert_eq!(dag.indegree("A"), 0);
        assert_eq!(dag.indegree("B"), 1);
        assert_eq!(dag.indegree("D"), 2);
        assert_eq!(dag.duration("B"), 3);
    }
}
