use super::Graph;
use crate::duration::DurationPolicy;
use crate::error::CycleError;
use petgraph::Direction;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};

/// petgraph view of a [`Graph`].
///
/// Node weights are task positions in the graph and edge weights are
/// dependency positions, so `NodeIndex::index()` equals the task position.
pub struct ScheduleDag {
    pub graph: DiGraph<usize, usize>,
    pub durations: Vec<i64>,
}

impl ScheduleDag {
    pub fn build(source: &Graph, policy: &DurationPolicy) -> Self {
        let mut graph: DiGraph<usize, usize> =
            DiGraph::with_capacity(source.len(), source.dependencies().len());
        let mut durations = Vec::with_capacity(source.len());

        // Add nodes first
        for (position, task) in source.tasks().iter().enumerate() {
            graph.add_node(position);
            durations.push(policy.duration(task));
        }

        // Add edges: pred -> task
        for (position, dependency) in source.dependencies().iter().enumerate() {
            if let (Some(u), Some(v)) = (
                source.position(&dependency.predecessor),
                source.position(&dependency.successor),
            ) {
                graph.add_edge(NodeIndex::new(u), NodeIndex::new(v), position);
            }
        }

        Self { graph, durations }
    }

    pub fn duration(&self, node: NodeIndex) -> i64 {
        self.durations[node.index()]
    }

    pub fn predecessors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(node, Direction::Incoming)
    }

    pub fn successors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(node, Direction::Outgoing)
    }

    /// Predecessor-before-successor order over every task.
    pub fn topological_order(&self, source: &Graph) -> Result<Vec<NodeIndex>, CycleError> {
        toposort(&self.graph, None).map_err(|cycle| self.describe_cycle(source, cycle.node_id()))
    }

    fn describe_cycle(&self, source: &Graph, detected: NodeIndex) -> CycleError {
        let key_of = |node: NodeIndex| source.tasks()[self.graph[node]].key.clone();

        let mut cycles: Vec<Vec<NodeIndex>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1 || self.graph.contains_edge(component[0], component[0])
            })
            .collect();

        // Prefer the component holding the node toposort stopped at.
        let component = match cycles.iter().position(|c| c.contains(&detected)) {
            Some(idx) => cycles.swap_remove(idx),
            None => cycles
                .into_iter()
                .min_by_key(|c| c.iter().map(|&node| key_of(node)).min())
                .unwrap_or_else(|| vec![detected]),
        };

        let mut members: Vec<String> = component.iter().map(|&node| key_of(node)).collect();
        members.sort();

        let task = if component.contains(&detected) {
            key_of(detected)
        } else {
            members[0].clone()
        };

        CycleError { task, members }
    }
}
