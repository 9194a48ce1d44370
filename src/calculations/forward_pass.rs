use crate::graph::ScheduleDag;
use petgraph::graph::NodeIndex;

pub struct ForwardPass<'a> {
    dag: &'a ScheduleDag,
}

impl<'a> ForwardPass<'a> {
    pub fn new(dag: &'a ScheduleDag) -> Self {
        Self { dag }
    }

    /// Earliest (start, finish) per task, indexed by task position.
    ///
    /// `order` must be topological.
    pub fn execute(&self, order: &[NodeIndex]) -> Vec<(i64, i64)> {
        let mut earlies = vec![(0_i64, 0_i64); self.dag.durations.len()];

        for &node in order {
            // Early start is max of all predecessor finishes; sources start at 0
            let early_start = self
                .dag
                .predecessors(node)
                .map(|pred| earlies[pred.index()].1)
                .max()
                .unwrap_or(0);

            let early_finish = early_start + self.dag.duration(node);
            earlies[node.index()] = (early_start, early_finish);
        }

        earlies
    }
}
