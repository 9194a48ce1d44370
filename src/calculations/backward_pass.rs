use crate::graph::ScheduleDag;
use petgraph::graph::NodeIndex;

pub struct BackwardPass<'a> {
    dag: &'a ScheduleDag,
}

impl<'a> BackwardPass<'a> {
    pub fn new(dag: &'a ScheduleDag) -> Self {
        Self { dag }
    }

    /// Latest (start, finish) per task, indexed by task position.
    ///
    /// `order` must be topological; it is walked in reverse. Sinks finish at
    /// `project_end`.
    pub fn execute(&self, order: &[NodeIndex], project_end: i64) -> Vec<(i64, i64)> {
        let mut lates = vec![(project_end, project_end); self.dag.durations.len()];

        for &node in order.iter().rev() {
            // Late finish is the tightest successor late start
            let late_finish = self
                .dag
                .successors(node)
                .map(|succ| lates[succ.index()].0)
                .min()
                .unwrap_or(project_end);

            let late_start = late_finish - self.dag.duration(node);
            lates[node.index()] = (late_start, late_finish);
        }

        lates
    }
}
