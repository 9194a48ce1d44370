use crate::calculations::{BackwardPass, ForwardPass};
use crate::dependency::Dependency;
use crate::duration::DurationPolicy;
use crate::error::{CycleError, UnknownReferenceWarning};
use crate::graph::{Graph, ScheduleDag};
use crate::task::Task;
use serde::Serialize;
use tracing::{debug, info, warn};

/// A graph with every derived field populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    graph: Graph,
    topological_order: Vec<String>,
    project_duration: i64,
    flagged: Vec<String>,
}

pub fn schedule(graph: &Graph, policy: &DurationPolicy) -> Result<Schedule, CycleError> {
    Schedule::compute(graph, policy)
}

impl Schedule {
    pub fn compute(graph: &Graph, policy: &DurationPolicy) -> Result<Self, CycleError> {
        let dag = ScheduleDag::build(graph, policy);
        let order = dag.topological_order(graph)?;

        let earlies = ForwardPass::new(&dag).execute(&order);
        let project_duration = earlies.iter().map(|&(_, ef)| ef).max().unwrap_or(0);
        let lates = BackwardPass::new(&dag).execute(&order, project_duration);
        debug!(project_duration, tasks = graph.len(), "completed forward and backward passes");

        let mut scheduled = graph.clone();
        for (position, task) in scheduled.tasks_mut().iter_mut().enumerate() {
            let (early_start, early_finish) = earlies[position];
            let (late_start, late_finish) = lates[position];
            let slack = late_start - early_start;
            debug_assert!(slack >= 0, "negative slack {slack} for task '{}'", task.key);

            task.duration = Some(dag.durations[position]);
            task.earliest_start = Some(early_start);
            task.earliest_finish = Some(early_finish);
            task.latest_start = Some(late_start);
            task.latest_finish = Some(late_finish);
            task.slack = Some(slack);
            task.is_critical = Some(slack == 0);
        }

        let flags: Vec<Option<bool>> = scheduled
            .dependencies()
            .iter()
            .map(|dependency| Some(Self::is_tight_critical(&scheduled, dependency)))
            .collect();
        for (dependency, flag) in scheduled.dependencies_mut().iter_mut().zip(flags) {
            dependency.is_critical = flag;
        }

        let topological_order = order
            .iter()
            .map(|&node| graph.tasks()[dag.graph[node]].key.clone())
            .collect();

        let flagged: Vec<String> = scheduled
            .tasks()
            .iter()
            .filter(|task| policy.is_flagged(task))
            .map(|task| task.key.clone())
            .collect();
        for key in &flagged {
            warn!(task = %key, "task flagged by duration policy");
        }

        let schedule = Self {
            graph: scheduled,
            topological_order,
            project_duration,
            flagged,
        };
        info!(
            project_duration,
            critical = schedule.critical_tasks().count(),
            "schedule computed"
        );
        Ok(schedule)
    }

    /// Both endpoints critical and no idle gap between them.
    fn is_tight_critical(graph: &Graph, dependency: &Dependency) -> bool {
        match (
            graph.task(&dependency.predecessor),
            graph.task(&dependency.successor),
        ) {
            (Some(pred), Some(succ)) => {
                pred.critical() && succ.critical() && succ.earliest_start == pred.earliest_finish
            }
            _ => false,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn tasks(&self) -> &[Task] {
        self.graph.tasks()
    }

    pub fn task(&self, key: &str) -> Option<&Task> {
        self.graph.task(key)
    }

    pub fn dependencies(&self) -> &[Dependency] {
        self.graph.dependencies()
    }

    pub fn topological_order(&self) -> &[String] {
        &self.topological_order
    }

    pub fn project_duration(&self) -> i64 {
        self.project_duration
    }

    /// Tasks the duration policy asked to report, in graph order.
    pub fn flagged(&self) -> &[String] {
        &self.flagged
    }

    pub fn warnings(&self) -> &[UnknownReferenceWarning] {
        self.graph.warnings()
    }

    pub fn critical_tasks(&self) -> impl Iterator<Item = &Task> {
        self.graph.tasks().iter().filter(|task| task.critical())
    }

    pub fn critical_dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.graph
            .dependencies()
            .iter()
            .filter(|dependency| dependency.is_critical == Some(true))
    }
}
