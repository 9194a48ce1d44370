pub mod calculations;
pub mod critical_path;
pub mod dependency;
pub mod duration;
pub mod error;
pub mod graph;
pub mod persistence;
pub mod schedule;
pub mod task;

pub use critical_path::{CriticalPathResult, CriticalPathSummary, EdgeFlag, SlackEntry, extract};
pub use dependency::{Dependency, DependencyRecord, PathType};
pub use duration::{DurationPolicy, StatusOverride, WeightTable, duration};
pub use error::{CycleError, Error, MalformedInputError, Result, UnknownReferenceWarning};
pub use graph::{Graph, GraphBuilder};
pub use persistence::{
    InputBatch, PersistenceError, PersistenceResult, load_batch_from_dir,
    load_dependencies_from_json, load_policy_from_json, load_tasks_from_json,
    save_policy_to_json, save_results_to_json, save_schedule_to_csv,
};
pub use schedule::{Schedule, schedule};
pub use task::{RecordKey, Task, TaskPriority, TaskRecord, TaskState, TaskStatus};

use tracing::info;

/// Builds the graph, schedules it and extracts the critical path in one call.
pub fn compute(
    tasks: Vec<TaskRecord>,
    dependencies: Vec<DependencyRecord>,
    policy: &DurationPolicy,
) -> Result<CriticalPathResult> {
    let graph = Graph::build(tasks, dependencies)?;
    let schedule = schedule(&graph, policy)?;
    let result = extract(&schedule);
    info!(summary = %result.to_cli_summary(), "critical path computed");
    Ok(result)
}
